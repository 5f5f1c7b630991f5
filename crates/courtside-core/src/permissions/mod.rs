// ABOUTME: Club roles and the acting user supplied by the authentication layer
// ABOUTME: Role checks for cancellation scopes and register access live here
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

//! Role-based permissions within a club.
//!
//! The authentication layer resolves who is calling and for which club; this
//! module only answers whether that actor may perform an action.

use crate::errors::{AppError, AppResult};
use crate::models::ClubId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a member within one club
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClubRole {
    /// Full administrative rights over the club
    Admin,
    /// Runs sessions they are assigned to
    Coach,
}

impl ClubRole {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Coach => "coach",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "coach" => Some(Self::Coach),
            _ => None,
        }
    }
}

/// The user performing an operation, already resolved to one club
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// User identifier
    pub user_id: Uuid,
    /// Club the request was resolved to
    pub club_id: ClubId,
    /// Role in that club
    pub role: ClubRole,
}

impl Actor {
    /// Create a new actor
    #[must_use]
    pub const fn new(user_id: Uuid, club_id: ClubId, role: ClubRole) -> Self {
        Self {
            user_id,
            club_id,
            role,
        }
    }

    /// Whether the actor administers the club
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, ClubRole::Admin)
    }

    /// Require the admin role
    ///
    /// # Errors
    ///
    /// Returns a permission error naming `action` when the actor is not an admin
    pub fn require_admin(&self, action: &str) -> AppResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::permission_denied(format!(
                "Only club administrators can {action}"
            ))
            .with_user_id(self.user_id))
        }
    }

    /// Require admin role or assignment as one of `assigned_coaches`
    ///
    /// # Errors
    ///
    /// Returns a permission error when the actor is neither
    pub fn require_admin_or_assigned(
        &self,
        assigned_coaches: &[Uuid],
        action: &str,
    ) -> AppResult<()> {
        if self.is_admin() || assigned_coaches.contains(&self.user_id) {
            Ok(())
        } else {
            Err(AppError::permission_denied(format!(
                "Only administrators or the assigned coach can {action}"
            ))
            .with_user_id(self.user_id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_passes_every_check() {
        let admin = Actor::new(Uuid::new_v4(), ClubId::new(), ClubRole::Admin);
        assert!(admin.require_admin("cancel a day").is_ok());
        assert!(admin.require_admin_or_assigned(&[], "cancel a session").is_ok());
    }

    #[test]
    fn test_coach_needs_assignment() {
        let coach = Actor::new(Uuid::new_v4(), ClubId::new(), ClubRole::Coach);
        let err = coach.require_admin("cancel a week").unwrap_err();
        assert_eq!(err.http_status(), 403);
        assert!(coach
            .require_admin_or_assigned(&[Uuid::new_v4()], "cancel a session")
            .is_err());
        assert!(coach
            .require_admin_or_assigned(&[coach.user_id], "cancel a session")
            .is_ok());
    }
}
