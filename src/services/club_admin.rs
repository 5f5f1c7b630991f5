// ABOUTME: Club administration: subdomain validation, club creation and membership
// ABOUTME: Also turns an authenticated user into an Actor scoped to one club
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

use tracing::info;
use uuid::Uuid;

use crate::constants::limits::MAX_SUBDOMAIN_LENGTH;
use crate::database::clubs::ClubMember;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use courtside_core::models::{Club, ClubId};
use courtside_core::permissions::{Actor, ClubRole};

/// Subdomains that belong to the platform rather than to a club
const RESERVED_SUBDOMAINS: &[&str] = &[
    "admin", "api", "www", "app", "auth", "login", "logout", "signup", "system", "root", "public",
    "static", "assets", "mail",
];

/// Validate a club subdomain against naming rules
///
/// Subdomains must:
/// - Be non-empty
/// - Be 63 characters or fewer
/// - Contain only lowercase ASCII letters, digits and hyphens
/// - Not start or end with a hyphen
/// - Not be reserved
///
/// # Errors
///
/// Returns a validation error describing which rule failed
pub fn validate_club_subdomain(subdomain: &str) -> AppResult<()> {
    if subdomain.is_empty() {
        return Err(AppError::invalid_input("Club subdomain cannot be empty"));
    }

    if subdomain.len() > MAX_SUBDOMAIN_LENGTH {
        return Err(AppError::invalid_input(format!(
            "Club subdomain must be {MAX_SUBDOMAIN_LENGTH} characters or less"
        )));
    }

    if !subdomain
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(AppError::invalid_input(
            "Club subdomain can only contain lowercase letters, numbers, and hyphens",
        ));
    }

    if subdomain.starts_with('-') || subdomain.ends_with('-') {
        return Err(AppError::invalid_input(
            "Club subdomain cannot start or end with a hyphen",
        ));
    }

    if RESERVED_SUBDOMAINS.contains(&subdomain) {
        return Err(AppError::invalid_input(format!(
            "Club subdomain '{subdomain}' is reserved and cannot be used"
        )));
    }

    Ok(())
}

/// Create a club with a validated subdomain
///
/// # Errors
///
/// Returns a validation error for a bad name or subdomain, or a conflict
/// error if the subdomain is taken
pub async fn create_club(database: &Database, name: &str, subdomain: &str) -> AppResult<Club> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::missing_field("name"));
    }
    let subdomain = subdomain.trim().to_lowercase();
    validate_club_subdomain(&subdomain)?;

    let club = database.clubs().create(name, &subdomain).await?;
    info!(club.id = %club.id, club.subdomain = %club.subdomain, "Club created");
    Ok(club)
}

/// Add a user to a club
///
/// # Errors
///
/// Returns a not-found error for an unknown club, or a conflict error if the
/// user is already a member
pub async fn add_member(
    database: &Database,
    club_id: ClubId,
    user_id: Uuid,
    display_name: &str,
    role: ClubRole,
) -> AppResult<ClubMember> {
    if database.clubs().get(club_id).await?.is_none() {
        return Err(AppError::not_found("Club"));
    }
    let display_name = display_name.trim();
    if display_name.is_empty() {
        return Err(AppError::missing_field("display_name"));
    }
    database
        .clubs()
        .add_member(club_id, user_id, display_name, role)
        .await
}

/// Resolve a club by subdomain
///
/// # Errors
///
/// Returns a not-found error if no club uses the subdomain
pub async fn resolve_club(database: &Database, subdomain: &str) -> AppResult<Club> {
    database
        .clubs()
        .get_by_subdomain(&subdomain.trim().to_lowercase())
        .await?
        .ok_or_else(|| AppError::not_found("Club"))
}

/// Build the actor for an authenticated user inside a club
///
/// # Errors
///
/// Returns a permission error if the user is not a member of the club
pub async fn resolve_actor(database: &Database, club_id: ClubId, user_id: Uuid) -> AppResult<Actor> {
    let member = database
        .clubs()
        .get_member(club_id, user_id)
        .await?
        .ok_or_else(|| {
            AppError::permission_denied("User is not a member of this club").with_user_id(user_id)
        })?;
    Ok(Actor::new(member.user_id, member.club_id, member.role))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_subdomains() {
        assert!(validate_club_subdomain("riverside-ltc").is_ok());
        assert!(validate_club_subdomain("club42").is_ok());
    }

    #[test]
    fn test_invalid_subdomains() {
        assert!(validate_club_subdomain("").is_err());
        assert!(validate_club_subdomain("-edge").is_err());
        assert!(validate_club_subdomain("edge-").is_err());
        assert!(validate_club_subdomain("Upper").is_err());
        assert!(validate_club_subdomain("under_score").is_err());
        assert!(validate_club_subdomain("www").is_err());
        assert!(validate_club_subdomain(&"a".repeat(64)).is_err());
    }
}
