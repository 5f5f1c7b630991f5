// ABOUTME: Club (tenant) model and the ClubId newtype
// ABOUTME: Every scheduling entity is owned by exactly one club
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Type-safe wrapper for club identifiers
///
/// Keeps club IDs from being passed where a slot or student ID is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClubId(pub Uuid);

impl ClubId {
    /// Create a new random `ClubId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the inner UUID value
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ClubId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ClubId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for ClubId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ClubId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A tennis club; the isolation boundary for all data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Club {
    /// Unique club identifier
    pub id: ClubId,
    /// Display name
    pub name: String,
    /// Subdomain the club is served under (`<subdomain>.<base domain>`)
    pub subdomain: String,
    /// When the club was created
    pub created_at: DateTime<Utc>,
}
