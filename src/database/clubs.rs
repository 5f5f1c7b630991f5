// ABOUTME: Club (tenant) persistence and club membership lookups
// ABOUTME: Resolves subdomains to clubs and users to their role inside a club
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

use super::{timestamp_column, timestamp_value, uuid_column, write_error};
use crate::errors::{AppError, AppResult};
use chrono::Utc;
use courtside_core::models::{Club, ClubId};
use courtside_core::permissions::ClubRole;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// A user's membership in one club
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClubMember {
    /// Club the membership belongs to
    pub club_id: ClubId,
    /// Member user ID
    pub user_id: Uuid,
    /// Name shown on registers
    pub display_name: String,
    /// Role within the club
    pub role: ClubRole,
}

/// Club database operations manager
pub struct ClubsManager {
    pool: SqlitePool,
}

impl ClubsManager {
    /// Create a new clubs manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a club
    ///
    /// # Errors
    ///
    /// Returns a conflict error if the subdomain is taken
    pub async fn create(&self, name: &str, subdomain: &str) -> AppResult<Club> {
        let club = Club {
            id: ClubId::new(),
            name: name.to_owned(),
            subdomain: subdomain.to_owned(),
            created_at: Utc::now(),
        };

        sqlx::query(
            r"
            INSERT INTO clubs (id, name, subdomain, created_at)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(club.id.to_string())
        .bind(&club.name)
        .bind(&club.subdomain)
        .bind(timestamp_value(&club.created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("Club subdomain", &e))?;

        Ok(club)
    }

    /// Get a club by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get(&self, club_id: ClubId) -> AppResult<Option<Club>> {
        let row = sqlx::query("SELECT id, name, subdomain, created_at FROM clubs WHERE id = $1")
            .bind(club_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get club: {e}")))?;

        row.as_ref().map(row_to_club).transpose()
    }

    /// Get a club by its subdomain
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_by_subdomain(&self, subdomain: &str) -> AppResult<Option<Club>> {
        let row = sqlx::query(
            "SELECT id, name, subdomain, created_at FROM clubs WHERE subdomain = $1",
        )
        .bind(subdomain)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get club by subdomain: {e}")))?;

        row.as_ref().map(row_to_club).transpose()
    }

    /// List all clubs ordered by name
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list(&self) -> AppResult<Vec<Club>> {
        let rows = sqlx::query("SELECT id, name, subdomain, created_at FROM clubs ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list clubs: {e}")))?;

        rows.iter().map(row_to_club).collect()
    }

    /// Add a user to a club with a role
    ///
    /// # Errors
    ///
    /// Returns a conflict error if the user is already a member
    pub async fn add_member(
        &self,
        club_id: ClubId,
        user_id: Uuid,
        display_name: &str,
        role: ClubRole,
    ) -> AppResult<ClubMember> {
        sqlx::query(
            r"
            INSERT INTO club_members (club_id, user_id, display_name, role, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(club_id.to_string())
        .bind(user_id.to_string())
        .bind(display_name)
        .bind(role.as_str())
        .bind(timestamp_value(&Utc::now()))
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("Club member", &e))?;

        Ok(ClubMember {
            club_id,
            user_id,
            display_name: display_name.to_owned(),
            role,
        })
    }

    /// Look up a user's membership in a club
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or the stored role is unknown
    pub async fn get_member(&self, club_id: ClubId, user_id: Uuid) -> AppResult<Option<ClubMember>> {
        let row = sqlx::query(
            r"
            SELECT club_id, user_id, display_name, role
            FROM club_members
            WHERE club_id = $1 AND user_id = $2
            ",
        )
        .bind(club_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get club member: {e}")))?;

        row.as_ref().map(row_to_member).transpose()
    }
}

fn row_to_club(row: &SqliteRow) -> AppResult<Club> {
    Ok(Club {
        id: ClubId::from(uuid_column(row, "id")?),
        name: row.get("name"),
        subdomain: row.get("subdomain"),
        created_at: timestamp_column(row, "created_at")?,
    })
}

fn row_to_member(row: &SqliteRow) -> AppResult<ClubMember> {
    let role_str: String = row.get("role");
    let role = ClubRole::parse(&role_str)
        .ok_or_else(|| AppError::internal(format!("Unknown club role: {role_str}")))?;

    Ok(ClubMember {
        club_id: ClubId::from(uuid_column(row, "club_id")?),
        user_id: uuid_column(row, "user_id")?,
        display_name: row.get("display_name"),
        role,
    })
}
