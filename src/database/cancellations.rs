// ABOUTME: Cancellation rule persistence with soft delete
// ABOUTME: Rows are never removed; deactivation flips is_active and stamps deactivated_at
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

use super::{
    club_column, optional_timestamp_column, optional_uuid_column, timestamp_column,
    timestamp_value, uuid_column, write_error,
};
use crate::errors::{AppError, AppResult};
use chrono::{NaiveDate, Utc};
use courtside_core::models::{Cancellation, CancellationScope, CancellationState, ClubId, ScopeKind};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

const SELECT_COLUMNS: &str = r"
    SELECT id, club_id, scope, date, week_start, week_end, slot_id, reason,
           is_active, created_by, created_at, deactivated_at
    FROM cancellations
";

/// Cancellation database operations manager
pub struct CancellationsManager {
    pool: SqlitePool,
}

impl CancellationsManager {
    /// Create a new cancellations manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist a new, active cancellation
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails
    pub async fn create(
        &self,
        club_id: ClubId,
        scope: CancellationScope,
        reason: Option<String>,
        created_by: Uuid,
    ) -> AppResult<Cancellation> {
        let cancellation = Cancellation {
            id: Uuid::new_v4(),
            club_id,
            scope,
            reason,
            state: CancellationState::Active,
            created_by,
            created_at: Utc::now(),
            deactivated_at: None,
        };

        let (date, week_start, week_end) = scope_dates(&scope);

        sqlx::query(
            r"
            INSERT INTO cancellations (
                id, club_id, scope, date, week_start, week_end, slot_id, reason,
                is_active, created_by, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 1, $9, $10)
            ",
        )
        .bind(cancellation.id.to_string())
        .bind(club_id.to_string())
        .bind(scope.kind().as_str())
        .bind(date)
        .bind(week_start)
        .bind(week_end)
        .bind(scope.slot_id().map(|id| id.to_string()))
        .bind(&cancellation.reason)
        .bind(created_by.to_string())
        .bind(timestamp_value(&cancellation.created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("Cancellation", &e))?;

        info!(
            club.id = %club_id,
            cancellation.id = %cancellation.id,
            cancellation.scope = scope.kind().as_str(),
            "Cancellation created"
        );
        Ok(cancellation)
    }

    /// Get a cancellation by ID within a club, active or not
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get(&self, club_id: ClubId, cancellation_id: Uuid) -> AppResult<Option<Cancellation>> {
        let query = format!("{SELECT_COLUMNS} WHERE id = $1 AND club_id = $2");
        let row = sqlx::query(&query)
            .bind(cancellation_id.to_string())
            .bind(club_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get cancellation: {e}")))?;

        row.as_ref().map(row_to_cancellation).transpose()
    }

    /// List a club's cancellations in creation order
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list(&self, club_id: ClubId, include_inactive: bool) -> AppResult<Vec<Cancellation>> {
        let query = if include_inactive {
            format!("{SELECT_COLUMNS} WHERE club_id = $1 ORDER BY created_at, rowid")
        } else {
            format!("{SELECT_COLUMNS} WHERE club_id = $1 AND is_active = 1 ORDER BY created_at, rowid")
        };
        let rows = sqlx::query(&query)
            .bind(club_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list cancellations: {e}")))?;

        rows.iter().map(row_to_cancellation).collect()
    }

    /// Active cancellations of a club, in creation order
    ///
    /// One query serves a whole date range.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_active(&self, club_id: ClubId) -> AppResult<Vec<Cancellation>> {
        self.list(club_id, false).await
    }

    /// Mark a cancellation inactive
    ///
    /// Deactivating an already inactive cancellation returns it unchanged.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if no cancellation with this ID exists in the club
    pub async fn deactivate(&self, club_id: ClubId, cancellation_id: Uuid) -> AppResult<Cancellation> {
        let result = sqlx::query(
            r"
            UPDATE cancellations
            SET is_active = 0, deactivated_at = $1
            WHERE id = $2 AND club_id = $3 AND is_active = 1
            ",
        )
        .bind(timestamp_value(&Utc::now()))
        .bind(cancellation_id.to_string())
        .bind(club_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to deactivate cancellation: {e}")))?;

        let cancellation = self
            .get(club_id, cancellation_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Cancellation").with_resource_id(cancellation_id.to_string())
            })?;

        if result.rows_affected() > 0 {
            info!(
                club.id = %club_id,
                cancellation.id = %cancellation_id,
                "Cancellation deactivated"
            );
        }
        Ok(cancellation)
    }
}

fn scope_dates(
    scope: &CancellationScope,
) -> (Option<NaiveDate>, Option<NaiveDate>, Option<NaiveDate>) {
    match *scope {
        CancellationScope::Session { date, .. } | CancellationScope::Day { date } => {
            (Some(date), None, None)
        }
        CancellationScope::Week {
            start_date,
            end_date,
        } => (None, Some(start_date), Some(end_date)),
    }
}

fn row_to_cancellation(row: &SqliteRow) -> AppResult<Cancellation> {
    let scope_str: String = row.get("scope");
    let kind = ScopeKind::parse(&scope_str)
        .ok_or_else(|| AppError::internal(format!("Unknown cancellation scope: {scope_str}")))?;
    let date: Option<NaiveDate> = row.get("date");
    let missing = |column: &str| {
        AppError::internal(format!("Cancellation row with {scope_str} scope lacks {column}"))
    };

    let scope = match kind {
        ScopeKind::Session => CancellationScope::Session {
            slot_id: optional_uuid_column(row, "slot_id")?.ok_or_else(|| missing("slot_id"))?,
            date: date.ok_or_else(|| missing("date"))?,
        },
        ScopeKind::Day => CancellationScope::Day {
            date: date.ok_or_else(|| missing("date"))?,
        },
        ScopeKind::Week => {
            let start: Option<NaiveDate> = row.get("week_start");
            let end: Option<NaiveDate> = row.get("week_end");
            CancellationScope::Week {
                start_date: start.ok_or_else(|| missing("week_start"))?,
                end_date: end.ok_or_else(|| missing("week_end"))?,
            }
        }
    };
    let is_active: bool = row.get("is_active");

    Ok(Cancellation {
        id: uuid_column(row, "id")?,
        club_id: club_column(row)?,
        scope,
        reason: row.get("reason"),
        state: CancellationState::from_flag(is_active),
        created_by: uuid_column(row, "created_by")?,
        created_at: timestamp_column(row, "created_at")?,
        deactivated_at: optional_timestamp_column(row, "deactivated_at")?,
    })
}
