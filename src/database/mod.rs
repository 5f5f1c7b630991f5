// ABOUTME: SQLite persistence for clubs, schedules, cancellations, plans and registers
// ABOUTME: Opens the pool, runs idempotent migrations and hands out per-table managers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

//! # Database Management
//!
//! Every table carries a `club_id` column and every manager method filters on
//! it, so a row belonging to another club reads exactly like a missing row.
//! Uniqueness invariants (one register per slot and date, one entry per
//! register and student, one plan per occurrence, one plan entry per student)
//! are enforced by the schema rather than by application locks.

/// Cancellation rules
pub mod cancellations;
/// Clubs and club membership
pub mod clubs;
/// Session plans, plan entries and trial players
pub mod plans;
/// Registers, register entries and assistants
pub mod registers;
/// Groups, slots, coach assignments, teaching periods, students and enrollments
pub mod slots;

pub use cancellations::CancellationsManager;
pub use clubs::ClubsManager;
pub use plans::SessionPlansManager;
pub use registers::RegistersManager;
pub use slots::SlotsManager;

use crate::config::database::DatabaseUrl;
use crate::constants::database::DEFAULT_MAX_CONNECTIONS;
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, SecondsFormat, Utc};
use courtside_core::models::ClubId;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{error, info};
use uuid::Uuid;

/// Database handle shared by all services
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the database and run migrations
    ///
    /// In-memory URLs get a single long-lived connection so every query sees
    /// the same database.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the connection fails or a
    /// migration statement fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let url = DatabaseUrl::parse_url(database_url)?;
        let options = SqliteConnectOptions::from_str(&url.to_connection_string())
            .map_err(|e| AppError::config(format!("Invalid database URL {url}: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool_options = if url.is_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(DEFAULT_MAX_CONNECTIONS)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to {url}: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;
        info!(database.url = %url, "Database ready");
        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Club and membership operations
    #[must_use]
    pub fn clubs(&self) -> ClubsManager {
        ClubsManager::new(self.pool.clone())
    }

    /// Schedule operations
    #[must_use]
    pub fn slots(&self) -> SlotsManager {
        SlotsManager::new(self.pool.clone())
    }

    /// Cancellation operations
    #[must_use]
    pub fn cancellations(&self) -> CancellationsManager {
        CancellationsManager::new(self.pool.clone())
    }

    /// Session plan operations
    #[must_use]
    pub fn plans(&self) -> SessionPlansManager {
        SessionPlansManager::new(self.pool.clone())
    }

    /// Register operations
    #[must_use]
    pub fn registers(&self) -> RegistersManager {
        RegistersManager::new(self.pool.clone())
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any schema statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;
        }
        Ok(())
    }
}

/// Idempotent schema statements, in dependency order
const SCHEMA: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS clubs (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        subdomain TEXT NOT NULL UNIQUE,
        created_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS club_members (
        club_id TEXT NOT NULL REFERENCES clubs(id) ON DELETE CASCADE,
        user_id TEXT NOT NULL,
        display_name TEXT NOT NULL,
        role TEXT NOT NULL CHECK (role IN ('admin', 'coach')),
        created_at TEXT NOT NULL,
        PRIMARY KEY (club_id, user_id)
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS teaching_periods (
        id TEXT PRIMARY KEY,
        club_id TEXT NOT NULL REFERENCES clubs(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        UNIQUE (club_id, name)
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS coaching_groups (
        id TEXT PRIMARY KEY,
        club_id TEXT NOT NULL REFERENCES clubs(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        description TEXT,
        UNIQUE (club_id, name)
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS group_time_slots (
        id TEXT PRIMARY KEY,
        club_id TEXT NOT NULL REFERENCES clubs(id) ON DELETE CASCADE,
        group_id TEXT NOT NULL REFERENCES coaching_groups(id) ON DELETE CASCADE,
        day_of_week TEXT NOT NULL,
        start_time TEXT NOT NULL,
        end_time TEXT NOT NULL,
        capacity INTEGER
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS slot_coaches (
        slot_id TEXT NOT NULL REFERENCES group_time_slots(id) ON DELETE CASCADE,
        club_id TEXT NOT NULL REFERENCES clubs(id) ON DELETE CASCADE,
        user_id TEXT NOT NULL,
        PRIMARY KEY (slot_id, user_id)
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS students (
        id TEXT PRIMARY KEY,
        club_id TEXT NOT NULL REFERENCES clubs(id) ON DELETE CASCADE,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        contact_email TEXT,
        medical_notes TEXT,
        created_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS enrollments (
        id TEXT PRIMARY KEY,
        club_id TEXT NOT NULL REFERENCES clubs(id) ON DELETE CASCADE,
        student_id TEXT NOT NULL REFERENCES students(id) ON DELETE CASCADE,
        group_id TEXT NOT NULL REFERENCES coaching_groups(id) ON DELETE CASCADE,
        teaching_period_id TEXT NOT NULL REFERENCES teaching_periods(id) ON DELETE CASCADE,
        is_active INTEGER NOT NULL DEFAULT 1,
        UNIQUE (student_id, group_id, teaching_period_id)
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS cancellations (
        id TEXT PRIMARY KEY,
        club_id TEXT NOT NULL REFERENCES clubs(id) ON DELETE CASCADE,
        scope TEXT NOT NULL,
        date TEXT,
        week_start TEXT,
        week_end TEXT,
        slot_id TEXT REFERENCES group_time_slots(id) ON DELETE CASCADE,
        reason TEXT,
        is_active INTEGER NOT NULL DEFAULT 1,
        created_by TEXT NOT NULL,
        created_at TEXT NOT NULL,
        deactivated_at TEXT,
        CHECK (
            (scope = 'session' AND slot_id IS NOT NULL AND date IS NOT NULL)
            OR (scope = 'day' AND slot_id IS NULL AND date IS NOT NULL)
            OR (scope = 'week' AND week_start IS NOT NULL AND week_end IS NOT NULL
                AND week_start <= week_end)
        )
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS session_plans (
        id TEXT PRIMARY KEY,
        club_id TEXT NOT NULL REFERENCES clubs(id) ON DELETE CASCADE,
        slot_id TEXT NOT NULL REFERENCES group_time_slots(id) ON DELETE CASCADE,
        date TEXT NOT NULL,
        teaching_period_id TEXT NOT NULL REFERENCES teaching_periods(id) ON DELETE CASCADE,
        notes TEXT,
        is_active INTEGER NOT NULL DEFAULT 1,
        created_by TEXT NOT NULL,
        created_at TEXT NOT NULL,
        UNIQUE (slot_id, date, teaching_period_id)
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS plan_entries (
        id TEXT PRIMARY KEY,
        plan_id TEXT NOT NULL REFERENCES session_plans(id) ON DELETE CASCADE,
        student_id TEXT NOT NULL REFERENCES students(id) ON DELETE CASCADE,
        planned_status TEXT NOT NULL,
        player_type TEXT NOT NULL DEFAULT 'regular',
        notes TEXT,
        UNIQUE (plan_id, student_id)
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS trial_players (
        id TEXT PRIMARY KEY,
        plan_id TEXT NOT NULL REFERENCES session_plans(id) ON DELETE CASCADE,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        contact_email TEXT,
        contact_phone TEXT,
        medical_notes TEXT,
        notes TEXT
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS registers (
        id TEXT PRIMARY KEY,
        club_id TEXT NOT NULL REFERENCES clubs(id) ON DELETE CASCADE,
        slot_id TEXT NOT NULL REFERENCES group_time_slots(id) ON DELETE CASCADE,
        date TEXT NOT NULL,
        teaching_period_id TEXT NOT NULL REFERENCES teaching_periods(id) ON DELETE CASCADE,
        coach_id TEXT NOT NULL,
        notes TEXT,
        created_at TEXT NOT NULL,
        UNIQUE (slot_id, date)
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS register_entries (
        id TEXT PRIMARY KEY,
        register_id TEXT NOT NULL REFERENCES registers(id) ON DELETE CASCADE,
        student_id TEXT NOT NULL REFERENCES students(id) ON DELETE CASCADE,
        status TEXT NOT NULL,
        predicted INTEGER NOT NULL DEFAULT 0,
        notes TEXT,
        UNIQUE (register_id, student_id)
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS register_assistants (
        register_id TEXT NOT NULL REFERENCES registers(id) ON DELETE CASCADE,
        user_id TEXT NOT NULL,
        PRIMARY KEY (register_id, user_id)
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_cancellations_club_active ON cancellations(club_id, is_active)",
    "CREATE INDEX IF NOT EXISTS idx_slots_club ON group_time_slots(club_id)",
    "CREATE INDEX IF NOT EXISTS idx_enrollments_group_period ON enrollments(group_id, teaching_period_id)",
    "CREATE INDEX IF NOT EXISTS idx_registers_club_date ON registers(club_id, date)",
];

/// Map a failed insert: uniqueness violations become conflicts naming `entity`
pub(crate) fn write_error(entity: &str, error: &sqlx::Error) -> AppError {
    let unique_violation = error
        .as_database_error()
        .is_some_and(|db_error| db_error.is_unique_violation());
    if unique_violation {
        AppError::conflict(entity)
    } else {
        error!(entity, "Database write failed: {error}");
        AppError::database(format!("Failed to write {entity}: {error}"))
    }
}

/// Read a UUID stored as TEXT
pub(crate) fn uuid_column(row: &SqliteRow, column: &str) -> AppResult<Uuid> {
    let raw: String = row.get(column);
    Uuid::parse_str(&raw)
        .map_err(|e| AppError::internal(format!("Invalid UUID in column {column}: {e}")))
}

/// Read an optional UUID stored as TEXT
pub(crate) fn optional_uuid_column(row: &SqliteRow, column: &str) -> AppResult<Option<Uuid>> {
    let raw: Option<String> = row.get(column);
    raw.map(|value| {
        Uuid::parse_str(&value)
            .map_err(|e| AppError::internal(format!("Invalid UUID in column {column}: {e}")))
    })
    .transpose()
}

/// Read the `club_id` column
pub(crate) fn club_column(row: &SqliteRow) -> AppResult<ClubId> {
    uuid_column(row, "club_id").map(ClubId::from)
}

/// Fixed-width UTC timestamp so stored values sort chronologically as text
pub(crate) fn timestamp_value(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Read an RFC 3339 timestamp stored as TEXT
pub(crate) fn timestamp_column(row: &SqliteRow, column: &str) -> AppResult<DateTime<Utc>> {
    let raw: String = row.get(column);
    parse_timestamp(&raw, column)
}

/// Read an optional RFC 3339 timestamp stored as TEXT
pub(crate) fn optional_timestamp_column(
    row: &SqliteRow,
    column: &str,
) -> AppResult<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(column);
    raw.map(|value| parse_timestamp(&value, column)).transpose()
}

fn parse_timestamp(raw: &str, column: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::internal(format!("Invalid datetime in column {column}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_value_is_fixed_width_and_readable() {
        let whole = Utc.with_ymd_and_hms(2025, 10, 13, 16, 0, 0).unwrap();
        let fractional = whole + chrono::Duration::microseconds(1_500);

        let whole_text = timestamp_value(&whole);
        let fractional_text = timestamp_value(&fractional);
        assert_eq!(whole_text, "2025-10-13T16:00:00.000000Z");
        assert_eq!(whole_text.len(), fractional_text.len());
        assert!(whole_text < fractional_text);

        assert_eq!(parse_timestamp(&fractional_text, "created_at").unwrap(), fractional);
    }
}
