// ABOUTME: Register persistence: registers, per-student entries and assistant coaches
// ABOUTME: A register and its seeded entries are written in a single transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

use super::{club_column, timestamp_column, timestamp_value, uuid_column, write_error};
use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;
use courtside_core::models::{AttendanceStatus, ClubId, Register, RegisterEntry};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};
use tracing::info;
use uuid::Uuid;

const SELECT_REGISTER: &str = r"
    SELECT id, club_id, slot_id, date, teaching_period_id, coach_id, notes, created_at
    FROM registers
";

/// Register database operations manager
pub struct RegistersManager {
    pool: SqlitePool,
}

impl RegistersManager {
    /// Create a new registers manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Write a register with its entries and assistants atomically
    ///
    /// Nothing is written if any insert fails.
    ///
    /// # Errors
    ///
    /// Returns a conflict error if the occurrence already has a register or
    /// the register lists a student twice
    pub async fn insert(&self, register: &Register) -> AppResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        insert_register_row(&mut tx, register).await?;
        for entry in &register.entries {
            insert_entry_row(&mut tx, entry).await?;
        }
        for assistant in &register.assistant_coach_ids {
            insert_assistant_row(&mut tx, register.id, *assistant).await?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit register: {e}")))?;

        info!(
            club.id = %register.club_id,
            register.id = %register.id,
            slot.id = %register.slot_id,
            entries = register.entries.len(),
            "Register created"
        );
        Ok(())
    }

    /// Get a register with entries and assistants
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails
    pub async fn get(&self, club_id: ClubId, register_id: Uuid) -> AppResult<Option<Register>> {
        let query = format!("{SELECT_REGISTER} WHERE id = $1 AND club_id = $2");
        let row = sqlx::query(&query)
            .bind(register_id.to_string())
            .bind(club_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get register: {e}")))?;

        match row {
            Some(row) => self.load_children(row_to_register(&row)?).await.map(Some),
            None => Ok(None),
        }
    }

    /// The register of an occurrence, if one was opened
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails
    pub async fn find_for_occurrence(
        &self,
        club_id: ClubId,
        slot_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<Option<Register>> {
        let query = format!("{SELECT_REGISTER} WHERE club_id = $1 AND slot_id = $2 AND date = $3");
        let row = sqlx::query(&query)
            .bind(club_id.to_string())
            .bind(slot_id.to_string())
            .bind(date)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to find register: {e}")))?;

        match row {
            Some(row) => self.load_children(row_to_register(&row)?).await.map(Some),
            None => Ok(None),
        }
    }

    /// Add an entry to an existing register
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the register is not in the club, or a
    /// conflict error if the student already has an entry
    pub async fn add_entry(&self, club_id: ClubId, entry: &RegisterEntry) -> AppResult<()> {
        let result = sqlx::query(
            r"
            INSERT INTO register_entries (id, register_id, student_id, status, predicted, notes)
            SELECT $1, $2, $3, $4, $5, $6
            WHERE EXISTS (SELECT 1 FROM registers WHERE id = $2 AND club_id = $7)
            ",
        )
        .bind(entry.id.to_string())
        .bind(entry.register_id.to_string())
        .bind(entry.student_id.to_string())
        .bind(entry.status.as_str())
        .bind(entry.predicted)
        .bind(&entry.notes)
        .bind(club_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("Register entry", &e))?;

        if result.rows_affected() == 0 {
            return Err(
                AppError::not_found("Register").with_resource_id(entry.register_id.to_string())
            );
        }
        Ok(())
    }

    /// Record actual attendance for a student, clearing the forecast flag
    ///
    /// Notes are replaced only when `notes` is `Some`.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the register (in this club) has no entry
    /// for the student
    pub async fn record_attendance(
        &self,
        club_id: ClubId,
        register_id: Uuid,
        student_id: Uuid,
        status: AttendanceStatus,
        notes: Option<String>,
    ) -> AppResult<RegisterEntry> {
        let row = sqlx::query(
            r"
            UPDATE register_entries
            SET status = $1, predicted = 0, notes = COALESCE($2, notes)
            WHERE register_id = $3 AND student_id = $4
              AND EXISTS (SELECT 1 FROM registers WHERE id = $3 AND club_id = $5)
            RETURNING id, register_id, student_id, status, predicted, notes
            ",
        )
        .bind(status.as_str())
        .bind(notes)
        .bind(register_id.to_string())
        .bind(student_id.to_string())
        .bind(club_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to record attendance: {e}")))?;

        row.as_ref()
            .map(row_to_entry)
            .transpose()?
            .ok_or_else(|| AppError::not_found("Register entry"))
    }

    /// Add an assistant coach to a register
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the register is not in the club, or a
    /// conflict error if the assistant is already listed
    pub async fn add_assistant(&self, club_id: ClubId, register_id: Uuid, user_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            r"
            INSERT INTO register_assistants (register_id, user_id)
            SELECT $1, $2
            WHERE EXISTS (SELECT 1 FROM registers WHERE id = $1 AND club_id = $3)
            ",
        )
        .bind(register_id.to_string())
        .bind(user_id.to_string())
        .bind(club_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("Register assistant", &e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Register").with_resource_id(register_id.to_string()));
        }
        Ok(())
    }

    async fn load_children(&self, mut register: Register) -> AppResult<Register> {
        let entry_rows = sqlx::query(
            r"
            SELECT id, register_id, student_id, status, predicted, notes
            FROM register_entries
            WHERE register_id = $1
            ORDER BY rowid
            ",
        )
        .bind(register.id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list register entries: {e}")))?;

        register.entries = entry_rows
            .iter()
            .map(row_to_entry)
            .collect::<AppResult<Vec<_>>>()?;

        let assistant_rows = sqlx::query(
            "SELECT user_id FROM register_assistants WHERE register_id = $1 ORDER BY rowid",
        )
        .bind(register.id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list register assistants: {e}")))?;

        register.assistant_coach_ids = assistant_rows
            .iter()
            .map(|row| uuid_column(row, "user_id"))
            .collect::<AppResult<Vec<_>>>()?;

        Ok(register)
    }
}

async fn insert_register_row(conn: &mut SqliteConnection, register: &Register) -> AppResult<()> {
    sqlx::query(
        r"
        INSERT INTO registers (id, club_id, slot_id, date, teaching_period_id, coach_id, notes, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ",
    )
    .bind(register.id.to_string())
    .bind(register.club_id.to_string())
    .bind(register.slot_id.to_string())
    .bind(register.date)
    .bind(register.teaching_period_id.to_string())
    .bind(register.coach_id.to_string())
    .bind(&register.notes)
    .bind(timestamp_value(&register.created_at))
    .execute(conn)
    .await
    .map_err(|e| write_error("Register", &e))?;
    Ok(())
}

async fn insert_entry_row(conn: &mut SqliteConnection, entry: &RegisterEntry) -> AppResult<()> {
    sqlx::query(
        r"
        INSERT INTO register_entries (id, register_id, student_id, status, predicted, notes)
        VALUES ($1, $2, $3, $4, $5, $6)
        ",
    )
    .bind(entry.id.to_string())
    .bind(entry.register_id.to_string())
    .bind(entry.student_id.to_string())
    .bind(entry.status.as_str())
    .bind(entry.predicted)
    .bind(&entry.notes)
    .execute(conn)
    .await
    .map_err(|e| write_error("Register entry", &e))?;
    Ok(())
}

async fn insert_assistant_row(
    conn: &mut SqliteConnection,
    register_id: Uuid,
    user_id: Uuid,
) -> AppResult<()> {
    sqlx::query("INSERT INTO register_assistants (register_id, user_id) VALUES ($1, $2)")
        .bind(register_id.to_string())
        .bind(user_id.to_string())
        .execute(conn)
        .await
        .map_err(|e| write_error("Register assistant", &e))?;
    Ok(())
}

fn row_to_register(row: &SqliteRow) -> AppResult<Register> {
    Ok(Register {
        id: uuid_column(row, "id")?,
        club_id: club_column(row)?,
        slot_id: uuid_column(row, "slot_id")?,
        date: row.get("date"),
        teaching_period_id: uuid_column(row, "teaching_period_id")?,
        coach_id: uuid_column(row, "coach_id")?,
        assistant_coach_ids: Vec::new(),
        notes: row.get("notes"),
        created_at: timestamp_column(row, "created_at")?,
        entries: Vec::new(),
    })
}

fn row_to_entry(row: &SqliteRow) -> AppResult<RegisterEntry> {
    let status: String = row.get("status");
    Ok(RegisterEntry {
        id: uuid_column(row, "id")?,
        register_id: uuid_column(row, "register_id")?,
        student_id: uuid_column(row, "student_id")?,
        status: AttendanceStatus::parse(&status),
        predicted: row.get("predicted"),
        notes: row.get("notes"),
    })
}
