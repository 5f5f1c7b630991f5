// ABOUTME: Player CSV import: creates students and enrolls them in named groups for one teaching period
// ABOUTME: Rows commit in fixed-size batches; the first failing batch is rolled back and stops the run
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

//! # Player import
//!
//! Expected header: `first_name,last_name,contact_email,medical_notes,group`.
//! Each row creates a student and enrolls it in the named coaching group for
//! the chosen teaching period. Rows are processed in order, one transaction
//! per batch. When a row fails its whole batch is rolled back, earlier batches
//! stay committed, and the report names the 1-based row to resume from.

use std::collections::HashMap;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::database::slots::{insert_enrollment, insert_student};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::services::schedule::{require_teaching_period, NewStudent};
use courtside_core::models::{Enrollment, Student};
use courtside_core::permissions::Actor;

/// One CSV row
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerRow {
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Contact email
    #[serde(default)]
    pub contact_email: Option<String>,
    /// Medical information
    #[serde(default)]
    pub medical_notes: Option<String>,
    /// Coaching group name, matched case-insensitively
    pub group: String,
}

/// Row that stopped an import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportFailure {
    /// 1-based data row number, header excluded
    pub row: usize,
    /// What went wrong
    pub message: String,
}

/// Outcome of an import run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    /// Batches written to the database
    pub batches_committed: usize,
    /// Rows written to the database
    pub rows_imported: usize,
    /// First row of the rolled-back batch, when the run stopped early
    pub resume_at_row: Option<usize>,
    /// The failing row, when the run stopped early
    pub failure: Option<ImportFailure>,
}

impl ImportReport {
    /// Whether every row was imported
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

/// Convert a CSV error into a format error naming its position
#[must_use]
pub fn csv_error(error: &csv::Error) -> AppError {
    let position = error
        .position()
        .map(|p| format!(" at line {}", p.line()))
        .unwrap_or_default();
    AppError::invalid_format(format!("Malformed CSV{position}: {error}"))
}

/// Import players from a CSV file
///
/// # Errors
///
/// Returns an error if the file cannot be read, plus the errors of [`import_players`]
pub async fn import_players_from_path(
    database: &Database,
    actor: &Actor,
    path: &Path,
    teaching_period_id: Uuid,
    batch_size: usize,
) -> AppResult<ImportReport> {
    let contents = tokio::fs::read(path).await.map_err(|e| {
        AppError::invalid_input(format!("Cannot read {}: {e}", path.display()))
    })?;
    import_players(database, actor, contents.as_slice(), teaching_period_id, batch_size).await
}

/// Import players from CSV data
///
/// Row-level problems do not produce an `Err`; they stop the run and are
/// reported in [`ImportReport::failure`].
///
/// # Errors
///
/// Returns a permission error for non-admins, a not-found error for a
/// teaching period outside the club, or a format error for a bad header
pub async fn import_players<R: io::Read>(
    database: &Database,
    actor: &Actor,
    input: R,
    teaching_period_id: Uuid,
    batch_size: usize,
) -> AppResult<ImportReport> {
    actor.require_admin("import players")?;
    let period = require_teaching_period(database, actor, teaching_period_id).await?;
    let rows = read_rows(input)?;

    let groups: HashMap<String, Uuid> = database
        .slots()
        .list_groups(actor.club_id)
        .await?
        .into_iter()
        .map(|group| (group.name.trim().to_lowercase(), group.id))
        .collect();

    let mut report = ImportReport::default();
    for (batch_index, batch) in rows.chunks(batch_size.max(1)).enumerate() {
        let first_row = batch_index * batch_size.max(1) + 1;
        match import_batch(database, actor, period.id, &groups, first_row, batch).await {
            Ok(imported) => {
                report.batches_committed += 1;
                report.rows_imported += imported;
            }
            Err(failure) => {
                warn!(
                    club.id = %actor.club_id,
                    row = failure.row,
                    resume_at_row = first_row,
                    "Player import stopped: {}",
                    failure.message
                );
                report.resume_at_row = Some(first_row);
                report.failure = Some(failure);
                break;
            }
        }
    }

    info!(
        club.id = %actor.club_id,
        teaching_period.id = %period.id,
        batches = report.batches_committed,
        rows = report.rows_imported,
        complete = report.is_complete(),
        "Player import finished"
    );
    Ok(report)
}

type ParsedRow = Result<PlayerRow, String>;

fn read_rows<R: io::Read>(input: R) -> AppResult<Vec<ParsedRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader.headers().map_err(|e| csv_error(&e))?;
    for required in ["first_name", "last_name", "group"] {
        if !headers.iter().any(|h| h == required) {
            return Err(AppError::invalid_format(format!(
                "CSV header is missing the '{required}' column"
            )));
        }
    }

    Ok(reader
        .deserialize::<PlayerRow>()
        .map(|row| row.map_err(|e| csv_error(&e).message))
        .collect())
}

/// Write one batch in a transaction; dropping the transaction on error rolls it back
async fn import_batch(
    database: &Database,
    actor: &Actor,
    teaching_period_id: Uuid,
    groups: &HashMap<String, Uuid>,
    first_row: usize,
    batch: &[ParsedRow],
) -> Result<usize, ImportFailure> {
    let fail = |row: usize, message: String| ImportFailure { row, message };

    let mut tx = database
        .pool()
        .begin()
        .await
        .map_err(|e| fail(first_row, format!("Failed to begin transaction: {e}")))?;

    for (offset, parsed) in batch.iter().enumerate() {
        let row_number = first_row + offset;
        let row = parsed.as_ref().map_err(|e| fail(row_number, e.clone()))?;

        let student = NewStudent {
            first_name: row.first_name.clone(),
            last_name: row.last_name.clone(),
            contact_email: row.contact_email.clone(),
            medical_notes: row.medical_notes.clone(),
        }
        .normalized()
        .map_err(|e| fail(row_number, e.message))?;

        let group_id = groups
            .get(&row.group.trim().to_lowercase())
            .copied()
            .ok_or_else(|| fail(row_number, format!("Unknown coaching group '{}'", row.group)))?;

        let student = Student {
            id: Uuid::new_v4(),
            club_id: actor.club_id,
            first_name: student.first_name,
            last_name: student.last_name,
            contact_email: student.contact_email,
            medical_notes: student.medical_notes,
        };
        insert_student(&mut tx, &student)
            .await
            .map_err(|e| fail(row_number, e.message))?;

        let enrollment = Enrollment {
            id: Uuid::new_v4(),
            club_id: actor.club_id,
            student_id: student.id,
            group_id,
            teaching_period_id,
            is_active: true,
        };
        insert_enrollment(&mut tx, &enrollment)
            .await
            .map_err(|e| fail(row_number, e.message))?;
    }

    tx.commit()
        .await
        .map_err(|e| fail(first_row, format!("Failed to commit batch: {e}")))?;
    Ok(batch.len())
}
