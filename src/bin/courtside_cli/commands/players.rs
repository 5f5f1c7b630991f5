// ABOUTME: Player commands for courtside-cli: CSV roster import
// ABOUTME: Exits with an error when the import stops early so scripts can detect it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

use super::Session;
use crate::helpers::display::display_import_report;
use courtside::errors::{AppError, AppResult};
use courtside::import;
use std::path::Path;
use uuid::Uuid;

/// Import a roster file
pub async fn import(
    session: &Session<'_>,
    file: &Path,
    teaching_period_id: Uuid,
    batch_size: usize,
) -> AppResult<()> {
    let actor = session.actor().await?;
    let report = import::import_players_from_path(
        session.database,
        &actor,
        file,
        teaching_period_id,
        batch_size,
    )
    .await?;
    display_import_report(&report);

    match report.failure {
        None => Ok(()),
        Some(failure) => Err(AppError::invalid_input(format!(
            "Import stopped at row {}",
            failure.row
        ))),
    }
}
