// ABOUTME: Session commands for courtside-cli: check one occurrence or resolve a date range
// ABOUTME: Range width is limited by MAX_RANGE_DAYS like the HTTP API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

use super::Session;
use crate::helpers::display::display_cancelled_sessions;
use chrono::NaiveDate;
use courtside::errors::AppResult;
use courtside::services::sessions;
use uuid::Uuid;

/// Print whether one occurrence is cancelled
pub async fn check(session: &Session<'_>, slot_id: Uuid, date: NaiveDate) -> AppResult<()> {
    let actor = session.actor().await?;
    let status = sessions::check_session(session.database, &actor, slot_id, date).await?;

    if !status.scheduled {
        println!("Note: slot {slot_id} does not run on {}", date.format("%A"));
    }
    if status.cancelled {
        println!(
            "Cancelled: {}",
            status.reason.as_deref().unwrap_or("no reason given")
        );
        if let Some(id) = status.cancellation_id {
            println!("   Cancellation ID: {id}");
        }
    } else {
        println!("Not cancelled");
    }
    Ok(())
}

/// Print every cancelled occurrence in a range
pub async fn resolve(
    session: &Session<'_>,
    start: NaiveDate,
    end: NaiveDate,
    teaching_period_id: Option<Uuid>,
    max_range_days: i64,
) -> AppResult<()> {
    let actor = session.actor().await?;
    let cancelled = sessions::resolve_cancelled_range(
        session.database,
        &actor,
        start,
        end,
        teaching_period_id,
        max_range_days,
    )
    .await?;
    display_cancelled_sessions(&cancelled);
    Ok(())
}
