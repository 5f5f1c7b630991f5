// ABOUTME: Session resolver backed by the database: single-occurrence checks and range resolution
// ABOUTME: Loads active cancellations once per call and hands them to the pure resolver
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::schedule::{require_slot, require_teaching_period};
use crate::database::Database;
use crate::errors::AppResult;
use crate::sessions::{is_cancelled, resolve_range, CancelledOccurrence, DateRange};
use courtside_core::models::DayOfWeek;
use courtside_core::permissions::Actor;

/// Status of one occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    /// Slot checked
    pub slot_id: Uuid,
    /// Date checked
    pub date: NaiveDate,
    /// Whether the slot recurs on this date's weekday
    pub scheduled: bool,
    /// Whether an active cancellation covers the occurrence
    pub cancelled: bool,
    /// Reason of the first matching cancellation
    pub reason: Option<String>,
    /// First matching cancellation
    pub cancellation_id: Option<Uuid>,
}

/// Whether the occurrence of `slot_id` on `date` is cancelled, and why
///
/// # Errors
///
/// Returns a not-found error if the slot is not in the actor's club
pub async fn check_session(
    database: &Database,
    actor: &Actor,
    slot_id: Uuid,
    date: NaiveDate,
) -> AppResult<SessionStatus> {
    let slot = require_slot(database, actor, slot_id).await?;
    let cancellations = database.cancellations().list_active(actor.club_id).await?;
    let check = is_cancelled(&cancellations, slot.id, date);

    Ok(SessionStatus {
        slot_id: slot.id,
        date,
        scheduled: slot.day_of_week == DayOfWeek::of(date),
        cancelled: check.cancelled,
        reason: check.reason,
        cancellation_id: check.cancellation_id,
    })
}

/// Every cancelled occurrence of the club's slots between `start` and `end`
///
/// With a teaching period, only slots whose group has an active enrollment in
/// that period are considered.
///
/// # Errors
///
/// Returns a validation error for an inverted or oversized range, or a
/// not-found error for a teaching period outside the club
pub async fn resolve_cancelled_range(
    database: &Database,
    actor: &Actor,
    start: NaiveDate,
    end: NaiveDate,
    teaching_period_id: Option<Uuid>,
    max_range_days: i64,
) -> AppResult<Vec<CancelledOccurrence>> {
    let range = DateRange::new(start, end, max_range_days)?;

    let mut slots = database.slots().list_slots(actor.club_id).await?;
    if let Some(period_id) = teaching_period_id {
        require_teaching_period(database, actor, period_id).await?;
        let enrolled_groups = database
            .slots()
            .groups_with_enrollments(actor.club_id, period_id)
            .await?;
        slots.retain(|slot| enrolled_groups.contains(&slot.group_id));
    }

    let cancellations = database.cancellations().list_active(actor.club_id).await?;
    let cancelled = resolve_range(&slots, &cancellations, range);

    info!(
        club.id = %actor.club_id,
        range.start = %range.start(),
        range.end = %range.end(),
        slots = slots.len(),
        rules = cancellations.len(),
        cancelled = cancelled.len(),
        "Resolved cancelled sessions"
    );
    Ok(cancelled)
}
