// ABOUTME: Decides whether slot occurrences are cancelled, singly or across a date range
// ABOUTME: Pure functions over already-loaded slots and active cancellation rules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

//! # Session Resolver
//!
//! Callers load a club's active cancellations once and reuse them for every
//! date they check. When more than one rule matches an occurrence, the rule
//! listed first wins; there is no precedence between scopes. Range resolution
//! reports exactly what [`is_cancelled`] reports for each occurrence, including
//! which rule supplied the reason.

use crate::errors::{AppError, AppResult};
use chrono::{NaiveDate, NaiveTime};
use courtside_core::models::{Cancellation, CancellationScope, DayOfWeek, GroupTimeSlot};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Outcome of checking one occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancellationCheck {
    /// Whether the occurrence is cancelled
    pub cancelled: bool,
    /// Reason of the matching rule, if any
    pub reason: Option<String>,
    /// Matching rule, if any
    pub cancellation_id: Option<Uuid>,
}

impl CancellationCheck {
    /// Occurrence runs as scheduled
    #[must_use]
    pub const fn not_cancelled() -> Self {
        Self {
            cancelled: false,
            reason: None,
            cancellation_id: None,
        }
    }

    fn matched(rule: &Cancellation) -> Self {
        Self {
            cancelled: true,
            reason: rule.reason.clone(),
            cancellation_id: Some(rule.id),
        }
    }
}

/// A cancelled occurrence found by range resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelledOccurrence {
    /// Cancelled slot
    pub slot_id: Uuid,
    /// Group the slot belongs to
    pub group_id: Uuid,
    /// Date of the occurrence
    pub date: NaiveDate,
    /// Day of the week of `date`
    pub day_of_week: DayOfWeek,
    /// Scheduled start
    pub start_time: NaiveTime,
    /// Scheduled end
    pub end_time: NaiveTime,
    /// Reason of the matching rule
    pub reason: Option<String>,
    /// Matching rule
    pub cancellation_id: Uuid,
}

/// Inclusive calendar date range, validated on construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Build a range of at most `max_days` days
    ///
    /// # Errors
    ///
    /// Returns a validation error if `end` precedes `start` or the range is too wide
    pub fn new(start: NaiveDate, end: NaiveDate, max_days: i64) -> AppResult<Self> {
        if end < start {
            return Err(AppError::out_of_range(format!(
                "end date ({end}) is before start date ({start})"
            )));
        }
        let days = (end - start).num_days() + 1;
        if days > max_days {
            return Err(AppError::out_of_range(format!(
                "date range spans {days} days; the maximum is {max_days}"
            )));
        }
        Ok(Self { start, end })
    }

    /// First date
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last date
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` falls inside the range
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every date in the range, ascending
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start
            .iter_days()
            .take_while(move |date| *date <= end)
    }
}

/// Check a single occurrence against a club's cancellation rules
///
/// Inactive rules are skipped. The first matching rule supplies the reason.
#[must_use]
pub fn is_cancelled(
    cancellations: &[Cancellation],
    slot_id: Uuid,
    date: NaiveDate,
) -> CancellationCheck {
    cancellations
        .iter()
        .find(|rule| rule.cancels(slot_id, date))
        .map_or_else(CancellationCheck::not_cancelled, CancellationCheck::matched)
}

/// Lookup structure over active rules, keyed by what each scope matches on
///
/// Every lookup returns the rule with the lowest position in the original
/// list, so answers agree with [`is_cancelled`].
struct CancellationIndex<'a> {
    rules: &'a [Cancellation],
    sessions: HashMap<(Uuid, NaiveDate), usize>,
    days: HashMap<NaiveDate, usize>,
    weeks: Vec<(NaiveDate, NaiveDate, usize)>,
}

impl<'a> CancellationIndex<'a> {
    fn build(rules: &'a [Cancellation], range: &DateRange) -> Self {
        let mut sessions = HashMap::new();
        let mut days = HashMap::new();
        let mut weeks = Vec::new();

        for (position, rule) in rules.iter().enumerate() {
            if !rule.state.is_active() {
                continue;
            }
            match rule.scope {
                CancellationScope::Session { slot_id, date } if range.contains(date) => {
                    sessions.entry((slot_id, date)).or_insert(position);
                }
                CancellationScope::Day { date } if range.contains(date) => {
                    days.entry(date).or_insert(position);
                }
                CancellationScope::Week {
                    start_date,
                    end_date,
                } if start_date <= range.end() && range.start() <= end_date => {
                    weeks.push((start_date, end_date, position));
                }
                CancellationScope::Session { .. }
                | CancellationScope::Day { .. }
                | CancellationScope::Week { .. } => {}
            }
        }

        Self {
            rules,
            sessions,
            days,
            weeks,
        }
    }

    fn is_empty(&self) -> bool {
        self.sessions.is_empty() && self.days.is_empty() && self.weeks.is_empty()
    }

    fn lookup(&self, slot_id: Uuid, date: NaiveDate) -> Option<&'a Cancellation> {
        let session = self.sessions.get(&(slot_id, date)).copied();
        let day = self.days.get(&date).copied();
        let week = self
            .weeks
            .iter()
            .filter(|(start, end, _)| *start <= date && date <= *end)
            .map(|(_, _, position)| *position)
            .min();

        [session, day, week]
            .into_iter()
            .flatten()
            .min()
            .map(|position| &self.rules[position])
    }
}

/// Every cancelled occurrence of `slots` within `range`
///
/// Results are ordered by date, then by slot schedule order (start time).
#[must_use]
pub fn resolve_range(
    slots: &[GroupTimeSlot],
    cancellations: &[Cancellation],
    range: DateRange,
) -> Vec<CancelledOccurrence> {
    let index = CancellationIndex::build(cancellations, &range);
    if index.is_empty() || slots.is_empty() {
        return Vec::new();
    }

    let mut by_weekday: [Vec<&GroupTimeSlot>; 7] = Default::default();
    for slot in slots {
        by_weekday[slot.day_of_week.index()].push(slot);
    }
    for day_slots in &mut by_weekday {
        day_slots.sort_by(|a, b| a.schedule_order(b));
    }

    let mut cancelled = Vec::new();
    for date in range.days() {
        let weekday = DayOfWeek::of(date);
        for slot in &by_weekday[weekday.index()] {
            if let Some(rule) = index.lookup(slot.id, date) {
                cancelled.push(CancelledOccurrence {
                    slot_id: slot.id,
                    group_id: slot.group_id,
                    date,
                    day_of_week: weekday,
                    start_time: slot.start_time,
                    end_time: slot.end_time,
                    reason: rule.reason.clone(),
                    cancellation_id: rule.id,
                });
            }
        }
    }
    cancelled
}
