// ABOUTME: Cancellation rules that suppress occurrences of weekly slots
// ABOUTME: Scope is a tagged union so a rule can only carry the fields its scope needs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

use super::club::ClubId;
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of cancellation, as supplied by callers and stored in the database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    /// One occurrence of one slot
    Session,
    /// Every slot on one date
    Day,
    /// Every slot between two dates (inclusive)
    Week,
}

impl ScopeKind {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Session => "session",
            Self::Day => "day",
            Self::Week => "week",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "session" => Some(Self::Session),
            "day" => Some(Self::Day),
            "week" => Some(Self::Week),
            _ => None,
        }
    }
}

/// What a cancellation suppresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum CancellationScope {
    /// A single occurrence of one slot
    Session {
        /// Cancelled slot
        slot_id: Uuid,
        /// Date of the cancelled occurrence
        date: NaiveDate,
    },
    /// Every slot of the club on one date
    Day {
        /// Cancelled date
        date: NaiveDate,
    },
    /// Every slot whose date falls inside the range (inclusive)
    Week {
        /// First cancelled date
        start_date: NaiveDate,
        /// Last cancelled date
        end_date: NaiveDate,
    },
}

impl CancellationScope {
    /// Build a week scope, rejecting inverted ranges
    ///
    /// # Errors
    ///
    /// Returns a validation error if `end_date` is before `start_date`
    pub fn week(start_date: NaiveDate, end_date: NaiveDate) -> AppResult<Self> {
        if end_date < start_date {
            return Err(AppError::out_of_range(format!(
                "week_end ({end_date}) is before week_start ({start_date})"
            )));
        }
        Ok(Self::Week {
            start_date,
            end_date,
        })
    }

    /// Scope kind tag
    #[must_use]
    pub const fn kind(&self) -> ScopeKind {
        match self {
            Self::Session { .. } => ScopeKind::Session,
            Self::Day { .. } => ScopeKind::Day,
            Self::Week { .. } => ScopeKind::Week,
        }
    }

    /// Slot referenced by a session scope
    #[must_use]
    pub const fn slot_id(&self) -> Option<Uuid> {
        match self {
            Self::Session { slot_id, .. } => Some(*slot_id),
            Self::Day { .. } | Self::Week { .. } => None,
        }
    }

    /// Whether the occurrence of `slot_id` on `date` is covered by this scope
    #[must_use]
    pub fn matches(&self, slot_id: Uuid, date: NaiveDate) -> bool {
        match *self {
            Self::Session {
                slot_id: cancelled_slot,
                date: cancelled_date,
            } => cancelled_slot == slot_id && cancelled_date == date,
            Self::Day {
                date: cancelled_date,
            } => cancelled_date == date,
            Self::Week {
                start_date,
                end_date,
            } => start_date <= date && date <= end_date,
        }
    }
}

/// Flat caller input for creating a cancellation
///
/// Validated into a [`CancellationScope`] before anything is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancellationRequest {
    /// Requested scope kind
    pub scope: ScopeKind,
    /// Date for `session` and `day` scopes
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// First date for `week` scope
    #[serde(default)]
    pub week_start: Option<NaiveDate>,
    /// Last date for `week` scope
    #[serde(default)]
    pub week_end: Option<NaiveDate>,
    /// Slot for `session` scope
    #[serde(default)]
    pub slot_id: Option<Uuid>,
    /// Free-text reason shown to players and coaches
    #[serde(default)]
    pub reason: Option<String>,
}

impl CancellationRequest {
    /// Validate the scope-specific fields
    ///
    /// A `week` request may carry a slot reference; it is ignored because
    /// week cancellations cover every slot.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the missing or conflicting field
    pub fn to_scope(&self) -> AppResult<CancellationScope> {
        match self.scope {
            ScopeKind::Session => {
                let slot_id = self.slot_id.ok_or_else(|| AppError::missing_field("slot_id"))?;
                let date = self.date.ok_or_else(|| AppError::missing_field("date"))?;
                Ok(CancellationScope::Session { slot_id, date })
            }
            ScopeKind::Day => {
                let date = self.date.ok_or_else(|| AppError::missing_field("date"))?;
                if self.slot_id.is_some() {
                    return Err(AppError::invalid_input(
                        "slot_id must be omitted for day cancellations; they apply to every slot",
                    ));
                }
                Ok(CancellationScope::Day { date })
            }
            ScopeKind::Week => {
                let start = self
                    .week_start
                    .ok_or_else(|| AppError::missing_field("week_start"))?;
                let end = self
                    .week_end
                    .ok_or_else(|| AppError::missing_field("week_end"))?;
                CancellationScope::week(start, end)
            }
        }
    }

    /// Reason with surrounding whitespace removed; blank reasons become `None`
    #[must_use]
    pub fn normalized_reason(&self) -> Option<String> {
        self.reason
            .as_deref()
            .map(str::trim)
            .filter(|reason| !reason.is_empty())
            .map(ToOwned::to_owned)
    }
}

/// Soft-delete state; the only legal transition is `Active -> Inactive`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancellationState {
    /// Suppresses matching occurrences
    Active,
    /// Kept for history only
    Inactive,
}

impl CancellationState {
    /// Whether the rule is in force
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Database flag representation
    #[must_use]
    pub const fn from_flag(is_active: bool) -> Self {
        if is_active {
            Self::Active
        } else {
            Self::Inactive
        }
    }
}

/// A persisted cancellation rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cancellation {
    /// Unique identifier
    pub id: Uuid,
    /// Owning club
    pub club_id: ClubId,
    /// What is cancelled
    #[serde(flatten)]
    pub scope: CancellationScope,
    /// Free-text reason
    pub reason: Option<String>,
    /// Active or soft-deleted
    pub state: CancellationState,
    /// User who created the rule
    pub created_by: Uuid,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// When the rule was deactivated, if it was
    pub deactivated_at: Option<DateTime<Utc>>,
}

impl Cancellation {
    /// Whether this rule, if active, cancels the occurrence of `slot_id` on `date`
    #[must_use]
    pub fn cancels(&self, slot_id: Uuid, date: NaiveDate) -> bool {
        self.state.is_active() && self.scope.matches(slot_id, date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(scope: ScopeKind) -> CancellationRequest {
        CancellationRequest {
            scope,
            date: None,
            week_start: None,
            week_end: None,
            slot_id: None,
            reason: None,
        }
    }

    #[test]
    fn test_session_scope_requires_slot_and_date() {
        let err = request(ScopeKind::Session).to_scope().unwrap_err();
        assert!(err.message.contains("slot_id"));

        let mut req = request(ScopeKind::Session);
        req.slot_id = Some(Uuid::new_v4());
        let err = req.to_scope().unwrap_err();
        assert!(err.message.contains("date"));
    }

    #[test]
    fn test_day_scope_rejects_slot_reference() {
        let mut req = request(ScopeKind::Day);
        req.date = Some(date(2024, 6, 3));
        req.slot_id = Some(Uuid::new_v4());
        assert!(req.to_scope().unwrap_err().is_validation());
    }

    #[test]
    fn test_week_scope_rejects_inverted_range() {
        let mut req = request(ScopeKind::Week);
        req.week_start = Some(date(2024, 6, 9));
        req.week_end = Some(date(2024, 6, 3));
        assert!(req.to_scope().unwrap_err().is_validation());

        req.week_end = None;
        assert!(req.to_scope().unwrap_err().message.contains("week_end"));
    }

    #[test]
    fn test_week_scope_ignores_slot_reference() {
        let mut req = request(ScopeKind::Week);
        req.week_start = Some(date(2024, 6, 3));
        req.week_end = Some(date(2024, 6, 9));
        req.slot_id = Some(Uuid::new_v4());
        let scope = req.to_scope().unwrap();
        assert_eq!(scope.slot_id(), None);
        assert_eq!(scope.kind(), ScopeKind::Week);
    }

    #[test]
    fn test_scope_matching() {
        let slot = Uuid::new_v4();
        let other = Uuid::new_v4();
        let session = CancellationScope::Session {
            slot_id: slot,
            date: date(2024, 6, 3),
        };
        assert!(session.matches(slot, date(2024, 6, 3)));
        assert!(!session.matches(other, date(2024, 6, 3)));
        assert!(!session.matches(slot, date(2024, 6, 10)));

        let day = CancellationScope::Day {
            date: date(2024, 6, 3),
        };
        assert!(day.matches(other, date(2024, 6, 3)));

        let week = CancellationScope::week(date(2024, 6, 3), date(2024, 6, 9)).unwrap();
        assert!(week.matches(other, date(2024, 6, 3)));
        assert!(week.matches(slot, date(2024, 6, 9)));
        assert!(!week.matches(slot, date(2024, 6, 10)));
    }

    #[test]
    fn test_blank_reason_is_none() {
        let mut req = request(ScopeKind::Day);
        req.reason = Some("   ".to_owned());
        assert_eq!(req.normalized_reason(), None);
        req.reason = Some(" rain ".to_owned());
        assert_eq!(req.normalized_reason().as_deref(), Some("rain"));
    }
}
