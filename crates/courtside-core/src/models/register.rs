// ABOUTME: Registers: the realised attendance record of one slot occurrence
// ABOUTME: Register, RegisterEntry and AttendanceStatus with the planned-status mapping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

use super::club::ClubId;
use super::plan::PlannedStatus;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix written before plan notes appended to a register
pub const PLAN_NOTES_PREFIX: &str = "From session plan:";

/// Attendance of a student at one occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Attended
    Present,
    /// Did not attend, no notice
    Absent,
    /// Did not attend, gave notice in advance
    AwayWithNotice,
    /// Did not attend because of illness or injury
    Sick,
}

impl AttendanceStatus {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
            Self::AwayWithNotice => "away_with_notice",
            Self::Sick => "sick",
        }
    }

    /// Parse from database string representation; unknown values read as absent
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "present" => Self::Present,
            "away_with_notice" => Self::AwayWithNotice,
            "sick" => Self::Sick,
            _ => Self::Absent,
        }
    }

    /// Attendance a planned status turns into when a register is seeded
    ///
    /// Unrecognised planned statuses map to `Absent`.
    #[must_use]
    pub const fn from_planned(planned: Option<PlannedStatus>) -> Self {
        match planned {
            Some(PlannedStatus::Present | PlannedStatus::Trial | PlannedStatus::Makeup) => {
                Self::Present
            }
            Some(PlannedStatus::Absent) => Self::AwayWithNotice,
            None => Self::Absent,
        }
    }
}

/// Attendance of one student in one register
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterEntry {
    /// Unique identifier
    pub id: Uuid,
    /// Register this entry belongs to
    pub register_id: Uuid,
    /// Enrolled student
    pub student_id: Uuid,
    /// Recorded or forecast attendance
    pub status: AttendanceStatus,
    /// True while the status is a forecast rather than what the coach recorded
    pub predicted: bool,
    /// Free-text notes
    pub notes: Option<String>,
}

/// The materialised attendance record of one slot occurrence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Register {
    /// Unique identifier
    pub id: Uuid,
    /// Owning club
    pub club_id: ClubId,
    /// Slot the occurrence belongs to
    pub slot_id: Uuid,
    /// Date of the occurrence
    pub date: NaiveDate,
    /// Teaching period the register is recorded under
    pub teaching_period_id: Uuid,
    /// Coach recording attendance
    pub coach_id: Uuid,
    /// Assistant coaches present
    pub assistant_coach_ids: Vec<Uuid>,
    /// Free-text notes
    pub notes: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// One entry per student
    pub entries: Vec<RegisterEntry>,
}

impl Register {
    /// New, empty register for an occurrence
    #[must_use]
    pub fn new(
        club_id: ClubId,
        slot_id: Uuid,
        date: NaiveDate,
        teaching_period_id: Uuid,
        coach_id: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            club_id,
            slot_id,
            date,
            teaching_period_id,
            coach_id,
            assistant_coach_ids: Vec::new(),
            notes: None,
            created_at: Utc::now(),
            entries: Vec::new(),
        }
    }

    /// Whether an entry for `student_id` is already present
    #[must_use]
    pub fn has_entry_for(&self, student_id: Uuid) -> bool {
        self.entries.iter().any(|entry| entry.student_id == student_id)
    }

    /// Add an entry for a student
    pub fn push_entry(
        &mut self,
        student_id: Uuid,
        status: AttendanceStatus,
        predicted: bool,
        notes: Option<String>,
    ) {
        self.entries.push(RegisterEntry {
            id: Uuid::new_v4(),
            register_id: self.id,
            student_id,
            status,
            predicted,
            notes,
        });
    }

    /// Append plan notes, keeping existing notes above a blank line
    pub fn append_plan_notes(&mut self, plan_notes: &str) {
        let plan_notes = plan_notes.trim();
        if plan_notes.is_empty() {
            return;
        }
        let attributed = format!("{PLAN_NOTES_PREFIX} {plan_notes}");
        self.notes = Some(match self.notes.take() {
            Some(existing) if !existing.trim().is_empty() => format!("{existing}\n\n{attributed}"),
            _ => attributed,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register() -> Register {
        Register::new(
            ClubId::new(),
            Uuid::new_v4(),
            NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            Uuid::new_v4(),
            Uuid::new_v4(),
        )
    }

    #[test]
    fn test_planned_status_mapping() {
        assert_eq!(
            AttendanceStatus::from_planned(Some(PlannedStatus::Present)),
            AttendanceStatus::Present
        );
        assert_eq!(
            AttendanceStatus::from_planned(Some(PlannedStatus::Absent)),
            AttendanceStatus::AwayWithNotice
        );
        assert_eq!(
            AttendanceStatus::from_planned(Some(PlannedStatus::Trial)),
            AttendanceStatus::Present
        );
        assert_eq!(
            AttendanceStatus::from_planned(Some(PlannedStatus::Makeup)),
            AttendanceStatus::Present
        );
        assert_eq!(AttendanceStatus::from_planned(None), AttendanceStatus::Absent);
    }

    #[test]
    fn test_append_plan_notes_to_empty_register() {
        let mut reg = register();
        reg.append_plan_notes("Bring ball machine");
        assert_eq!(
            reg.notes.as_deref(),
            Some("From session plan: Bring ball machine")
        );
    }

    #[test]
    fn test_append_plan_notes_preserves_existing() {
        let mut reg = register();
        reg.notes = Some("Court 3 wet".to_owned());
        reg.append_plan_notes("Serve practice");
        assert_eq!(
            reg.notes.as_deref(),
            Some("Court 3 wet\n\nFrom session plan: Serve practice")
        );
    }

    #[test]
    fn test_blank_plan_notes_are_ignored() {
        let mut reg = register();
        reg.notes = Some("keep".to_owned());
        reg.append_plan_notes("  ");
        assert_eq!(reg.notes.as_deref(), Some("keep"));
    }
}
