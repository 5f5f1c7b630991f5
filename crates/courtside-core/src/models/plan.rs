// ABOUTME: Advance session plans that seed a register when it is first opened
// ABOUTME: SessionPlan, PlanEntry, TrialPlayer and the planned-status / player-type enums
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

use super::club::ClubId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Expected attendance of an enrolled student for a planned occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlannedStatus {
    /// Expected to attend
    Present,
    /// Announced absence
    Absent,
    /// Attending as a trial player
    Trial,
    /// Attending to make up a missed session
    Makeup,
}

impl PlannedStatus {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "planned_present",
            Self::Absent => "planned_absent",
            Self::Trial => "trial_player",
            Self::Makeup => "makeup_player",
        }
    }

    /// Parse from database string representation; unknown values yield `None`
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "planned_present" | "present" => Some(Self::Present),
            "planned_absent" | "absent" => Some(Self::Absent),
            "trial_player" | "trial" => Some(Self::Trial),
            "makeup_player" | "makeup" => Some(Self::Makeup),
            _ => None,
        }
    }
}

/// Classification of a player within a planned session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerType {
    /// Regular member of the group
    #[default]
    Regular,
    /// Visiting from another group to make up a session
    Makeup,
    /// Trying the group before enrolling
    Trial,
}

impl PlayerType {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Makeup => "makeup",
            Self::Trial => "trial",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "makeup" => Self::Makeup,
            "trial" => Self::Trial,
            _ => Self::Regular,
        }
    }
}

/// Planned attendance of one enrolled student
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanEntry {
    /// Unique identifier
    pub id: Uuid,
    /// Plan this entry belongs to
    pub plan_id: Uuid,
    /// Enrolled student
    pub student_id: Uuid,
    /// Planned status; `None` when a stored value is not recognised
    pub planned_status: Option<PlannedStatus>,
    /// Player classification
    pub player_type: PlayerType,
    /// Coach notes carried into the register entry
    pub notes: Option<String>,
}

/// Walk-in candidate who is not enrolled yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialPlayer {
    /// Unique identifier
    pub id: Uuid,
    /// Plan this trial belongs to
    pub plan_id: Uuid,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Contact email
    pub contact_email: Option<String>,
    /// Contact phone number
    pub contact_phone: Option<String>,
    /// Medical information
    pub medical_notes: Option<String>,
    /// Free-text notes
    pub notes: Option<String>,
}

/// Advance plan for one occurrence: (slot, date, teaching period)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionPlan {
    /// Unique identifier
    pub id: Uuid,
    /// Owning club
    pub club_id: ClubId,
    /// Planned slot
    pub slot_id: Uuid,
    /// Date of the planned occurrence
    pub date: NaiveDate,
    /// Teaching period the plan belongs to
    pub teaching_period_id: Uuid,
    /// Notes appended to the register when the plan is applied
    pub notes: Option<String>,
    /// Inactive plans are never applied
    pub is_active: bool,
    /// User who prepared the plan
    pub created_by: Uuid,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// One entry per enrolled student
    pub entries: Vec<PlanEntry>,
    /// Walk-in candidates
    pub trial_players: Vec<TrialPlayer>,
}
