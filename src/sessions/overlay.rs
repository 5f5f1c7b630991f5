// ABOUTME: Seeds a freshly created register from the session plan prepared for its occurrence
// ABOUTME: Mutates the in-memory register only; the caller owns the transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

//! # Session Plan Overlay
//!
//! A missing plan is the normal case and leaves the register untouched.
//! Trial players are handed back to the caller; they are not enrolled and
//! never become register entries.

use courtside_core::models::{AttendanceStatus, Register, SessionPlan, TrialPlayer};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

/// What applying a plan did to a register
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanApplication {
    /// Whether an applicable plan was supplied
    pub plan_found: bool,
    /// Register entries created from plan entries
    pub entries_added: usize,
    /// Walk-in candidates listed on the plan
    pub trial_players: Vec<TrialPlayer>,
}

/// Overlay `plan` onto `register`
///
/// Each plan entry becomes one predicted register entry whose status comes
/// from [`AttendanceStatus::from_planned`]; students that already have an
/// entry are left alone. Plan notes are appended to the register notes.
/// A plan for a different occurrence or club, or an inactive plan, is
/// treated as no plan.
pub fn apply_plan(register: &mut Register, plan: Option<&SessionPlan>) -> PlanApplication {
    let Some(plan) = plan else {
        return PlanApplication::default();
    };
    if !plan.is_active {
        debug!(plan.id = %plan.id, "Skipping inactive session plan");
        return PlanApplication::default();
    }
    if plan.club_id != register.club_id
        || plan.slot_id != register.slot_id
        || plan.date != register.date
        || plan.teaching_period_id != register.teaching_period_id
    {
        warn!(
            plan.id = %plan.id,
            register.id = %register.id,
            "Session plan does not belong to this register's occurrence"
        );
        return PlanApplication::default();
    }

    let mut entries_added = 0;
    for entry in &plan.entries {
        if register.has_entry_for(entry.student_id) {
            continue;
        }
        register.push_entry(
            entry.student_id,
            AttendanceStatus::from_planned(entry.planned_status),
            true,
            entry.notes.clone(),
        );
        entries_added += 1;
    }

    if let Some(notes) = plan.notes.as_deref() {
        register.append_plan_notes(notes);
    }

    debug!(
        plan.id = %plan.id,
        register.id = %register.id,
        entries_added,
        trial_players = plan.trial_players.len(),
        "Session plan applied"
    );

    PlanApplication {
        plan_found: true,
        entries_added,
        trial_players: plan.trial_players.clone(),
    }
}

/// Give every enrolled student without an entry an absent, non-predicted entry
///
/// Returns the number of entries added.
pub fn fill_baseline(register: &mut Register, enrolled_students: &[Uuid]) -> usize {
    let mut added = 0;
    for student_id in enrolled_students {
        if register.has_entry_for(*student_id) {
            continue;
        }
        register.push_entry(*student_id, AttendanceStatus::Absent, false, None);
        added += 1;
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use courtside_core::models::{ClubId, PlanEntry, PlannedStatus, PlayerType};

    fn register() -> Register {
        Register::new(
            ClubId::new(),
            Uuid::new_v4(),
            NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            Uuid::new_v4(),
            Uuid::new_v4(),
        )
    }

    fn plan_for(register: &Register) -> SessionPlan {
        SessionPlan {
            id: Uuid::new_v4(),
            club_id: register.club_id,
            slot_id: register.slot_id,
            date: register.date,
            teaching_period_id: register.teaching_period_id,
            notes: None,
            is_active: true,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            entries: Vec::new(),
            trial_players: Vec::new(),
        }
    }

    fn entry(plan: &SessionPlan, status: Option<PlannedStatus>, player_type: PlayerType) -> PlanEntry {
        PlanEntry {
            id: Uuid::new_v4(),
            plan_id: plan.id,
            student_id: Uuid::new_v4(),
            planned_status: status,
            player_type,
            notes: None,
        }
    }

    #[test]
    fn test_no_plan_is_a_no_op_every_time() {
        let mut reg = register();
        for _ in 0..2 {
            let outcome = apply_plan(&mut reg, None);
            assert!(!outcome.plan_found);
            assert_eq!(outcome.entries_added, 0);
            assert!(outcome.trial_players.is_empty());
        }
        assert!(reg.entries.is_empty());
        assert_eq!(reg.notes, None);
    }

    #[test]
    fn test_absent_and_makeup_entries() {
        let mut reg = register();
        let mut plan = plan_for(&reg);
        let absent = entry(&plan, Some(PlannedStatus::Absent), PlayerType::Regular);
        let mut makeup = entry(&plan, Some(PlannedStatus::Makeup), PlayerType::Makeup);
        makeup.notes = Some("from Tuesday squad".to_owned());
        plan.entries = vec![absent.clone(), makeup.clone()];

        let outcome = apply_plan(&mut reg, Some(&plan));

        assert!(outcome.plan_found);
        assert_eq!(outcome.entries_added, 2);
        assert_eq!(reg.entries.len(), 2);
        let by_student = |id: Uuid| reg.entries.iter().find(|e| e.student_id == id).unwrap();
        assert_eq!(by_student(absent.student_id).status, AttendanceStatus::AwayWithNotice);
        assert_eq!(by_student(makeup.student_id).status, AttendanceStatus::Present);
        assert_eq!(
            by_student(makeup.student_id).notes.as_deref(),
            Some("from Tuesday squad")
        );
        assert!(reg.entries.iter().all(|e| e.predicted && e.register_id == reg.id));
    }

    #[test]
    fn test_unknown_planned_status_defaults_to_absent() {
        let mut reg = register();
        let mut plan = plan_for(&reg);
        plan.entries = vec![entry(&plan, None, PlayerType::Regular)];

        apply_plan(&mut reg, Some(&plan));
        assert_eq!(reg.entries[0].status, AttendanceStatus::Absent);
    }

    #[test]
    fn test_trial_players_are_returned_not_entered() {
        let mut reg = register();
        let mut plan = plan_for(&reg);
        plan.trial_players = vec![TrialPlayer {
            id: Uuid::new_v4(),
            plan_id: plan.id,
            first_name: "Ada".to_owned(),
            last_name: "Quinn".to_owned(),
            contact_email: Some("ada@example.com".to_owned()),
            contact_phone: None,
            medical_notes: Some("asthma".to_owned()),
            notes: None,
        }];

        let outcome = apply_plan(&mut reg, Some(&plan));
        assert!(outcome.plan_found);
        assert_eq!(outcome.entries_added, 0);
        assert_eq!(outcome.trial_players, plan.trial_players);
        assert!(reg.entries.is_empty());
    }

    #[test]
    fn test_plan_notes_are_appended() {
        let mut reg = register();
        reg.notes = Some("Court 2".to_owned());
        let mut plan = plan_for(&reg);
        plan.notes = Some("Focus on volleys".to_owned());

        apply_plan(&mut reg, Some(&plan));
        assert_eq!(
            reg.notes.as_deref(),
            Some("Court 2\n\nFrom session plan: Focus on volleys")
        );
    }

    #[test]
    fn test_foreign_or_inactive_plan_is_ignored() {
        let mut reg = register();
        let mut other_club = plan_for(&reg);
        other_club.club_id = ClubId::new();
        other_club.entries = vec![entry(&other_club, Some(PlannedStatus::Present), PlayerType::Regular)];
        assert!(!apply_plan(&mut reg, Some(&other_club)).plan_found);

        let mut inactive = plan_for(&reg);
        inactive.is_active = false;
        inactive.entries = vec![entry(&inactive, Some(PlannedStatus::Present), PlayerType::Regular)];
        assert!(!apply_plan(&mut reg, Some(&inactive)).plan_found);
        assert!(reg.entries.is_empty());
    }

    #[test]
    fn test_baseline_fills_only_missing_students() {
        let mut reg = register();
        let mut plan = plan_for(&reg);
        let planned = entry(&plan, Some(PlannedStatus::Present), PlayerType::Regular);
        plan.entries = vec![planned.clone()];
        apply_plan(&mut reg, Some(&plan));

        let other = Uuid::new_v4();
        let added = fill_baseline(&mut reg, &[planned.student_id, other]);
        assert_eq!(added, 1);
        assert_eq!(reg.entries.len(), 2);
        let baseline = reg.entries.iter().find(|e| e.student_id == other).unwrap();
        assert_eq!(baseline.status, AttendanceStatus::Absent);
        assert!(!baseline.predicted);
    }
}
