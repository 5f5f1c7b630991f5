// ABOUTME: Session plan administration: advance plans, planned entries and trial players
// ABOUTME: Planned entries are restricted to students enrolled in the slot's group for the period
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::schedule::{non_blank, require_slot, require_teaching_period};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use courtside_core::models::{PlanEntry, PlannedStatus, PlayerType, SessionPlan, TrialPlayer};
use courtside_core::permissions::Actor;

/// Request to create a plan for an occurrence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPlan {
    /// Slot of the occurrence
    pub slot_id: Uuid,
    /// Date of the occurrence
    pub date: NaiveDate,
    /// Teaching period the plan belongs to
    pub teaching_period_id: Uuid,
    /// Notes carried into the register
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request to add a planned entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPlanEntry {
    /// Enrolled student
    pub student_id: Uuid,
    /// Expected attendance
    pub planned_status: PlannedStatus,
    /// Player classification
    #[serde(default)]
    pub player_type: PlayerType,
    /// Notes carried into the register entry
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request to add a trial player
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTrialPlayer {
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Contact email
    #[serde(default)]
    pub contact_email: Option<String>,
    /// Contact phone number
    #[serde(default)]
    pub contact_phone: Option<String>,
    /// Medical information
    #[serde(default)]
    pub medical_notes: Option<String>,
    /// Free-text notes
    #[serde(default)]
    pub notes: Option<String>,
}

/// Create an active plan for an occurrence
///
/// # Errors
///
/// Returns a not-found error for a slot or period outside the club, a
/// permission error unless the actor is an admin or the slot's coach, a
/// validation error if the slot does not run on `date` or the date is outside
/// the period, or a conflict error if the occurrence already has a plan
pub async fn create_plan(database: &Database, actor: &Actor, plan: &NewPlan) -> AppResult<SessionPlan> {
    let slot = require_slot(database, actor, plan.slot_id).await?;
    authorize_planning(database, actor, slot.id).await?;
    if !slot.occurs_on(plan.date) {
        return Err(AppError::invalid_input(format!(
            "Slot runs on {}, not on {}",
            slot.day_of_week.as_str(),
            plan.date
        )));
    }
    let period = require_teaching_period(database, actor, plan.teaching_period_id).await?;
    if !period.contains(plan.date) {
        return Err(AppError::out_of_range(format!(
            "{} is outside teaching period '{}'",
            plan.date, period.name
        )));
    }

    let created = database
        .plans()
        .create(
            actor.club_id,
            slot.id,
            plan.date,
            period.id,
            non_blank(plan.notes.as_deref()),
            actor.user_id,
        )
        .await?;
    info!(club.id = %actor.club_id, slot.id = %slot.id, plan.id = %created.id, "Session plan created");
    Ok(created)
}

/// Add a planned entry for a student enrolled in the slot's group
///
/// # Errors
///
/// Returns a not-found error if the plan is not in the club, a permission
/// error unless the actor may plan the slot, a validation error if the student
/// is not enrolled for the plan's period, or a conflict error if the student
/// already has an entry
pub async fn add_plan_entry(
    database: &Database,
    actor: &Actor,
    plan_id: Uuid,
    entry: &NewPlanEntry,
) -> AppResult<PlanEntry> {
    let plan = get_plan(database, actor, plan_id).await?;
    authorize_planning(database, actor, plan.slot_id).await?;
    let slot = require_slot(database, actor, plan.slot_id).await?;

    let enrolled = database
        .slots()
        .is_enrolled(actor.club_id, entry.student_id, slot.group_id, plan.teaching_period_id)
        .await?;
    if !enrolled {
        return Err(AppError::invalid_input(
            "Student is not enrolled in this group for the plan's teaching period",
        )
        .with_resource_id(entry.student_id.to_string()));
    }

    database
        .plans()
        .add_entry(
            actor.club_id,
            plan.id,
            entry.student_id,
            entry.planned_status,
            entry.player_type,
            non_blank(entry.notes.as_deref()),
        )
        .await
}

/// Add a trial player to a plan
///
/// # Errors
///
/// Returns a not-found error if the plan is not in the club, a permission
/// error unless the actor may plan the slot, or a validation error for a missing name
pub async fn add_trial_player(
    database: &Database,
    actor: &Actor,
    plan_id: Uuid,
    trial: &NewTrialPlayer,
) -> AppResult<TrialPlayer> {
    let first_name = trial.first_name.trim();
    if first_name.is_empty() {
        return Err(AppError::missing_field("first_name"));
    }
    let last_name = trial.last_name.trim();
    if last_name.is_empty() {
        return Err(AppError::missing_field("last_name"));
    }

    let plan = get_plan(database, actor, plan_id).await?;
    authorize_planning(database, actor, plan.slot_id).await?;

    let trial = TrialPlayer {
        id: Uuid::new_v4(),
        plan_id: plan.id,
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        contact_email: non_blank(trial.contact_email.as_deref()),
        contact_phone: non_blank(trial.contact_phone.as_deref()),
        medical_notes: non_blank(trial.medical_notes.as_deref()),
        notes: non_blank(trial.notes.as_deref()),
    };
    database.plans().add_trial_player(actor.club_id, &trial).await?;
    Ok(trial)
}

/// Get a plan with its entries and trial players
///
/// # Errors
///
/// Returns a not-found error if the plan is not in the actor's club
pub async fn get_plan(database: &Database, actor: &Actor, plan_id: Uuid) -> AppResult<SessionPlan> {
    database
        .plans()
        .get(actor.club_id, plan_id)
        .await?
        .ok_or_else(|| AppError::not_found("Session plan").with_resource_id(plan_id.to_string()))
}

/// Deactivate a plan; registers opened afterwards are seeded as if it never existed
///
/// Registers already opened keep the entries the plan seeded.
///
/// # Errors
///
/// Returns a not-found error if the plan is not in the club or a permission
/// error unless the actor may plan the slot
pub async fn deactivate_plan(database: &Database, actor: &Actor, plan_id: Uuid) -> AppResult<SessionPlan> {
    let plan = get_plan(database, actor, plan_id).await?;
    authorize_planning(database, actor, plan.slot_id).await?;
    database.plans().deactivate(actor.club_id, plan.id).await
}

async fn authorize_planning(database: &Database, actor: &Actor, slot_id: Uuid) -> AppResult<()> {
    if actor.is_admin() {
        return Ok(());
    }
    let coaches = database.slots().slot_coaches(actor.club_id, slot_id).await?;
    actor.require_admin_or_assigned(&coaches, "plan this session")
}
