// ABOUTME: Register materialisation: opening a session seeds entries from its plan and enrollments
// ABOUTME: Also raw register/entry creation, attendance marking and assistant coaches
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::schedule::{non_blank, require_slot, require_teaching_period};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::sessions::{apply_plan, fill_baseline, is_cancelled, PlanApplication};
use courtside_core::models::{
    AttendanceStatus, DayOfWeek, GroupTimeSlot, Register, RegisterEntry, TeachingPeriod,
};
use courtside_core::permissions::Actor;

/// Request to open the register of an occurrence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenRegisterRequest {
    /// Slot of the occurrence
    pub slot_id: Uuid,
    /// Date of the occurrence
    pub date: NaiveDate,
    /// Teaching period; defaults to the period containing `date`
    #[serde(default)]
    pub teaching_period_id: Option<Uuid>,
    /// Initial register notes
    #[serde(default)]
    pub notes: Option<String>,
}

/// Result of opening a register
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenedRegister {
    /// The register, with entries
    pub register: Register,
    /// False when the occurrence already had a register
    pub created: bool,
    /// Plan overlay outcome; empty when the register already existed
    pub plan: PlanApplication,
    /// Absent entries added for enrolled students the plan did not cover
    pub baseline_entries: usize,
}

impl OpenedRegister {
    fn existing(register: Register) -> Self {
        Self {
            register,
            created: false,
            plan: PlanApplication::default(),
            baseline_entries: 0,
        }
    }
}

/// Open the register of an occurrence, creating and seeding it if needed
///
/// A new register receives one predicted entry per plan entry, then an
/// absent entry for every other enrolled student, and is written in one
/// transaction. If the occurrence already has a register, or another request
/// creates it first, the existing register is returned with `created = false`.
///
/// # Errors
///
/// Returns a not-found error for a slot or period outside the club, a
/// permission error unless the actor is an admin or the slot's coach, or a
/// validation error if the slot does not run on `date` or the occurrence is cancelled
pub async fn open_register(
    database: &Database,
    actor: &Actor,
    request: &OpenRegisterRequest,
) -> AppResult<OpenedRegister> {
    let slot = require_slot(database, actor, request.slot_id).await?;
    authorize_slot(database, actor, &slot, "open this register").await?;
    require_occurs_on(&slot, request.date)?;
    let period = occurrence_period(database, actor, request.teaching_period_id, request.date).await?;

    let registers = database.registers();
    if let Some(existing) = registers
        .find_for_occurrence(actor.club_id, slot.id, request.date)
        .await?
    {
        debug!(register.id = %existing.id, "Register already open");
        return Ok(OpenedRegister::existing(existing));
    }

    let cancellations = database.cancellations().list_active(actor.club_id).await?;
    let check = is_cancelled(&cancellations, slot.id, request.date);
    if check.cancelled {
        let reason = check.reason.as_deref().unwrap_or("no reason given");
        return Err(AppError::invalid_input(format!(
            "Session on {} is cancelled: {reason}",
            request.date
        )));
    }

    let plan = database
        .plans()
        .find_active(actor.club_id, slot.id, request.date, period.id)
        .await?;
    let enrolled = database
        .slots()
        .enrolled_students(actor.club_id, slot.group_id, period.id)
        .await?;

    let mut register = Register::new(actor.club_id, slot.id, request.date, period.id, actor.user_id);
    register.notes = non_blank(request.notes.as_deref());
    let application = apply_plan(&mut register, plan.as_ref());
    let baseline_entries = fill_baseline(&mut register, &enrolled);

    match registers.insert(&register).await {
        Ok(()) => {
            info!(
                club.id = %actor.club_id,
                register.id = %register.id,
                plan_found = application.plan_found,
                planned_entries = application.entries_added,
                baseline_entries,
                "Register opened"
            );
            Ok(OpenedRegister {
                register,
                created: true,
                plan: application,
                baseline_entries,
            })
        }
        Err(error) if error.is_conflict() => {
            let existing = registers
                .find_for_occurrence(actor.club_id, slot.id, request.date)
                .await?
                .ok_or(error)?;
            debug!(register.id = %existing.id, "Register opened concurrently");
            Ok(OpenedRegister::existing(existing))
        }
        Err(error) => Err(error),
    }
}

/// Create an empty register for an occurrence
///
/// # Errors
///
/// Returns a conflict error if the occurrence already has a register, plus
/// the not-found, permission and validation errors of [`open_register`]
pub async fn create_register(
    database: &Database,
    actor: &Actor,
    slot_id: Uuid,
    date: NaiveDate,
    teaching_period_id: Uuid,
    notes: Option<&str>,
) -> AppResult<Register> {
    let slot = require_slot(database, actor, slot_id).await?;
    authorize_slot(database, actor, &slot, "create this register").await?;
    require_occurs_on(&slot, date)?;
    let period = occurrence_period(database, actor, Some(teaching_period_id), date).await?;

    let mut register = Register::new(actor.club_id, slot.id, date, period.id, actor.user_id);
    register.notes = non_blank(notes);
    database.registers().insert(&register).await?;
    Ok(register)
}

/// Get a register of the actor's club
///
/// # Errors
///
/// Returns a not-found error if the register is not in the club
pub async fn get_register(database: &Database, actor: &Actor, register_id: Uuid) -> AppResult<Register> {
    database
        .registers()
        .get(actor.club_id, register_id)
        .await?
        .ok_or_else(|| AppError::not_found("Register").with_resource_id(register_id.to_string()))
}

/// Add an entry for a student of the club
///
/// # Errors
///
/// Returns a not-found error for a register or student outside the club, a
/// permission error unless the actor may record this register, or a conflict
/// error if the student already has an entry
pub async fn add_entry(
    database: &Database,
    actor: &Actor,
    register_id: Uuid,
    student_id: Uuid,
    status: AttendanceStatus,
    notes: Option<&str>,
) -> AppResult<RegisterEntry> {
    let register = get_register(database, actor, register_id).await?;
    authorize_register(database, actor, &register).await?;
    if database
        .slots()
        .get_student(actor.club_id, student_id)
        .await?
        .is_none()
    {
        return Err(AppError::not_found("Student"));
    }

    let entry = RegisterEntry {
        id: Uuid::new_v4(),
        register_id: register.id,
        student_id,
        status,
        predicted: false,
        notes: non_blank(notes),
    };
    database.registers().add_entry(actor.club_id, &entry).await?;
    Ok(entry)
}

/// Record what actually happened for a student, replacing any forecast
///
/// # Errors
///
/// Returns a not-found error if the register or the student's entry is
/// missing, or a permission error unless the actor may record this register
pub async fn mark_attendance(
    database: &Database,
    actor: &Actor,
    register_id: Uuid,
    student_id: Uuid,
    status: AttendanceStatus,
    notes: Option<&str>,
) -> AppResult<RegisterEntry> {
    let register = get_register(database, actor, register_id).await?;
    authorize_register(database, actor, &register).await?;
    database
        .registers()
        .record_attendance(actor.club_id, register.id, student_id, status, non_blank(notes))
        .await
}

/// Add an assistant coach to a register
///
/// # Errors
///
/// Returns a not-found error if the register or the assistant is not in the
/// club, a permission error unless the actor may record this register, or a
/// conflict error if the assistant is already listed
pub async fn add_assistant(
    database: &Database,
    actor: &Actor,
    register_id: Uuid,
    assistant_id: Uuid,
) -> AppResult<Register> {
    let register = get_register(database, actor, register_id).await?;
    authorize_register(database, actor, &register).await?;
    if database
        .clubs()
        .get_member(actor.club_id, assistant_id)
        .await?
        .is_none()
    {
        return Err(AppError::not_found("Coach"));
    }
    database
        .registers()
        .add_assistant(actor.club_id, register.id, assistant_id)
        .await?;
    get_register(database, actor, register.id).await
}

async fn authorize_slot(
    database: &Database,
    actor: &Actor,
    slot: &GroupTimeSlot,
    action: &str,
) -> AppResult<()> {
    if actor.is_admin() {
        return Ok(());
    }
    let coaches = database.slots().slot_coaches(actor.club_id, slot.id).await?;
    actor.require_admin_or_assigned(&coaches, action)
}

/// Admins, the recording coach, the slot's coaches and listed assistants
async fn authorize_register(database: &Database, actor: &Actor, register: &Register) -> AppResult<()> {
    if actor.is_admin()
        || register.coach_id == actor.user_id
        || register.assistant_coach_ids.contains(&actor.user_id)
    {
        return Ok(());
    }
    let coaches = database
        .slots()
        .slot_coaches(actor.club_id, register.slot_id)
        .await?;
    actor.require_admin_or_assigned(&coaches, "record attendance for this register")
}

fn require_occurs_on(slot: &GroupTimeSlot, date: NaiveDate) -> AppResult<()> {
    let weekday = DayOfWeek::of(date);
    if slot.occurs_on(date) {
        Ok(())
    } else {
        Err(AppError::invalid_input(format!(
            "Slot runs on {}; {date} is a {}",
            slot.day_of_week.as_str(),
            weekday.as_str()
        )))
    }
}

async fn occurrence_period(
    database: &Database,
    actor: &Actor,
    teaching_period_id: Option<Uuid>,
    date: NaiveDate,
) -> AppResult<TeachingPeriod> {
    let period = match teaching_period_id {
        Some(period_id) => require_teaching_period(database, actor, period_id).await?,
        None => database
            .slots()
            .teaching_period_for_date(actor.club_id, date)
            .await?
            .ok_or_else(|| AppError::missing_field("teaching_period_id"))?,
    };
    if !period.contains(date) {
        return Err(AppError::out_of_range(format!(
            "{date} is outside teaching period '{}' ({} to {})",
            period.name, period.start_date, period.end_date
        )));
    }
    Ok(period)
}
