// ABOUTME: Weekly schedule administration: groups, slots, coach assignment and teaching periods
// ABOUTME: Students and enrollments too; every write checks the admin role and club ownership
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::database::Database;
use crate::errors::{AppError, AppResult};
use courtside_core::models::{
    CoachingGroup, DayOfWeek, Enrollment, GroupTimeSlot, Student, TeachingPeriod,
};
use courtside_core::permissions::Actor;

/// Request to create a weekly slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSlot {
    /// Group meeting in the slot
    pub group_id: Uuid,
    /// Day of the week
    pub day_of_week: DayOfWeek,
    /// Start time
    pub start_time: NaiveTime,
    /// End time, after `start_time`
    pub end_time: NaiveTime,
    /// Player limit, at least 1 when present
    #[serde(default)]
    pub capacity: Option<u32>,
}

/// Request to create a student
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewStudent {
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Contact email
    #[serde(default)]
    pub contact_email: Option<String>,
    /// Medical information
    #[serde(default)]
    pub medical_notes: Option<String>,
}

impl NewStudent {
    /// Trim fields and reject missing names
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the missing field
    pub fn normalized(&self) -> AppResult<Self> {
        let first_name = self.first_name.trim();
        if first_name.is_empty() {
            return Err(AppError::missing_field("first_name"));
        }
        let last_name = self.last_name.trim();
        if last_name.is_empty() {
            return Err(AppError::missing_field("last_name"));
        }
        Ok(Self {
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            contact_email: non_blank(self.contact_email.as_deref()),
            medical_notes: non_blank(self.medical_notes.as_deref()),
        })
    }
}

/// Trimmed value, or `None` when blank
pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToOwned::to_owned)
}

/// Create a coaching group
///
/// # Errors
///
/// Returns a permission error for non-admins, a validation error for an
/// empty name, or a conflict error for a duplicate name
pub async fn create_group(
    database: &Database,
    actor: &Actor,
    name: &str,
    description: Option<&str>,
) -> AppResult<CoachingGroup> {
    actor.require_admin("create coaching groups")?;
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::missing_field("name"));
    }
    database
        .slots()
        .create_group(actor.club_id, name, non_blank(description).as_deref())
        .await
}

/// Create a weekly slot for a group of the actor's club
///
/// # Errors
///
/// Returns a permission error for non-admins, a validation error for an
/// inverted time window or zero capacity, or a not-found error if the group
/// is not in the club
pub async fn create_slot(database: &Database, actor: &Actor, slot: &NewSlot) -> AppResult<GroupTimeSlot> {
    actor.require_admin("create time slots")?;
    if slot.end_time <= slot.start_time {
        return Err(AppError::out_of_range(format!(
            "end_time ({}) must be after start_time ({})",
            slot.end_time, slot.start_time
        )));
    }
    if slot.capacity == Some(0) {
        return Err(AppError::out_of_range("capacity must be at least 1"));
    }
    if database
        .slots()
        .get_group(actor.club_id, slot.group_id)
        .await?
        .is_none()
    {
        return Err(AppError::not_found("Coaching group"));
    }

    let created = database
        .slots()
        .create_slot(
            actor.club_id,
            slot.group_id,
            slot.day_of_week,
            slot.start_time,
            slot.end_time,
            slot.capacity,
        )
        .await?;
    info!(club.id = %actor.club_id, slot.id = %created.id, "Time slot created");
    Ok(created)
}

/// Assign a club member as coach of a slot
///
/// # Errors
///
/// Returns a permission error for non-admins, a not-found error if the slot
/// or the coach is not in the club, or a conflict error if already assigned
pub async fn assign_coach(
    database: &Database,
    actor: &Actor,
    slot_id: Uuid,
    coach_id: Uuid,
) -> AppResult<()> {
    actor.require_admin("assign coaches")?;
    require_slot(database, actor, slot_id).await?;
    if database
        .clubs()
        .get_member(actor.club_id, coach_id)
        .await?
        .is_none()
    {
        return Err(AppError::not_found("Coach"));
    }
    database
        .slots()
        .assign_coach(actor.club_id, slot_id, coach_id)
        .await
}

/// Create a teaching period
///
/// # Errors
///
/// Returns a permission error for non-admins or a validation error if the
/// period ends before it starts
pub async fn create_teaching_period(
    database: &Database,
    actor: &Actor,
    name: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> AppResult<TeachingPeriod> {
    actor.require_admin("create teaching periods")?;
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::missing_field("name"));
    }
    if end_date < start_date {
        return Err(AppError::out_of_range(format!(
            "end_date ({end_date}) is before start_date ({start_date})"
        )));
    }
    database
        .slots()
        .create_teaching_period(actor.club_id, name, start_date, end_date)
        .await
}

/// Create a student
///
/// # Errors
///
/// Returns a permission error for non-admins or a validation error for a missing name
pub async fn create_student(database: &Database, actor: &Actor, student: &NewStudent) -> AppResult<Student> {
    actor.require_admin("create students")?;
    let student = student.normalized()?;
    database
        .slots()
        .create_student(
            actor.club_id,
            &student.first_name,
            &student.last_name,
            student.contact_email.as_deref(),
            student.medical_notes.as_deref(),
        )
        .await
}

/// Enroll a student in a group for a teaching period
///
/// # Errors
///
/// Returns a permission error for non-admins, a not-found error if any
/// referenced record is outside the club, or a conflict error if already enrolled
pub async fn enroll_student(
    database: &Database,
    actor: &Actor,
    student_id: Uuid,
    group_id: Uuid,
    teaching_period_id: Uuid,
) -> AppResult<Enrollment> {
    actor.require_admin("enroll students")?;
    let slots = database.slots();
    if slots.get_student(actor.club_id, student_id).await?.is_none() {
        return Err(AppError::not_found("Student"));
    }
    if slots.get_group(actor.club_id, group_id).await?.is_none() {
        return Err(AppError::not_found("Coaching group"));
    }
    require_teaching_period(database, actor, teaching_period_id).await?;
    slots
        .enroll(actor.club_id, student_id, group_id, teaching_period_id)
        .await
}

/// Students actively enrolled in a slot's group for a teaching period, ordered by name
///
/// # Errors
///
/// Returns a not-found error if the slot or period is outside the club
pub async fn enrolled_students(
    database: &Database,
    actor: &Actor,
    slot_id: Uuid,
    teaching_period_id: Uuid,
) -> AppResult<Vec<Student>> {
    let slot = require_slot(database, actor, slot_id).await?;
    let period = require_teaching_period(database, actor, teaching_period_id).await?;
    let slots = database.slots();
    let mut students = Vec::new();
    for student_id in slots
        .enrolled_students(actor.club_id, slot.group_id, period.id)
        .await?
    {
        if let Some(student) = slots.get_student(actor.club_id, student_id).await? {
            students.push(student);
        }
    }
    Ok(students)
}

/// Load a slot of the actor's club
///
/// # Errors
///
/// Returns a not-found error if the slot is missing or belongs to another club
pub async fn require_slot(database: &Database, actor: &Actor, slot_id: Uuid) -> AppResult<GroupTimeSlot> {
    database
        .slots()
        .get_slot(actor.club_id, slot_id)
        .await?
        .ok_or_else(|| AppError::not_found("Time slot").with_resource_id(slot_id.to_string()))
}

/// Load a teaching period of the actor's club
///
/// # Errors
///
/// Returns a not-found error if the period is missing or belongs to another club
pub async fn require_teaching_period(
    database: &Database,
    actor: &Actor,
    teaching_period_id: Uuid,
) -> AppResult<TeachingPeriod> {
    database
        .slots()
        .get_teaching_period(actor.club_id, teaching_period_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found("Teaching period").with_resource_id(teaching_period_id.to_string())
        })
}
