// ABOUTME: Weekly schedule persistence: groups, time slots, coach assignments and teaching periods
// ABOUTME: Also stores students and their enrollments, which registers are built from
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

use super::{club_column, timestamp_value, uuid_column, write_error};
use crate::errors::{AppError, AppResult};
use chrono::{NaiveDate, NaiveTime, Utc};
use courtside_core::models::{
    ClubId, CoachingGroup, DayOfWeek, Enrollment, GroupTimeSlot, Student, TeachingPeriod,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};
use std::collections::HashSet;
use uuid::Uuid;

/// Schedule database operations manager
pub struct SlotsManager {
    pool: SqlitePool,
}

impl SlotsManager {
    /// Create a new schedule manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ================================================================
    // Groups
    // ================================================================

    /// Create a coaching group
    ///
    /// # Errors
    ///
    /// Returns a conflict error if the club already has a group with this name
    pub async fn create_group(
        &self,
        club_id: ClubId,
        name: &str,
        description: Option<&str>,
    ) -> AppResult<CoachingGroup> {
        let group = CoachingGroup {
            id: Uuid::new_v4(),
            club_id,
            name: name.to_owned(),
            description: description.map(ToOwned::to_owned),
        };

        sqlx::query(
            "INSERT INTO coaching_groups (id, club_id, name, description) VALUES ($1, $2, $3, $4)",
        )
        .bind(group.id.to_string())
        .bind(club_id.to_string())
        .bind(&group.name)
        .bind(&group.description)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("Coaching group", &e))?;

        Ok(group)
    }

    /// Get a group by ID within a club
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_group(&self, club_id: ClubId, group_id: Uuid) -> AppResult<Option<CoachingGroup>> {
        let row = sqlx::query(
            "SELECT id, club_id, name, description FROM coaching_groups WHERE id = $1 AND club_id = $2",
        )
        .bind(group_id.to_string())
        .bind(club_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get coaching group: {e}")))?;

        row.as_ref().map(row_to_group).transpose()
    }

    /// List a club's groups ordered by name
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_groups(&self, club_id: ClubId) -> AppResult<Vec<CoachingGroup>> {
        let rows = sqlx::query(
            "SELECT id, club_id, name, description FROM coaching_groups WHERE club_id = $1 ORDER BY name",
        )
        .bind(club_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list coaching groups: {e}")))?;

        rows.iter().map(row_to_group).collect()
    }

    // ================================================================
    // Time slots
    // ================================================================

    /// Create a weekly time slot for a group
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails
    pub async fn create_slot(
        &self,
        club_id: ClubId,
        group_id: Uuid,
        day_of_week: DayOfWeek,
        start_time: NaiveTime,
        end_time: NaiveTime,
        capacity: Option<u32>,
    ) -> AppResult<GroupTimeSlot> {
        let slot = GroupTimeSlot {
            id: Uuid::new_v4(),
            club_id,
            group_id,
            day_of_week,
            start_time,
            end_time,
            capacity,
        };

        sqlx::query(
            r"
            INSERT INTO group_time_slots (id, club_id, group_id, day_of_week, start_time, end_time, capacity)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(slot.id.to_string())
        .bind(club_id.to_string())
        .bind(group_id.to_string())
        .bind(day_of_week.as_str())
        .bind(start_time)
        .bind(end_time)
        .bind(capacity.map(i64::from))
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("Time slot", &e))?;

        Ok(slot)
    }

    /// Get a slot by ID within a club
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_slot(&self, club_id: ClubId, slot_id: Uuid) -> AppResult<Option<GroupTimeSlot>> {
        let row = sqlx::query(
            r"
            SELECT id, club_id, group_id, day_of_week, start_time, end_time, capacity
            FROM group_time_slots
            WHERE id = $1 AND club_id = $2
            ",
        )
        .bind(slot_id.to_string())
        .bind(club_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get time slot: {e}")))?;

        row.as_ref().map(row_to_slot).transpose()
    }

    /// List a club's slots in schedule order (day, start time)
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_slots(&self, club_id: ClubId) -> AppResult<Vec<GroupTimeSlot>> {
        let rows = sqlx::query(
            r"
            SELECT id, club_id, group_id, day_of_week, start_time, end_time, capacity
            FROM group_time_slots
            WHERE club_id = $1
            ",
        )
        .bind(club_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list time slots: {e}")))?;

        let mut slots = rows.iter().map(row_to_slot).collect::<AppResult<Vec<_>>>()?;
        slots.sort_by(GroupTimeSlot::schedule_order);
        Ok(slots)
    }

    /// Assign a coach to a slot
    ///
    /// # Errors
    ///
    /// Returns a conflict error if the coach is already assigned
    pub async fn assign_coach(&self, club_id: ClubId, slot_id: Uuid, user_id: Uuid) -> AppResult<()> {
        sqlx::query("INSERT INTO slot_coaches (slot_id, club_id, user_id) VALUES ($1, $2, $3)")
            .bind(slot_id.to_string())
            .bind(club_id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| write_error("Coach assignment", &e))?;
        Ok(())
    }

    /// Coaches assigned to a slot
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn slot_coaches(&self, club_id: ClubId, slot_id: Uuid) -> AppResult<Vec<Uuid>> {
        let rows = sqlx::query(
            "SELECT user_id FROM slot_coaches WHERE slot_id = $1 AND club_id = $2 ORDER BY user_id",
        )
        .bind(slot_id.to_string())
        .bind(club_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list slot coaches: {e}")))?;

        rows.iter().map(|row| uuid_column(row, "user_id")).collect()
    }

    // ================================================================
    // Teaching periods
    // ================================================================

    /// Create a teaching period
    ///
    /// # Errors
    ///
    /// Returns a conflict error if the club already has a period with this name
    pub async fn create_teaching_period(
        &self,
        club_id: ClubId,
        name: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> AppResult<TeachingPeriod> {
        let period = TeachingPeriod {
            id: Uuid::new_v4(),
            club_id,
            name: name.to_owned(),
            start_date,
            end_date,
        };

        sqlx::query(
            r"
            INSERT INTO teaching_periods (id, club_id, name, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(period.id.to_string())
        .bind(club_id.to_string())
        .bind(&period.name)
        .bind(start_date)
        .bind(end_date)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("Teaching period", &e))?;

        Ok(period)
    }

    /// Get a teaching period by ID within a club
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_teaching_period(
        &self,
        club_id: ClubId,
        period_id: Uuid,
    ) -> AppResult<Option<TeachingPeriod>> {
        let row = sqlx::query(
            r"
            SELECT id, club_id, name, start_date, end_date
            FROM teaching_periods
            WHERE id = $1 AND club_id = $2
            ",
        )
        .bind(period_id.to_string())
        .bind(club_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get teaching period: {e}")))?;

        row.as_ref().map(row_to_period).transpose()
    }

    /// Teaching period containing `date`, earliest-starting first if several overlap
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn teaching_period_for_date(
        &self,
        club_id: ClubId,
        date: NaiveDate,
    ) -> AppResult<Option<TeachingPeriod>> {
        let row = sqlx::query(
            r"
            SELECT id, club_id, name, start_date, end_date
            FROM teaching_periods
            WHERE club_id = $1 AND start_date <= $2 AND end_date >= $2
            ORDER BY start_date, id
            LIMIT 1
            ",
        )
        .bind(club_id.to_string())
        .bind(date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to find teaching period: {e}")))?;

        row.as_ref().map(row_to_period).transpose()
    }

    // ================================================================
    // Students and enrollments
    // ================================================================

    /// Create a student
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails
    pub async fn create_student(
        &self,
        club_id: ClubId,
        first_name: &str,
        last_name: &str,
        contact_email: Option<&str>,
        medical_notes: Option<&str>,
    ) -> AppResult<Student> {
        let student = Student {
            id: Uuid::new_v4(),
            club_id,
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            contact_email: contact_email.map(ToOwned::to_owned),
            medical_notes: medical_notes.map(ToOwned::to_owned),
        };
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| AppError::database(format!("Failed to acquire connection: {e}")))?;
        insert_student(&mut conn, &student).await?;
        Ok(student)
    }

    /// Get a student by ID within a club
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_student(&self, club_id: ClubId, student_id: Uuid) -> AppResult<Option<Student>> {
        let row = sqlx::query(
            r"
            SELECT id, club_id, first_name, last_name, contact_email, medical_notes
            FROM students
            WHERE id = $1 AND club_id = $2
            ",
        )
        .bind(student_id.to_string())
        .bind(club_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get student: {e}")))?;

        row.as_ref().map(row_to_student).transpose()
    }

    /// Enroll a student in a group for a teaching period
    ///
    /// # Errors
    ///
    /// Returns a conflict error if the enrollment already exists
    pub async fn enroll(
        &self,
        club_id: ClubId,
        student_id: Uuid,
        group_id: Uuid,
        teaching_period_id: Uuid,
    ) -> AppResult<Enrollment> {
        let enrollment = Enrollment {
            id: Uuid::new_v4(),
            club_id,
            student_id,
            group_id,
            teaching_period_id,
            is_active: true,
        };
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| AppError::database(format!("Failed to acquire connection: {e}")))?;
        insert_enrollment(&mut conn, &enrollment).await?;
        Ok(enrollment)
    }

    /// Active enrollments of a group in a period, as student IDs ordered by name
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn enrolled_students(
        &self,
        club_id: ClubId,
        group_id: Uuid,
        teaching_period_id: Uuid,
    ) -> AppResult<Vec<Uuid>> {
        let rows = sqlx::query(
            r"
            SELECT e.student_id
            FROM enrollments e
            JOIN students s ON s.id = e.student_id
            WHERE e.club_id = $1 AND e.group_id = $2 AND e.teaching_period_id = $3
              AND e.is_active = 1
            ORDER BY s.last_name, s.first_name, s.id
            ",
        )
        .bind(club_id.to_string())
        .bind(group_id.to_string())
        .bind(teaching_period_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list enrolled students: {e}")))?;

        rows.iter().map(|row| uuid_column(row, "student_id")).collect()
    }

    /// Groups with at least one active enrollment in a period
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn groups_with_enrollments(
        &self,
        club_id: ClubId,
        teaching_period_id: Uuid,
    ) -> AppResult<HashSet<Uuid>> {
        let rows = sqlx::query(
            r"
            SELECT DISTINCT group_id FROM enrollments
            WHERE club_id = $1 AND teaching_period_id = $2 AND is_active = 1
            ",
        )
        .bind(club_id.to_string())
        .bind(teaching_period_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list enrolled groups: {e}")))?;

        rows.iter().map(|row| uuid_column(row, "group_id")).collect()
    }

    /// Whether a student is actively enrolled in a group for a period
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn is_enrolled(
        &self,
        club_id: ClubId,
        student_id: Uuid,
        group_id: Uuid,
        teaching_period_id: Uuid,
    ) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*) FROM enrollments
            WHERE club_id = $1 AND student_id = $2 AND group_id = $3
              AND teaching_period_id = $4 AND is_active = 1
            ",
        )
        .bind(club_id.to_string())
        .bind(student_id.to_string())
        .bind(group_id.to_string())
        .bind(teaching_period_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to check enrollment: {e}")))?;

        Ok(count > 0)
    }
}

/// Insert a student on an existing connection or transaction
pub(crate) async fn insert_student(conn: &mut SqliteConnection, student: &Student) -> AppResult<()> {
    sqlx::query(
        r"
        INSERT INTO students (id, club_id, first_name, last_name, contact_email, medical_notes, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ",
    )
    .bind(student.id.to_string())
    .bind(student.club_id.to_string())
    .bind(&student.first_name)
    .bind(&student.last_name)
    .bind(&student.contact_email)
    .bind(&student.medical_notes)
    .bind(timestamp_value(&Utc::now()))
    .execute(conn)
    .await
    .map_err(|e| write_error("Student", &e))?;
    Ok(())
}

/// Insert an enrollment on an existing connection or transaction
pub(crate) async fn insert_enrollment(
    conn: &mut SqliteConnection,
    enrollment: &Enrollment,
) -> AppResult<()> {
    sqlx::query(
        r"
        INSERT INTO enrollments (id, club_id, student_id, group_id, teaching_period_id, is_active)
        VALUES ($1, $2, $3, $4, $5, $6)
        ",
    )
    .bind(enrollment.id.to_string())
    .bind(enrollment.club_id.to_string())
    .bind(enrollment.student_id.to_string())
    .bind(enrollment.group_id.to_string())
    .bind(enrollment.teaching_period_id.to_string())
    .bind(enrollment.is_active)
    .execute(conn)
    .await
    .map_err(|e| write_error("Enrollment", &e))?;
    Ok(())
}

fn row_to_group(row: &SqliteRow) -> AppResult<CoachingGroup> {
    Ok(CoachingGroup {
        id: uuid_column(row, "id")?,
        club_id: club_column(row)?,
        name: row.get("name"),
        description: row.get("description"),
    })
}

fn row_to_slot(row: &SqliteRow) -> AppResult<GroupTimeSlot> {
    let day_str: String = row.get("day_of_week");
    let day_of_week = DayOfWeek::parse(&day_str)
        .ok_or_else(|| AppError::internal(format!("Invalid day of week: {day_str}")))?;
    let capacity: Option<i64> = row.get("capacity");

    Ok(GroupTimeSlot {
        id: uuid_column(row, "id")?,
        club_id: club_column(row)?,
        group_id: uuid_column(row, "group_id")?,
        day_of_week,
        start_time: row.get("start_time"),
        end_time: row.get("end_time"),
        capacity: capacity.map(|c| c.clamp(0, i64::from(u32::MAX)) as u32),
    })
}

fn row_to_period(row: &SqliteRow) -> AppResult<TeachingPeriod> {
    Ok(TeachingPeriod {
        id: uuid_column(row, "id")?,
        club_id: club_column(row)?,
        name: row.get("name"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
    })
}

fn row_to_student(row: &SqliteRow) -> AppResult<Student> {
    Ok(Student {
        id: uuid_column(row, "id")?,
        club_id: club_column(row)?,
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        contact_email: row.get("contact_email"),
        medical_notes: row.get("medical_notes"),
    })
}
