// ABOUTME: Session plan persistence: plans, planned entries and trial players
// ABOUTME: One plan per (slot, date, teaching period); one entry per student per plan
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

use super::{club_column, timestamp_column, timestamp_value, uuid_column, write_error};
use crate::errors::{AppError, AppResult};
use chrono::{NaiveDate, Utc};
use courtside_core::models::{
    ClubId, PlanEntry, PlannedStatus, PlayerType, SessionPlan, TrialPlayer,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info, warn};
use uuid::Uuid;

const SELECT_PLAN: &str = r"
    SELECT id, club_id, slot_id, date, teaching_period_id, notes, is_active, created_by, created_at
    FROM session_plans
";

/// Session plan database operations manager
pub struct SessionPlansManager {
    pool: SqlitePool,
}

impl SessionPlansManager {
    /// Create a new session plans manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an empty, active plan for an occurrence
    ///
    /// # Errors
    ///
    /// Returns a conflict error if the occurrence already has a plan
    pub async fn create(
        &self,
        club_id: ClubId,
        slot_id: Uuid,
        date: NaiveDate,
        teaching_period_id: Uuid,
        notes: Option<String>,
        created_by: Uuid,
    ) -> AppResult<SessionPlan> {
        let plan = SessionPlan {
            id: Uuid::new_v4(),
            club_id,
            slot_id,
            date,
            teaching_period_id,
            notes,
            is_active: true,
            created_by,
            created_at: Utc::now(),
            entries: Vec::new(),
            trial_players: Vec::new(),
        };

        sqlx::query(
            r"
            INSERT INTO session_plans (
                id, club_id, slot_id, date, teaching_period_id, notes, is_active, created_by, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, 1, $7, $8)
            ",
        )
        .bind(plan.id.to_string())
        .bind(club_id.to_string())
        .bind(slot_id.to_string())
        .bind(date)
        .bind(teaching_period_id.to_string())
        .bind(&plan.notes)
        .bind(created_by.to_string())
        .bind(timestamp_value(&plan.created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("Session plan", &e))?;

        Ok(plan)
    }

    /// Add a planned entry for an enrolled student
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the plan is not in the club, or a conflict
    /// error if the student already has an entry in this plan
    pub async fn add_entry(
        &self,
        club_id: ClubId,
        plan_id: Uuid,
        student_id: Uuid,
        planned_status: PlannedStatus,
        player_type: PlayerType,
        notes: Option<String>,
    ) -> AppResult<PlanEntry> {
        let entry = PlanEntry {
            id: Uuid::new_v4(),
            plan_id,
            student_id,
            planned_status: Some(planned_status),
            player_type,
            notes,
        };

        let result = sqlx::query(
            r"
            INSERT INTO plan_entries (id, plan_id, student_id, planned_status, player_type, notes)
            SELECT $1, $2, $3, $4, $5, $6
            WHERE EXISTS (SELECT 1 FROM session_plans WHERE id = $2 AND club_id = $7)
            ",
        )
        .bind(entry.id.to_string())
        .bind(plan_id.to_string())
        .bind(student_id.to_string())
        .bind(planned_status.as_str())
        .bind(player_type.as_str())
        .bind(&entry.notes)
        .bind(club_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("Plan entry", &e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Session plan").with_resource_id(plan_id.to_string()));
        }
        Ok(entry)
    }

    /// Add a trial player to a plan
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the plan is not in the club
    pub async fn add_trial_player(&self, club_id: ClubId, trial: &TrialPlayer) -> AppResult<()> {
        let result = sqlx::query(
            r"
            INSERT INTO trial_players (
                id, plan_id, first_name, last_name, contact_email, contact_phone, medical_notes, notes
            )
            SELECT $1, $2, $3, $4, $5, $6, $7, $8
            WHERE EXISTS (SELECT 1 FROM session_plans WHERE id = $2 AND club_id = $9)
            ",
        )
        .bind(trial.id.to_string())
        .bind(trial.plan_id.to_string())
        .bind(&trial.first_name)
        .bind(&trial.last_name)
        .bind(&trial.contact_email)
        .bind(&trial.contact_phone)
        .bind(&trial.medical_notes)
        .bind(&trial.notes)
        .bind(club_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("Trial player", &e))?;

        if result.rows_affected() == 0 {
            return Err(
                AppError::not_found("Session plan").with_resource_id(trial.plan_id.to_string())
            );
        }
        Ok(())
    }

    /// Get a plan with its entries and trial players
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails
    pub async fn get(&self, club_id: ClubId, plan_id: Uuid) -> AppResult<Option<SessionPlan>> {
        let query = format!("{SELECT_PLAN} WHERE id = $1 AND club_id = $2");
        let row = sqlx::query(&query)
            .bind(plan_id.to_string())
            .bind(club_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get session plan: {e}")))?;

        match row {
            Some(row) => self.load_children(row_to_plan(&row)?).await.map(Some),
            None => Ok(None),
        }
    }

    /// Mark a plan inactive so registers opened later ignore it
    ///
    /// Deactivating an inactive plan leaves it unchanged.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the plan is not in the club
    pub async fn deactivate(&self, club_id: ClubId, plan_id: Uuid) -> AppResult<SessionPlan> {
        let result = sqlx::query(
            "UPDATE session_plans SET is_active = 0 WHERE id = $1 AND club_id = $2 AND is_active = 1",
        )
        .bind(plan_id.to_string())
        .bind(club_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to deactivate session plan: {e}")))?;

        let plan = self
            .get(club_id, plan_id)
            .await?
            .ok_or_else(|| AppError::not_found("Session plan").with_resource_id(plan_id.to_string()))?;
        if result.rows_affected() > 0 {
            info!(club.id = %club_id, plan.id = %plan_id, "Session plan deactivated");
        }
        Ok(plan)
    }

    /// The active plan for an occurrence, if one was prepared
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails
    pub async fn find_active(
        &self,
        club_id: ClubId,
        slot_id: Uuid,
        date: NaiveDate,
        teaching_period_id: Uuid,
    ) -> AppResult<Option<SessionPlan>> {
        let query = format!(
            "{SELECT_PLAN} WHERE club_id = $1 AND slot_id = $2 AND date = $3 \
             AND teaching_period_id = $4 AND is_active = 1"
        );
        let row = sqlx::query(&query)
            .bind(club_id.to_string())
            .bind(slot_id.to_string())
            .bind(date)
            .bind(teaching_period_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to find session plan: {e}")))?;

        match row {
            Some(row) => self.load_children(row_to_plan(&row)?).await.map(Some),
            None => {
                debug!(slot.id = %slot_id, %date, "No session plan for occurrence");
                Ok(None)
            }
        }
    }

    async fn load_children(&self, mut plan: SessionPlan) -> AppResult<SessionPlan> {
        let entry_rows = sqlx::query(
            r"
            SELECT id, plan_id, student_id, planned_status, player_type, notes
            FROM plan_entries
            WHERE plan_id = $1
            ORDER BY rowid
            ",
        )
        .bind(plan.id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list plan entries: {e}")))?;

        plan.entries = entry_rows
            .iter()
            .map(row_to_entry)
            .collect::<AppResult<Vec<_>>>()?;

        let trial_rows = sqlx::query(
            r"
            SELECT id, plan_id, first_name, last_name, contact_email, contact_phone, medical_notes, notes
            FROM trial_players
            WHERE plan_id = $1
            ORDER BY rowid
            ",
        )
        .bind(plan.id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list trial players: {e}")))?;

        plan.trial_players = trial_rows
            .iter()
            .map(row_to_trial)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(plan)
    }
}

fn row_to_plan(row: &SqliteRow) -> AppResult<SessionPlan> {
    Ok(SessionPlan {
        id: uuid_column(row, "id")?,
        club_id: club_column(row)?,
        slot_id: uuid_column(row, "slot_id")?,
        date: row.get("date"),
        teaching_period_id: uuid_column(row, "teaching_period_id")?,
        notes: row.get("notes"),
        is_active: row.get("is_active"),
        created_by: uuid_column(row, "created_by")?,
        created_at: timestamp_column(row, "created_at")?,
        entries: Vec::new(),
        trial_players: Vec::new(),
    })
}

fn row_to_entry(row: &SqliteRow) -> AppResult<PlanEntry> {
    let status_str: String = row.get("planned_status");
    let planned_status = PlannedStatus::parse(&status_str);
    if planned_status.is_none() {
        warn!(planned_status = %status_str, "Unrecognised planned status");
    }
    let player_type: String = row.get("player_type");

    Ok(PlanEntry {
        id: uuid_column(row, "id")?,
        plan_id: uuid_column(row, "plan_id")?,
        student_id: uuid_column(row, "student_id")?,
        planned_status,
        player_type: PlayerType::parse(&player_type),
        notes: row.get("notes"),
    })
}

fn row_to_trial(row: &SqliteRow) -> AppResult<TrialPlayer> {
    Ok(TrialPlayer {
        id: uuid_column(row, "id")?,
        plan_id: uuid_column(row, "plan_id")?,
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        contact_email: row.get("contact_email"),
        contact_phone: row.get("contact_phone"),
        medical_notes: row.get("medical_notes"),
        notes: row.get("notes"),
    })
}
