// ABOUTME: Register REST endpoints: open a session register, read it and record attendance
// ABOUTME: Opening returns 201 when the register was created and 200 when it already existed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

use crate::{
    errors::AppError,
    server::ServerResources,
    services::registers::{self, OpenRegisterRequest},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Extension, Json, Router,
};
use courtside_core::models::AttendanceStatus;
use courtside_core::permissions::Actor;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

/// Body for adding or updating an entry
#[derive(Debug, Deserialize)]
pub struct EntryBody {
    /// Attendance status
    pub status: AttendanceStatus,
    /// Coach notes
    #[serde(default)]
    pub notes: Option<String>,
}

/// Body for adding an entry for a student without one
#[derive(Debug, Deserialize)]
pub struct NewEntryBody {
    /// Student to add
    pub student_id: Uuid,
    /// Attendance status
    pub status: AttendanceStatus,
    /// Coach notes
    #[serde(default)]
    pub notes: Option<String>,
}

/// Body for adding an assistant coach
#[derive(Debug, Deserialize)]
pub struct AssistantBody {
    /// Club member assisting
    pub user_id: Uuid,
}

/// Register routes
pub struct RegisterRoutes;

impl RegisterRoutes {
    /// Create all register routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/registers", post(Self::handle_open))
            .route("/api/registers/:id", get(Self::handle_get))
            .route("/api/registers/:id/entries", post(Self::handle_add_entry))
            .route(
                "/api/registers/:id/entries/:student_id",
                put(Self::handle_mark_attendance),
            )
            .route(
                "/api/registers/:id/assistants",
                post(Self::handle_add_assistant),
            )
            .with_state(resources)
    }

    /// Handle POST /api/registers
    async fn handle_open(
        State(resources): State<Arc<ServerResources>>,
        Extension(actor): Extension<Actor>,
        Json(request): Json<OpenRegisterRequest>,
    ) -> Result<Response, AppError> {
        let opened = registers::open_register(&resources.database, &actor, &request).await?;
        let status = if opened.created {
            StatusCode::CREATED
        } else {
            StatusCode::OK
        };
        Ok((status, Json(opened)).into_response())
    }

    /// Handle GET /api/registers/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Extension(actor): Extension<Actor>,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let register = registers::get_register(&resources.database, &actor, id).await?;
        Ok((StatusCode::OK, Json(register)).into_response())
    }

    /// Handle POST /api/registers/:id/entries
    async fn handle_add_entry(
        State(resources): State<Arc<ServerResources>>,
        Extension(actor): Extension<Actor>,
        Path(id): Path<Uuid>,
        Json(body): Json<NewEntryBody>,
    ) -> Result<Response, AppError> {
        let entry = registers::add_entry(
            &resources.database,
            &actor,
            id,
            body.student_id,
            body.status,
            body.notes.as_deref(),
        )
        .await?;
        Ok((StatusCode::CREATED, Json(entry)).into_response())
    }

    /// Handle PUT /api/registers/:id/entries/:student_id
    async fn handle_mark_attendance(
        State(resources): State<Arc<ServerResources>>,
        Extension(actor): Extension<Actor>,
        Path((id, student_id)): Path<(Uuid, Uuid)>,
        Json(body): Json<EntryBody>,
    ) -> Result<Response, AppError> {
        let entry = registers::mark_attendance(
            &resources.database,
            &actor,
            id,
            student_id,
            body.status,
            body.notes.as_deref(),
        )
        .await?;
        Ok((StatusCode::OK, Json(entry)).into_response())
    }

    /// Handle POST /api/registers/:id/assistants
    async fn handle_add_assistant(
        State(resources): State<Arc<ServerResources>>,
        Extension(actor): Extension<Actor>,
        Path(id): Path<Uuid>,
        Json(body): Json<AssistantBody>,
    ) -> Result<Response, AppError> {
        let register =
            registers::add_assistant(&resources.database, &actor, id, body.user_id).await?;
        Ok((StatusCode::OK, Json(register)).into_response())
    }
}
