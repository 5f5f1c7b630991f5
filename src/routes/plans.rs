// ABOUTME: Session plan REST endpoints: create plans, add planned entries and trial players
// ABOUTME: Plans are read back with their entries and trial players, and can be deactivated
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

use crate::{
    errors::AppError,
    server::ServerResources,
    services::plans::{self, NewPlan, NewPlanEntry, NewTrialPlayer},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use courtside_core::permissions::Actor;
use std::sync::Arc;
use uuid::Uuid;

/// Session plan routes
pub struct PlanRoutes;

impl PlanRoutes {
    /// Create all plan routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/plans", post(Self::handle_create))
            .route(
                "/api/plans/:id",
                get(Self::handle_get).delete(Self::handle_deactivate),
            )
            .route("/api/plans/:id/entries", post(Self::handle_add_entry))
            .route(
                "/api/plans/:id/trial-players",
                post(Self::handle_add_trial_player),
            )
            .with_state(resources)
    }

    /// Handle POST /api/plans
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        Extension(actor): Extension<Actor>,
        Json(body): Json<NewPlan>,
    ) -> Result<Response, AppError> {
        let plan = plans::create_plan(&resources.database, &actor, &body).await?;
        Ok((StatusCode::CREATED, Json(plan)).into_response())
    }

    /// Handle GET /api/plans/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Extension(actor): Extension<Actor>,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let plan = plans::get_plan(&resources.database, &actor, id).await?;
        Ok((StatusCode::OK, Json(plan)).into_response())
    }

    /// Handle DELETE /api/plans/:id
    async fn handle_deactivate(
        State(resources): State<Arc<ServerResources>>,
        Extension(actor): Extension<Actor>,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let plan = plans::deactivate_plan(&resources.database, &actor, id).await?;
        Ok((StatusCode::OK, Json(plan)).into_response())
    }

    /// Handle POST /api/plans/:id/entries
    async fn handle_add_entry(
        State(resources): State<Arc<ServerResources>>,
        Extension(actor): Extension<Actor>,
        Path(id): Path<Uuid>,
        Json(body): Json<NewPlanEntry>,
    ) -> Result<Response, AppError> {
        let entry = plans::add_plan_entry(&resources.database, &actor, id, &body).await?;
        Ok((StatusCode::CREATED, Json(entry)).into_response())
    }

    /// Handle POST /api/plans/:id/trial-players
    async fn handle_add_trial_player(
        State(resources): State<Arc<ServerResources>>,
        Extension(actor): Extension<Actor>,
        Path(id): Path<Uuid>,
        Json(body): Json<NewTrialPlayer>,
    ) -> Result<Response, AppError> {
        let trial = plans::add_trial_player(&resources.database, &actor, id, &body).await?;
        Ok((StatusCode::CREATED, Json(trial)).into_response())
    }
}
