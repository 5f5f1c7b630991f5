// ABOUTME: Cancellation registry REST endpoints
// ABOUTME: List, create and deactivate cancellations for the resolved club
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

use crate::{errors::AppError, server::ServerResources, services::cancellations};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Extension, Json, Router,
};
use courtside_core::models::{Cancellation, CancellationRequest};
use courtside_core::permissions::Actor;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Query parameters for listing cancellations
#[derive(Debug, Deserialize, Default)]
pub struct ListCancellationsQuery {
    /// Include deactivated cancellations
    #[serde(default)]
    pub include_inactive: bool,
}

/// Response for listing cancellations
#[derive(Debug, Serialize, Deserialize)]
pub struct ListCancellationsResponse {
    /// Cancellations in creation order
    pub cancellations: Vec<Cancellation>,
    /// Number returned
    pub total: usize,
}

/// Cancellation routes
pub struct CancellationRoutes;

impl CancellationRoutes {
    /// Create all cancellation routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/cancellations",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route("/api/cancellations/:id", delete(Self::handle_deactivate))
            .with_state(resources)
    }

    /// Handle GET /api/cancellations
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Extension(actor): Extension<Actor>,
        Query(query): Query<ListCancellationsQuery>,
    ) -> Result<Response, AppError> {
        let cancellations =
            cancellations::list_cancellations(&resources.database, &actor, query.include_inactive)
                .await?;
        let response = ListCancellationsResponse {
            total: cancellations.len(),
            cancellations,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /api/cancellations
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        Extension(actor): Extension<Actor>,
        Json(request): Json<CancellationRequest>,
    ) -> Result<Response, AppError> {
        let cancellation =
            cancellations::create_cancellation(&resources.database, &actor, &request).await?;
        Ok((StatusCode::CREATED, Json(cancellation)).into_response())
    }

    /// Handle DELETE /api/cancellations/:id - soft delete
    async fn handle_deactivate(
        State(resources): State<Arc<ServerResources>>,
        Extension(actor): Extension<Actor>,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let cancellation =
            cancellations::deactivate_cancellation(&resources.database, &actor, id).await?;
        Ok((StatusCode::OK, Json(cancellation)).into_response())
    }
}
