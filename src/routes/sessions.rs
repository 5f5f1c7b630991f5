// ABOUTME: Session resolver REST endpoints
// ABOUTME: Single-occurrence cancellation checks and cancelled sessions over a date range
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

use crate::{errors::AppError, server::ServerResources, services::sessions};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use chrono::NaiveDate;
use courtside_core::permissions::Actor;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::sessions::CancelledOccurrence;

/// Query parameters for a single-occurrence check
#[derive(Debug, Deserialize)]
pub struct CheckSessionQuery {
    /// Slot to check
    pub slot_id: Uuid,
    /// Date to check
    pub date: NaiveDate,
}

/// Query parameters for range resolution
#[derive(Debug, Deserialize)]
pub struct CancelledRangeQuery {
    /// First date, inclusive
    pub start: NaiveDate,
    /// Last date, inclusive
    pub end: NaiveDate,
    /// Restrict to groups with enrollments in this period
    #[serde(default)]
    pub teaching_period_id: Option<Uuid>,
}

/// Response for range resolution
#[derive(Debug, Serialize, Deserialize)]
pub struct CancelledRangeResponse {
    /// Cancelled occurrences ordered by date, then time
    pub sessions: Vec<CancelledOccurrence>,
    /// Number returned
    pub total: usize,
}

/// Session resolver routes
pub struct SessionRoutes;

impl SessionRoutes {
    /// Create all session routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/sessions/check", get(Self::handle_check))
            .route("/api/sessions/cancelled", get(Self::handle_cancelled))
            .with_state(resources)
    }

    /// Handle GET /api/sessions/check
    async fn handle_check(
        State(resources): State<Arc<ServerResources>>,
        Extension(actor): Extension<Actor>,
        Query(query): Query<CheckSessionQuery>,
    ) -> Result<Response, AppError> {
        let status =
            sessions::check_session(&resources.database, &actor, query.slot_id, query.date).await?;
        Ok((StatusCode::OK, Json(status)).into_response())
    }

    /// Handle GET /api/sessions/cancelled
    async fn handle_cancelled(
        State(resources): State<Arc<ServerResources>>,
        Extension(actor): Extension<Actor>,
        Query(query): Query<CancelledRangeQuery>,
    ) -> Result<Response, AppError> {
        let cancelled = sessions::resolve_cancelled_range(
            &resources.database,
            &actor,
            query.start,
            query.end,
            query.teaching_period_id,
            resources.config.max_range_days,
        )
        .await?;
        let response = CancelledRangeResponse {
            total: cancelled.len(),
            sessions: cancelled,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }
}
