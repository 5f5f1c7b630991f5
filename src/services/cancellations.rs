// ABOUTME: Cancellation registry write path: validation, role checks and soft delete
// ABOUTME: Day and week scopes need an admin; session scope also allows the slot's coach
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

use tracing::info;
use uuid::Uuid;

use super::schedule::require_slot;
use crate::constants::limits::MAX_REASON_LENGTH;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use courtside_core::models::{Cancellation, CancellationRequest, CancellationScope};
use courtside_core::permissions::Actor;

/// Create a cancellation
///
/// Scope fields are validated before the role check and nothing is written
/// unless both pass.
///
/// # Errors
///
/// Returns a validation error naming a missing or inconsistent field, a
/// permission error if the actor may not cancel this scope, or a not-found
/// error if a session scope references a slot outside the club
pub async fn create_cancellation(
    database: &Database,
    actor: &Actor,
    request: &CancellationRequest,
) -> AppResult<Cancellation> {
    let scope = request.to_scope()?;
    let reason = request.normalized_reason();
    if reason
        .as_ref()
        .is_some_and(|r| r.chars().count() > MAX_REASON_LENGTH)
    {
        return Err(AppError::out_of_range(format!(
            "reason must be {MAX_REASON_LENGTH} characters or less"
        )));
    }

    authorize_scope(database, actor, &scope).await?;

    let cancellation = database
        .cancellations()
        .create(actor.club_id, scope, reason, actor.user_id)
        .await?;
    info!(
        club.id = %actor.club_id,
        user.id = %actor.user_id,
        cancellation.id = %cancellation.id,
        "Cancellation recorded"
    );
    Ok(cancellation)
}

/// Deactivate a cancellation; the row is kept for history
///
/// The same role rules as creation apply to the cancellation's scope.
///
/// # Errors
///
/// Returns a not-found error if the cancellation is not in the actor's club,
/// or a permission error if the actor may not manage its scope
pub async fn deactivate_cancellation(
    database: &Database,
    actor: &Actor,
    cancellation_id: Uuid,
) -> AppResult<Cancellation> {
    let existing = database
        .cancellations()
        .get(actor.club_id, cancellation_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found("Cancellation").with_resource_id(cancellation_id.to_string())
        })?;

    authorize_scope(database, actor, &existing.scope).await?;

    database
        .cancellations()
        .deactivate(actor.club_id, cancellation_id)
        .await
}

/// List the actor's club cancellations in creation order
///
/// # Errors
///
/// Returns an error if the database query fails
pub async fn list_cancellations(
    database: &Database,
    actor: &Actor,
    include_inactive: bool,
) -> AppResult<Vec<Cancellation>> {
    database
        .cancellations()
        .list(actor.club_id, include_inactive)
        .await
}

async fn authorize_scope(database: &Database, actor: &Actor, scope: &CancellationScope) -> AppResult<()> {
    match scope {
        CancellationScope::Day { .. } => actor.require_admin("cancel a whole day"),
        CancellationScope::Week { .. } => actor.require_admin("cancel a week"),
        CancellationScope::Session { slot_id, .. } => {
            let slot = require_slot(database, actor, *slot_id).await?;
            if actor.is_admin() {
                return Ok(());
            }
            let coaches = database.slots().slot_coaches(actor.club_id, slot.id).await?;
            actor.require_admin_or_assigned(&coaches, "cancel this session")
        }
    }
}
