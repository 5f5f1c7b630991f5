// ABOUTME: Cancellation commands for courtside-cli: list, create and deactivate
// ABOUTME: Uses the same services and role checks as the HTTP API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

use super::Session;
use crate::helpers::display::{describe_scope, display_cancellation};
use courtside::errors::AppResult;
use courtside::services::cancellations;
use courtside_core::models::CancellationRequest;
use uuid::Uuid;

/// List the club's cancellations
pub async fn list(session: &Session<'_>, include_inactive: bool) -> AppResult<()> {
    let actor = session.actor().await?;
    let all = cancellations::list_cancellations(session.database, &actor, include_inactive).await?;
    if all.is_empty() {
        println!("No cancellations");
        return Ok(());
    }
    for cancellation in &all {
        display_cancellation(cancellation);
    }
    println!("\n{} cancellation(s)", all.len());
    Ok(())
}

/// Create a cancellation
pub async fn create(session: &Session<'_>, request: &CancellationRequest) -> AppResult<()> {
    let actor = session.actor().await?;
    let cancellation =
        cancellations::create_cancellation(session.database, &actor, request).await?;
    println!("Cancelled {}", describe_scope(&cancellation.scope));
    println!("   Cancellation ID: {}", cancellation.id);
    Ok(())
}

/// Deactivate a cancellation
pub async fn deactivate(session: &Session<'_>, cancellation_id: Uuid) -> AppResult<()> {
    let actor = session.actor().await?;
    let cancellation =
        cancellations::deactivate_cancellation(session.database, &actor, cancellation_id).await?;
    println!(
        "Deactivated cancellation of {}",
        describe_scope(&cancellation.scope)
    );
    Ok(())
}
