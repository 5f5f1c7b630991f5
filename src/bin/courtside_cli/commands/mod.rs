// ABOUTME: Command modules for courtside-cli and the acting-member context they share
// ABOUTME: Resolves --club and --user-id into an Actor exactly like the HTTP middleware does
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

pub mod cancellation;
pub mod club;
pub mod players;
pub mod session;

use courtside::database::Database;
use courtside::errors::{AppError, AppResult};
use courtside::services::club_admin::{resolve_actor, resolve_club};
use courtside_core::models::Club;
use courtside_core::permissions::Actor;
use uuid::Uuid;

/// Global options every club-scoped command needs
pub struct Session<'a> {
    pub database: &'a Database,
    pub club: Option<&'a str>,
    pub user_id: Option<Uuid>,
}

impl Session<'_> {
    /// The club named by --club
    pub async fn club(&self) -> AppResult<Club> {
        let subdomain = self
            .club
            .ok_or_else(|| AppError::missing_field("--club"))?;
        resolve_club(self.database, subdomain).await
    }

    /// The member named by --user-id inside the club named by --club
    pub async fn actor(&self) -> AppResult<Actor> {
        let club = self.club().await?;
        let user_id = self
            .user_id
            .ok_or_else(|| AppError::missing_field("--user-id"))?;
        resolve_actor(self.database, club.id, user_id).await
    }
}
