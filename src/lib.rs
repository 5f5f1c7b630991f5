// ABOUTME: Main library entry point for the Courtside tennis-club administration backend
// ABOUTME: Weekly schedules, cancellations, session plans and registers behind an HTTP API and a CLI
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

#![deny(unsafe_code)]

//! # Courtside
//!
//! Administration backend for tennis clubs. Each club has a weekly schedule
//! of coaching groups and time slots. Admins and coaches cancel sessions,
//! days or weeks; coaches plan sessions ahead; registers record who attended.
//!
//! ## Architecture
//!
//! - **Sessions**: pure cancellation resolution and plan overlay
//! - **Database**: `SQLite` persistence, one manager per table group, every
//!   query scoped by club
//! - **Services**: validation, role checks and persistence for each operation
//! - **Routes / Server**: the axum HTTP API
//! - **Import**: batched CSV player import
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use courtside::database::Database;
//! use courtside::errors::AppResult;
//! use courtside::services::{club_admin, sessions};
//! use chrono::NaiveDate;
//! use uuid::Uuid;
//!
//! # async fn example(user_id: Uuid, slot_id: Uuid) -> AppResult<()> {
//! let database = Database::new("sqlite::memory:").await?;
//! let club = club_admin::resolve_club(&database, "riverside").await?;
//! let actor = club_admin::resolve_actor(&database, club.id, user_id).await?;
//!
//! let date = NaiveDate::from_ymd_opt(2025, 10, 27).unwrap_or_default();
//! let status = sessions::check_session(&database, &actor, slot_id, date).await?;
//! println!("cancelled: {}", status.cancelled);
//! # Ok(())
//! # }
//! ```

/// Environment configuration
pub mod config;

/// Application constants
pub mod constants;

/// `SQLite` persistence
pub mod database;

/// Unified error handling
pub mod errors;

/// Batched CSV player import
pub mod import;

/// Structured logging setup
pub mod logging;

/// HTTP middleware
pub mod middleware;

/// HTTP route handlers
pub mod routes;

/// HTTP server assembly
pub mod server;

/// Club-scoped operations used by the API and the CLI
pub mod services;

/// Cancellation resolution and plan overlay
pub mod sessions;
