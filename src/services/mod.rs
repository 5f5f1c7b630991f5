// ABOUTME: Persistence-backed club operations shared by the HTTP routes and the CLI
// ABOUTME: Every function takes the resolved actor and enforces club scoping and roles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

//! Domain service layer
//!
//! Services take a [`Database`](crate::database::Database) and the resolved
//! [`Actor`](courtside_core::permissions::Actor). They validate input, check the
//! actor's role, and call the per-table managers. Route handlers and CLI
//! commands stay thin.

/// Cancellation registry: create, deactivate, list
pub mod cancellations;

/// Clubs, members and request-time club/actor resolution
pub mod club_admin;

/// Session plans, planned entries and trial players
pub mod plans;

/// Register materialisation and attendance
pub mod registers;

/// Groups, slots, teaching periods, students and enrollments
pub mod schedule;

/// Cancellation checks for occurrences and date ranges
pub mod sessions;
