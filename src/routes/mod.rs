// ABOUTME: Route module organization for the club administration HTTP API
// ABOUTME: Each domain module holds route definitions and thin handlers over the service layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

//! HTTP routes
//!
//! Handlers extract the [`Actor`](courtside_core::permissions::Actor) inserted
//! by the club context middleware and delegate to [`crate::services`].

/// Cancellation registry routes
pub mod cancellations;
/// Health check route
pub mod health;
/// Session plan routes
pub mod plans;
/// Register routes
pub mod registers;
/// Session resolver routes
pub mod sessions;

pub use cancellations::CancellationRoutes;
pub use health::HealthRoutes;
pub use plans::PlanRoutes;
pub use registers::RegisterRoutes;
pub use sessions::SessionRoutes;
