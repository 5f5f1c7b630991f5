// ABOUTME: Core types for the Courtside tennis-club administration backend
// ABOUTME: Foundation crate with error handling, scheduling and register models, and club roles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

#![deny(unsafe_code)]

//! # Courtside Core
//!
//! Foundation crate providing shared types for the Courtside club
//! administration platform. It performs no I/O, so the scheduling rules in the
//! server crate can be unit-tested against plain values.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **models**: Clubs, weekly slots, cancellations, session plans, registers
//! - **permissions**: Club roles and the acting user

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Core data models (clubs, slots, cancellations, plans, registers)
pub mod models;

/// Club roles and the acting user resolved for each request
pub mod permissions;
