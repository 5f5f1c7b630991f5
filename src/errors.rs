// ABOUTME: Error types for the server crate, re-exported from courtside-core
// ABOUTME: Keeps `crate::errors::AppError` paths stable across modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

//! # Unified Error Handling
//!
//! All fallible operations return [`AppResult`]. The error code decides the
//! HTTP status and the CLI exit message; see `courtside_core::errors`.

pub use courtside_core::errors::{
    AppError, AppResult, ErrorCode, ErrorContext, ErrorResponse, ErrorResponseDetails,
};
