// ABOUTME: Configuration module grouping environment and database settings
// ABOUTME: Environment-only: there are no configuration files
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

/// Database URL parsing
pub mod database;
/// Server configuration from environment variables
pub mod environment;

pub use database::DatabaseUrl;
pub use environment::ServerConfig;
