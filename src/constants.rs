// ABOUTME: System-wide constants and environment-backed defaults
// ABOUTME: Service names, database defaults, request limits and HTTP header names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

//! # Constants Module
//!
//! Hardcoded values shared by the server, the CLI and the tests.

/// Service names used in structured logs
pub mod service_names {
    /// HTTP server
    pub const COURTSIDE_SERVER: &str = "courtside-server";
    /// Command-line tool
    pub const COURTSIDE_CLI: &str = "courtside-cli";
}

/// Database defaults
pub mod database {
    /// Database used when `DATABASE_URL` is unset
    pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/courtside.db";
    /// Pool size for file-backed databases
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
}

/// Network defaults
pub mod network {
    /// Port used when `HTTP_PORT` is unset
    pub const DEFAULT_HTTP_PORT: u16 = 8081;
    /// Base domain clubs are served under when `BASE_DOMAIN` is unset
    pub const DEFAULT_BASE_DOMAIN: &str = "localhost";
}

/// Request limits
pub mod limits {
    /// Widest date range accepted by range resolution, in days
    pub const DEFAULT_MAX_RANGE_DAYS: i64 = 366;
    /// Rows per transaction during CSV import
    pub const DEFAULT_IMPORT_BATCH_SIZE: usize = 50;
    /// Longest club subdomain accepted
    pub const MAX_SUBDOMAIN_LENGTH: usize = 63;
    /// Longest cancellation reason accepted
    pub const MAX_REASON_LENGTH: usize = 500;
}

/// HTTP headers read by the club context middleware
pub mod headers {
    /// Explicit club subdomain, used when the Host header is not a club subdomain
    pub const CLUB: &str = "x-club";
    /// Authenticated user identifier supplied by the upstream auth layer
    pub const USER_ID: &str = "x-user-id";
}
