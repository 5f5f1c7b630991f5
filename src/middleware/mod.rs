// ABOUTME: HTTP middleware for the club API
// ABOUTME: Resolves the club and acting member before route handlers run
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

/// Club and actor resolution from request headers
pub mod club;

pub use club::{club_context_middleware, club_subdomain};
