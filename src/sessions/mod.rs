// ABOUTME: Pure session logic: cancellation resolution and plan overlay
// ABOUTME: No I/O; services load rows and persist results around these functions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

/// Session plan overlay onto new registers
pub mod overlay;
/// Cancellation checks for single occurrences and date ranges
pub mod resolver;

pub use overlay::{apply_plan, fill_baseline, PlanApplication};
pub use resolver::{
    is_cancelled, resolve_range, CancellationCheck, CancelledOccurrence, DateRange,
};
