// ABOUTME: Domain models for clubs, recurring slots, cancellations, plans and registers
// ABOUTME: Re-exports every model so callers can import from courtside_core::models
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

/// Cancellation rules and their scopes
pub mod cancellation;
/// Clubs (tenants) and the `ClubId` newtype
pub mod club;
/// Advance session plans, plan entries and trial players
pub mod plan;
/// Registers and register entries
pub mod register;
/// Coaching groups, weekly slots, teaching periods, students and enrollments
pub mod schedule;

pub use cancellation::{
    Cancellation, CancellationRequest, CancellationScope, CancellationState, ScopeKind,
};
pub use club::{Club, ClubId};
pub use plan::{PlanEntry, PlannedStatus, PlayerType, SessionPlan, TrialPlayer};
pub use register::{AttendanceStatus, Register, RegisterEntry};
pub use schedule::{
    CoachingGroup, DayOfWeek, Enrollment, GroupTimeSlot, Student, TeachingPeriod,
};
