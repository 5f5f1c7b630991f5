// ABOUTME: Integration tests for the cancellation registry and session resolver
// ABOUTME: Covers role rules, scope validation, soft deletion, range resolution and club isolation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use common::{date, ClubFixture};
use courtside::errors::ErrorCode;
use courtside::services::{cancellations, sessions};
use courtside_core::models::{CancellationRequest, ScopeKind};

fn request(scope: ScopeKind) -> CancellationRequest {
    CancellationRequest {
        scope,
        date: None,
        week_start: None,
        week_end: None,
        slot_id: None,
        reason: None,
    }
}

fn half_term() -> CancellationRequest {
    CancellationRequest {
        week_start: Some(date("2025-10-27")),
        week_end: Some(date("2025-10-31")),
        reason: Some("Half term".to_owned()),
        ..request(ScopeKind::Week)
    }
}

#[tokio::test]
async fn test_half_term_week_cancels_monday_session() {
    let fx = ClubFixture::new_default().await.unwrap();

    cancellations::create_cancellation(&fx.database, &fx.admin, &half_term())
        .await
        .unwrap();

    let cancelled = sessions::resolve_cancelled_range(
        &fx.database,
        &fx.admin,
        date("2025-10-20"),
        date("2025-11-03"),
        None,
        366,
    )
    .await
    .unwrap();

    assert_eq!(cancelled.len(), 1);
    assert_eq!(cancelled[0].slot_id, fx.slot.id);
    assert_eq!(cancelled[0].date, date("2025-10-27"));
    assert_eq!(cancelled[0].reason.as_deref(), Some("Half term"));

    let status = sessions::check_session(&fx.database, &fx.admin, fx.slot.id, date("2025-10-27"))
        .await
        .unwrap();
    assert!(status.cancelled);
    assert!(status.scheduled);

    let next_week = sessions::check_session(&fx.database, &fx.admin, fx.slot.id, date("2025-11-03"))
        .await
        .unwrap();
    assert!(!next_week.cancelled);
}

#[tokio::test]
async fn test_coach_needs_assignment_for_session_cancellation() {
    let fx = ClubFixture::new_default().await.unwrap();
    let rain = CancellationRequest {
        slot_id: Some(fx.slot.id),
        date: Some(date("2025-10-13")),
        reason: Some("Courts flooded".to_owned()),
        ..request(ScopeKind::Session)
    };

    let err = cancellations::create_cancellation(&fx.database, &fx.coach, &rain)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);
    assert!(cancellations::list_cancellations(&fx.database, &fx.admin, true)
        .await
        .unwrap()
        .is_empty());

    fx.assign_coach().await.unwrap();
    let created = cancellations::create_cancellation(&fx.database, &fx.coach, &rain)
        .await
        .unwrap();
    assert!(created.state.is_active());
    assert_eq!(created.created_by, fx.coach.user_id);
}

#[tokio::test]
async fn test_coach_cannot_cancel_day_or_week() {
    let fx = ClubFixture::new_default().await.unwrap();
    fx.assign_coach().await.unwrap();

    let day = CancellationRequest {
        date: Some(date("2025-10-13")),
        ..request(ScopeKind::Day)
    };
    let err = cancellations::create_cancellation(&fx.database, &fx.coach, &day)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);

    let err = cancellations::create_cancellation(&fx.database, &fx.coach, &half_term())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);
}

#[tokio::test]
async fn test_missing_scope_fields_are_named_and_nothing_is_written() {
    let fx = ClubFixture::new_default().await.unwrap();

    let no_slot = CancellationRequest {
        date: Some(date("2025-10-13")),
        ..request(ScopeKind::Session)
    };
    let err = cancellations::create_cancellation(&fx.database, &fx.admin, &no_slot)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingRequiredField);
    assert!(err.message.contains("slot_id"));

    let no_end = CancellationRequest {
        week_start: Some(date("2025-10-27")),
        ..request(ScopeKind::Week)
    };
    let err = cancellations::create_cancellation(&fx.database, &fx.admin, &no_end)
        .await
        .unwrap_err();
    assert!(err.message.contains("week_end"));

    let inverted = CancellationRequest {
        week_start: Some(date("2025-10-31")),
        week_end: Some(date("2025-10-27")),
        ..request(ScopeKind::Week)
    };
    let err = cancellations::create_cancellation(&fx.database, &fx.admin, &inverted)
        .await
        .unwrap_err();
    assert!(err.is_validation());

    assert!(cancellations::list_cancellations(&fx.database, &fx.admin, true)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_deactivated_cancellation_stops_applying_but_is_kept() {
    let fx = ClubFixture::new_default().await.unwrap();
    let created = cancellations::create_cancellation(&fx.database, &fx.admin, &half_term())
        .await
        .unwrap();

    let deactivated = cancellations::deactivate_cancellation(&fx.database, &fx.admin, created.id)
        .await
        .unwrap();
    assert!(!deactivated.state.is_active());
    assert!(deactivated.deactivated_at.is_some());

    let again = cancellations::deactivate_cancellation(&fx.database, &fx.admin, created.id)
        .await
        .unwrap();
    assert!(!again.state.is_active());

    let status = sessions::check_session(&fx.database, &fx.admin, fx.slot.id, date("2025-10-27"))
        .await
        .unwrap();
    assert!(!status.cancelled);

    assert!(cancellations::list_cancellations(&fx.database, &fx.admin, false)
        .await
        .unwrap()
        .is_empty());
    let history = cancellations::list_cancellations(&fx.database, &fx.admin, true)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, created.id);
}

#[tokio::test]
async fn test_first_listed_rule_supplies_the_reason() {
    let fx = ClubFixture::new_default().await.unwrap();
    let monday = date("2025-10-27");

    cancellations::create_cancellation(
        &fx.database,
        &fx.admin,
        &CancellationRequest {
            date: Some(monday),
            reason: Some("Club championships".to_owned()),
            ..request(ScopeKind::Day)
        },
    )
    .await
    .unwrap();
    cancellations::create_cancellation(&fx.database, &fx.admin, &half_term())
        .await
        .unwrap();

    let status = sessions::check_session(&fx.database, &fx.admin, fx.slot.id, monday)
        .await
        .unwrap();
    assert_eq!(status.reason.as_deref(), Some("Club championships"));

    let cancelled =
        sessions::resolve_cancelled_range(&fx.database, &fx.admin, monday, monday, None, 366)
            .await
            .unwrap();
    assert_eq!(cancelled.len(), 1);
    assert_eq!(cancelled[0].reason.as_deref(), Some("Club championships"));
}

#[tokio::test]
async fn test_other_club_cannot_see_or_touch_cancellations() {
    let fx = ClubFixture::new_default().await.unwrap();
    let other = ClubFixture::create(&fx.database, "hilltop").await.unwrap();

    let created = cancellations::create_cancellation(&fx.database, &fx.admin, &half_term())
        .await
        .unwrap();

    let err = cancellations::deactivate_cancellation(&fx.database, &other.admin, created.id)
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let foreign_slot = CancellationRequest {
        slot_id: Some(fx.slot.id),
        date: Some(date("2025-10-13")),
        ..request(ScopeKind::Session)
    };
    let err = cancellations::create_cancellation(&fx.database, &other.admin, &foreign_slot)
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    assert!(cancellations::list_cancellations(&other.database, &other.admin, true)
        .await
        .unwrap()
        .is_empty());
    let status =
        sessions::check_session(&other.database, &other.admin, other.slot.id, date("2025-10-27"))
            .await
            .unwrap();
    assert!(!status.cancelled);
}

#[tokio::test]
async fn test_range_limits_are_enforced() {
    let fx = ClubFixture::new_default().await.unwrap();

    let err = sessions::resolve_cancelled_range(
        &fx.database,
        &fx.admin,
        date("2025-11-01"),
        date("2025-10-01"),
        None,
        366,
    )
    .await
    .unwrap_err();
    assert!(err.is_validation());

    let err = sessions::resolve_cancelled_range(
        &fx.database,
        &fx.admin,
        date("2025-01-01"),
        date("2025-12-31"),
        None,
        30,
    )
    .await
    .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_teaching_period_filter_skips_groups_without_enrollments() {
    let fx = ClubFixture::new_default().await.unwrap();
    cancellations::create_cancellation(&fx.database, &fx.admin, &half_term())
        .await
        .unwrap();

    let none = sessions::resolve_cancelled_range(
        &fx.database,
        &fx.admin,
        date("2025-10-27"),
        date("2025-10-31"),
        Some(fx.period.id),
        366,
    )
    .await
    .unwrap();
    assert!(none.is_empty());

    fx.enrolled_student("Ana", "Silva").await.unwrap();
    let some = sessions::resolve_cancelled_range(
        &fx.database,
        &fx.admin,
        date("2025-10-27"),
        date("2025-10-31"),
        Some(fx.period.id),
        366,
    )
    .await
    .unwrap();
    assert_eq!(some.len(), 1);
}
