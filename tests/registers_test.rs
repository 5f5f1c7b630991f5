// ABOUTME: Integration tests for register materialization and attendance recording
// ABOUTME: Plan overlay, baseline entries, duplicate detection and cancelled occurrences
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use common::{date, ClubFixture};
use courtside::errors::ErrorCode;
use courtside::services::cancellations;
use courtside::services::plans::{self, NewPlan, NewPlanEntry, NewTrialPlayer};
use courtside::services::registers::{self, OpenRegisterRequest};
use courtside_core::models::{
    AttendanceStatus, CancellationRequest, PlannedStatus, PlayerType, Register, RegisterEntry,
    ScopeKind,
};
use uuid::Uuid;

fn open_request(fx: &ClubFixture, date_str: &str) -> OpenRegisterRequest {
    OpenRegisterRequest {
        slot_id: fx.slot.id,
        date: date(date_str),
        teaching_period_id: None,
        notes: None,
    }
}

fn entry_for(register: &Register, student_id: Uuid) -> &RegisterEntry {
    register
        .entries
        .iter()
        .find(|entry| entry.student_id == student_id)
        .unwrap()
}

#[tokio::test]
async fn test_duplicate_register_is_a_conflict() {
    let fx = ClubFixture::new_default().await.unwrap();

    let first = registers::create_register(
        &fx.database,
        &fx.admin,
        fx.slot.id,
        date("2025-10-13"),
        fx.period.id,
        None,
    )
    .await
    .unwrap();
    assert!(first.entries.is_empty());

    let err = registers::create_register(
        &fx.database,
        &fx.admin,
        fx.slot.id,
        date("2025-10-13"),
        fx.period.id,
        None,
    )
    .await
    .unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(err.code, ErrorCode::ResourceAlreadyExists);
}

#[tokio::test]
async fn test_duplicate_entry_is_a_conflict() {
    let fx = ClubFixture::new_default().await.unwrap();
    let student = fx.enrolled_student("Ana", "Silva").await.unwrap();
    let register = registers::create_register(
        &fx.database,
        &fx.admin,
        fx.slot.id,
        date("2025-10-13"),
        fx.period.id,
        None,
    )
    .await
    .unwrap();

    let entry = registers::add_entry(
        &fx.database,
        &fx.admin,
        register.id,
        student.id,
        AttendanceStatus::Present,
        None,
    )
    .await
    .unwrap();
    assert!(!entry.predicted);

    let err = registers::add_entry(
        &fx.database,
        &fx.admin,
        register.id,
        student.id,
        AttendanceStatus::Sick,
        None,
    )
    .await
    .unwrap_err();
    assert!(err.is_conflict());

    let stored = registers::get_register(&fx.database, &fx.admin, register.id)
        .await
        .unwrap();
    assert_eq!(stored.entries.len(), 1);
    assert_eq!(entry_for(&stored, student.id).status, AttendanceStatus::Present);
}

#[tokio::test]
async fn test_open_register_overlays_plan_then_fills_baseline() {
    let fx = ClubFixture::new_default().await.unwrap();
    let away = fx.enrolled_student("Ana", "Silva").await.unwrap();
    let makeup = fx.enrolled_student("Ben", "Okafor").await.unwrap();
    let unplanned = fx.enrolled_student("Cleo", "Martin").await.unwrap();

    let plan = plans::create_plan(
        &fx.database,
        &fx.admin,
        &NewPlan {
            slot_id: fx.slot.id,
            date: date("2025-10-13"),
            teaching_period_id: fx.period.id,
            notes: Some("Serve practice".to_owned()),
        },
    )
    .await
    .unwrap();
    plans::add_plan_entry(
        &fx.database,
        &fx.admin,
        plan.id,
        &NewPlanEntry {
            student_id: away.id,
            planned_status: PlannedStatus::Absent,
            player_type: PlayerType::Regular,
            notes: Some("Family holiday".to_owned()),
        },
    )
    .await
    .unwrap();
    plans::add_plan_entry(
        &fx.database,
        &fx.admin,
        plan.id,
        &NewPlanEntry {
            student_id: makeup.id,
            planned_status: PlannedStatus::Makeup,
            player_type: PlayerType::Makeup,
            notes: None,
        },
    )
    .await
    .unwrap();
    plans::add_trial_player(
        &fx.database,
        &fx.admin,
        plan.id,
        &NewTrialPlayer {
            first_name: "Dev".to_owned(),
            last_name: "Patel".to_owned(),
            ..NewTrialPlayer::default()
        },
    )
    .await
    .unwrap();

    let opened = registers::open_register(&fx.database, &fx.admin, &open_request(&fx, "2025-10-13"))
        .await
        .unwrap();

    assert!(opened.created);
    assert!(opened.plan.plan_found);
    assert_eq!(opened.plan.entries_added, 2);
    assert_eq!(opened.plan.trial_players.len(), 1);
    assert_eq!(opened.baseline_entries, 1);
    assert_eq!(opened.register.teaching_period_id, fx.period.id);
    assert!(opened
        .register
        .notes
        .as_deref()
        .unwrap()
        .contains("Serve practice"));

    let stored = registers::get_register(&fx.database, &fx.admin, opened.register.id)
        .await
        .unwrap();
    assert_eq!(stored.entries.len(), 3);

    let away_entry = entry_for(&stored, away.id);
    assert_eq!(away_entry.status, AttendanceStatus::AwayWithNotice);
    assert!(away_entry.predicted);
    assert_eq!(away_entry.notes.as_deref(), Some("Family holiday"));

    let makeup_entry = entry_for(&stored, makeup.id);
    assert_eq!(makeup_entry.status, AttendanceStatus::Present);
    assert!(makeup_entry.predicted);

    let baseline = entry_for(&stored, unplanned.id);
    assert_eq!(baseline.status, AttendanceStatus::Absent);
    assert!(!baseline.predicted);
}

#[tokio::test]
async fn test_opening_twice_returns_the_existing_register() {
    let fx = ClubFixture::new_default().await.unwrap();
    fx.enrolled_student("Ana", "Silva").await.unwrap();

    let first = registers::open_register(&fx.database, &fx.admin, &open_request(&fx, "2025-10-13"))
        .await
        .unwrap();
    let second = registers::open_register(&fx.database, &fx.admin, &open_request(&fx, "2025-10-13"))
        .await
        .unwrap();

    assert!(first.created);
    assert!(!second.created);
    assert_eq!(first.register.id, second.register.id);
    assert_eq!(second.register.entries.len(), 1);
    assert_eq!(second.baseline_entries, 0);
}

#[tokio::test]
async fn test_cancelled_occurrence_cannot_be_opened() {
    let fx = ClubFixture::new_default().await.unwrap();
    cancellations::create_cancellation(
        &fx.database,
        &fx.admin,
        &CancellationRequest {
            scope: ScopeKind::Day,
            date: Some(date("2025-10-13")),
            week_start: None,
            week_end: None,
            slot_id: None,
            reason: Some("Floodlights broken".to_owned()),
        },
    )
    .await
    .unwrap();

    let err = registers::open_register(&fx.database, &fx.admin, &open_request(&fx, "2025-10-13"))
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(err.message.contains("Floodlights broken"));

    let next_week = registers::open_register(&fx.database, &fx.admin, &open_request(&fx, "2025-10-20"))
        .await
        .unwrap();
    assert!(next_week.created);
}

#[tokio::test]
async fn test_marking_attendance_replaces_the_forecast() {
    let fx = ClubFixture::new_default().await.unwrap();
    let student = fx.enrolled_student("Ana", "Silva").await.unwrap();
    let plan = plans::create_plan(
        &fx.database,
        &fx.admin,
        &NewPlan {
            slot_id: fx.slot.id,
            date: date("2025-10-13"),
            teaching_period_id: fx.period.id,
            notes: None,
        },
    )
    .await
    .unwrap();
    plans::add_plan_entry(
        &fx.database,
        &fx.admin,
        plan.id,
        &NewPlanEntry {
            student_id: student.id,
            planned_status: PlannedStatus::Absent,
            player_type: PlayerType::Regular,
            notes: None,
        },
    )
    .await
    .unwrap();
    let opened = registers::open_register(&fx.database, &fx.admin, &open_request(&fx, "2025-10-13"))
        .await
        .unwrap();

    let marked = registers::mark_attendance(
        &fx.database,
        &fx.admin,
        opened.register.id,
        student.id,
        AttendanceStatus::Present,
        Some("Came after all"),
    )
    .await
    .unwrap();
    assert_eq!(marked.status, AttendanceStatus::Present);
    assert!(!marked.predicted);
    assert_eq!(marked.notes.as_deref(), Some("Came after all"));

    let err = registers::mark_attendance(
        &fx.database,
        &fx.admin,
        opened.register.id,
        Uuid::new_v4(),
        AttendanceStatus::Present,
        None,
    )
    .await
    .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_register_date_must_match_slot_weekday() {
    let fx = ClubFixture::new_default().await.unwrap();

    let err = registers::open_register(&fx.database, &fx.admin, &open_request(&fx, "2025-10-14"))
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_register_date_must_fall_in_a_teaching_period() {
    let fx = ClubFixture::new_default().await.unwrap();

    let err = registers::open_register(&fx.database, &fx.admin, &open_request(&fx, "2026-01-05"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingRequiredField);
}

#[tokio::test]
async fn test_only_assigned_coaches_open_registers() {
    let fx = ClubFixture::new_default().await.unwrap();

    let err = registers::open_register(&fx.database, &fx.coach, &open_request(&fx, "2025-10-13"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);

    fx.assign_coach().await.unwrap();
    let opened = registers::open_register(&fx.database, &fx.coach, &open_request(&fx, "2025-10-13"))
        .await
        .unwrap();
    assert_eq!(opened.register.coach_id, fx.coach.user_id);
}

#[tokio::test]
async fn test_registers_are_invisible_to_other_clubs() {
    let fx = ClubFixture::new_default().await.unwrap();
    let other = ClubFixture::create(&fx.database, "hilltop").await.unwrap();
    let opened = registers::open_register(&fx.database, &fx.admin, &open_request(&fx, "2025-10-13"))
        .await
        .unwrap();

    let err = registers::get_register(&fx.database, &other.admin, opened.register.id)
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let err = registers::add_assistant(&fx.database, &fx.admin, opened.register.id, other.admin.user_id)
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let with_assistant =
        registers::add_assistant(&fx.database, &fx.admin, opened.register.id, fx.coach.user_id)
            .await
            .unwrap();
    assert_eq!(with_assistant.assistant_coach_ids, vec![fx.coach.user_id]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_opens_share_one_register() {
    common::init_test_logging();
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("courtside.db").display());
    let database = courtside::database::Database::new(&url).await.unwrap();
    let fx = ClubFixture::create(&database, "riverside").await.unwrap();
    for (first, last) in [("Ana", "Silva"), ("Ben", "Okafor"), ("Cleo", "Martin")] {
        fx.enrolled_student(first, last).await.unwrap();
    }

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let database = fx.database.clone();
            let admin = fx.admin.clone();
            let request = open_request(&fx, "2025-10-13");
            tokio::spawn(async move { registers::open_register(&database, &admin, &request).await })
        })
        .collect();

    let mut opened = Vec::new();
    for handle in handles {
        opened.push(handle.await.unwrap().unwrap());
    }

    assert_eq!(opened.iter().filter(|result| result.created).count(), 1);
    let register_id = opened[0].register.id;
    assert!(opened.iter().all(|result| result.register.id == register_id));

    let stored = registers::get_register(&fx.database, &fx.admin, register_id)
        .await
        .unwrap();
    assert_eq!(stored.entries.len(), 3);
}

#[tokio::test]
async fn test_deactivated_plan_is_ignored_when_opening() {
    let fx = ClubFixture::new_default().await.unwrap();
    let away = fx.enrolled_student("Ana", "Silva").await.unwrap();
    let plan = plans::create_plan(
        &fx.database,
        &fx.admin,
        &NewPlan {
            slot_id: fx.slot.id,
            date: date("2025-10-13"),
            teaching_period_id: fx.period.id,
            notes: Some("Serve practice".to_owned()),
        },
    )
    .await
    .unwrap();
    plans::add_plan_entry(
        &fx.database,
        &fx.admin,
        plan.id,
        &NewPlanEntry {
            student_id: away.id,
            planned_status: PlannedStatus::Absent,
            player_type: PlayerType::Regular,
            notes: None,
        },
    )
    .await
    .unwrap();
    plans::deactivate_plan(&fx.database, &fx.admin, plan.id)
        .await
        .unwrap();

    let opened = registers::open_register(&fx.database, &fx.admin, &open_request(&fx, "2025-10-13"))
        .await
        .unwrap();

    assert!(opened.created);
    assert!(!opened.plan.plan_found);
    assert_eq!(opened.baseline_entries, 1);
    assert!(opened.register.notes.is_none());
    let entry = entry_for(&opened.register, away.id);
    assert_eq!(entry.status, AttendanceStatus::Absent);
    assert!(!entry.predicted);
}
