// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Builds in-memory databases and a club with an admin, a coach, a Monday slot and a term
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `courtside`

use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use courtside::{
    config::ServerConfig,
    database::Database,
    server::ServerResources,
    services::{
        club_admin,
        schedule::{self, NewSlot, NewStudent},
    },
};
use courtside_core::models::{
    Club, CoachingGroup, DayOfWeek, GroupTimeSlot, Student, TeachingPeriod,
};
use courtside_core::permissions::{Actor, ClubRole};
use std::sync::{Arc, Once};
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    Ok(Database::new("sqlite::memory:").await?)
}

/// Build `ServerResources` over a database with default configuration
pub fn create_test_resources(database: &Database) -> Arc<ServerResources> {
    let config = ServerConfig {
        base_domain: "courtside.test".to_owned(),
        ..ServerConfig::default()
    };
    Arc::new(ServerResources::new(database.clone(), config))
}

/// Parse a `YYYY-MM-DD` literal
pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

/// Parse an `HH:MM` literal
pub fn time(value: &str) -> NaiveTime {
    NaiveTime::parse_from_str(value, "%H:%M").unwrap()
}

/// A club with one group, one Monday 16:00-17:00 slot and an autumn term
///
/// The coach is a member but is not assigned to the slot.
pub struct ClubFixture {
    pub database: Database,
    pub club: Club,
    pub admin: Actor,
    pub coach: Actor,
    pub group: CoachingGroup,
    pub slot: GroupTimeSlot,
    pub period: TeachingPeriod,
}

impl ClubFixture {
    /// Create the fixture under `subdomain`
    pub async fn create(database: &Database, subdomain: &str) -> Result<Self> {
        let club = club_admin::create_club(database, "Riverside LTC", subdomain).await?;

        let admin_id = Uuid::new_v4();
        club_admin::add_member(database, club.id, admin_id, "Sam Admin", ClubRole::Admin).await?;
        let admin = club_admin::resolve_actor(database, club.id, admin_id).await?;

        let coach_id = Uuid::new_v4();
        club_admin::add_member(database, club.id, coach_id, "Casey Coach", ClubRole::Coach)
            .await?;
        let coach = club_admin::resolve_actor(database, club.id, coach_id).await?;

        let group = schedule::create_group(database, &admin, "Juniors", Some("Under 12s")).await?;
        let slot = schedule::create_slot(
            database,
            &admin,
            &NewSlot {
                group_id: group.id,
                day_of_week: DayOfWeek::Monday,
                start_time: time("16:00"),
                end_time: time("17:00"),
                capacity: Some(8),
            },
        )
        .await?;
        let period = schedule::create_teaching_period(
            database,
            &admin,
            "Autumn 2025",
            date("2025-09-01"),
            date("2025-12-19"),
        )
        .await?;

        Ok(Self {
            database: database.clone(),
            club,
            admin,
            coach,
            group,
            slot,
            period,
        })
    }

    /// Fresh in-memory database with the fixture under `riverside`
    pub async fn new_default() -> Result<Self> {
        let database = create_test_database().await?;
        Self::create(&database, "riverside").await
    }

    /// Assign the fixture coach to the fixture slot
    pub async fn assign_coach(&self) -> Result<()> {
        schedule::assign_coach(&self.database, &self.admin, self.slot.id, self.coach.user_id)
            .await?;
        Ok(())
    }

    /// Create a student enrolled in the fixture group for the fixture period
    pub async fn enrolled_student(&self, first_name: &str, last_name: &str) -> Result<Student> {
        let student = schedule::create_student(
            &self.database,
            &self.admin,
            &NewStudent {
                first_name: first_name.to_owned(),
                last_name: last_name.to_owned(),
                ..NewStudent::default()
            },
        )
        .await?;
        schedule::enroll_student(
            &self.database,
            &self.admin,
            student.id,
            self.group.id,
            self.period.id,
        )
        .await?;
        Ok(student)
    }
}
