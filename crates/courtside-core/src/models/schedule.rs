// ABOUTME: Recurring weekly schedule models for coaching groups
// ABOUTME: DayOfWeek, GroupTimeSlot, CoachingGroup, TeachingPeriod, Student and Enrollment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

use super::club::ClubId;
use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

/// Day of the week a slot recurs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayOfWeek {
    /// Monday
    Monday,
    /// Tuesday
    Tuesday,
    /// Wednesday
    Wednesday,
    /// Thursday
    Thursday,
    /// Friday
    Friday,
    /// Saturday
    Saturday,
    /// Sunday
    Sunday,
}

impl DayOfWeek {
    /// All days, Monday first
    pub const ALL: [Self; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
            Self::Sunday => "sunday",
        }
    }

    /// Parse from database string representation (case-insensitive)
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|day| day.as_str().eq_ignore_ascii_case(s.trim()))
    }

    /// Map a chrono weekday
    #[must_use]
    pub const fn from_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => Self::Monday,
            Weekday::Tue => Self::Tuesday,
            Weekday::Wed => Self::Wednesday,
            Weekday::Thu => Self::Thursday,
            Weekday::Fri => Self::Friday,
            Weekday::Sat => Self::Saturday,
            Weekday::Sun => Self::Sunday,
        }
    }

    /// Day of the week a calendar date falls on
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self::from_weekday(date.weekday())
    }

    /// Zero-based index, Monday = 0
    #[must_use]
    pub const fn index(&self) -> usize {
        *self as usize
    }
}

/// A coaching group (squad) that meets in one or more weekly slots
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachingGroup {
    /// Unique identifier
    pub id: Uuid,
    /// Owning club
    pub club_id: ClubId,
    /// Display name, unique within the club
    pub name: String,
    /// Optional description
    pub description: Option<String>,
}

/// Recurring weekly occurrence of a coaching group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupTimeSlot {
    /// Unique identifier
    pub id: Uuid,
    /// Owning club
    pub club_id: ClubId,
    /// Group that meets in this slot
    pub group_id: Uuid,
    /// Day of the week the slot recurs on
    pub day_of_week: DayOfWeek,
    /// Start of the session
    pub start_time: NaiveTime,
    /// End of the session
    pub end_time: NaiveTime,
    /// Maximum number of players, if limited
    pub capacity: Option<u32>,
}

impl GroupTimeSlot {
    /// Whether an occurrence of this slot falls on `date`
    #[must_use]
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        self.day_of_week == DayOfWeek::of(date)
    }

    /// Natural ordering used when listing occurrences on the same date
    #[must_use]
    pub fn schedule_order(&self, other: &Self) -> Ordering {
        (self.day_of_week, self.start_time, self.end_time, self.id).cmp(&(
            other.day_of_week,
            other.start_time,
            other.end_time,
            other.id,
        ))
    }
}

/// Administrative term or season scoping enrollments and plans
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeachingPeriod {
    /// Unique identifier
    pub id: Uuid,
    /// Owning club
    pub club_id: ClubId,
    /// Display name (e.g. "Summer 2024")
    pub name: String,
    /// First day of the period
    pub start_date: NaiveDate,
    /// Last day of the period
    pub end_date: NaiveDate,
}

impl TeachingPeriod {
    /// Whether `date` lies inside the period (inclusive)
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// A player enrolled (or enrollable) at the club
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    /// Unique identifier
    pub id: Uuid,
    /// Owning club
    pub club_id: ClubId,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Contact email for the player or guardian
    pub contact_email: Option<String>,
    /// Medical information coaches must be aware of
    pub medical_notes: Option<String>,
}

impl Student {
    /// "First Last"
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Membership of a student in a group for one teaching period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    /// Unique identifier
    pub id: Uuid,
    /// Owning club
    pub club_id: ClubId,
    /// Enrolled student
    pub student_id: Uuid,
    /// Group the student trains with
    pub group_id: Uuid,
    /// Period the enrollment is valid for
    pub teaching_period_id: Uuid,
    /// Withdrawn enrollments are kept but inactive
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_of_week_of_date() {
        let monday = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        assert_eq!(DayOfWeek::of(monday), DayOfWeek::Monday);
        let sunday = NaiveDate::from_ymd_opt(2024, 6, 9).unwrap();
        assert_eq!(DayOfWeek::of(sunday), DayOfWeek::Sunday);
    }

    #[test]
    fn test_day_of_week_parse() {
        assert_eq!(DayOfWeek::parse("Tuesday"), Some(DayOfWeek::Tuesday));
        assert_eq!(DayOfWeek::parse(" sunday "), Some(DayOfWeek::Sunday));
        assert_eq!(DayOfWeek::parse("funday"), None);
        assert_eq!(DayOfWeek::Friday.index(), 4);
    }
}
