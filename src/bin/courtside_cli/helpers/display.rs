// ABOUTME: Output formatting helpers for courtside-cli
// ABOUTME: Renders cancellations, cancelled sessions and import reports as plain text
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

use courtside::import::ImportReport;
use courtside::sessions::CancelledOccurrence;
use courtside_core::models::{Cancellation, CancellationScope};

/// One-line description of a cancellation scope
pub fn describe_scope(scope: &CancellationScope) -> String {
    match scope {
        CancellationScope::Session { slot_id, date } => format!("session {slot_id} on {date}"),
        CancellationScope::Day { date } => format!("all sessions on {date}"),
        CancellationScope::Week {
            start_date,
            end_date,
        } => format!("all sessions {start_date} to {end_date}"),
    }
}

/// Print one cancellation
pub fn display_cancellation(cancellation: &Cancellation) {
    let state = if cancellation.state.is_active() {
        "active"
    } else {
        "inactive"
    };
    println!(
        "{}  [{state}]  {}",
        cancellation.id,
        describe_scope(&cancellation.scope)
    );
    if let Some(reason) = &cancellation.reason {
        println!("   Reason: {reason}");
    }
    println!(
        "   Created: {} by {}",
        cancellation.created_at.format("%Y-%m-%d %H:%M UTC"),
        cancellation.created_by
    );
}

/// Print cancelled occurrences as a table
pub fn display_cancelled_sessions(sessions: &[CancelledOccurrence]) {
    if sessions.is_empty() {
        println!("No cancelled sessions in range");
        return;
    }
    println!("{:<12} {:<10} {:<13} {:<38} REASON", "DATE", "DAY", "TIME", "SLOT");
    println!("{}", "=".repeat(90));
    for session in sessions {
        println!(
            "{:<12} {:<10} {:<13} {:<38} {}",
            session.date,
            session.day_of_week.as_str(),
            format!(
                "{}-{}",
                session.start_time.format("%H:%M"),
                session.end_time.format("%H:%M")
            ),
            session.slot_id,
            session.reason.as_deref().unwrap_or("-")
        );
    }
    println!("\n{} cancelled session(s)", sessions.len());
}

/// Print an import report
pub fn display_import_report(report: &ImportReport) {
    println!(
        "Imported {} player(s) in {} batch(es)",
        report.rows_imported, report.batches_committed
    );
    if let Some(failure) = &report.failure {
        println!("Stopped at row {}: {}", failure.row, failure.message);
        if let Some(resume) = report.resume_at_row {
            println!("The failing batch was rolled back; fix the file and resume from row {resume}");
        }
    }
}
