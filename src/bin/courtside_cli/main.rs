// ABOUTME: Courtside CLI - operator tool for club setup, cancellations, session checks and imports
// ABOUTME: Acts as a club member given by --club and --user-id, with the same role checks as the API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems
//!
//! Usage:
//! ```bash
//! # Create a club and its first administrator
//! courtside-cli club create --name "Riverside LTC" --subdomain riverside \
//!     --admin-id 7d3c... --admin-name "Sam Admin"
//!
//! # Cancel a whole week for half term
//! courtside-cli --club riverside --user-id 7d3c... cancellation create \
//!     --scope week --week-start 2025-10-27 --week-end 2025-10-31 --reason "Half term"
//!
//! # List cancelled sessions in a range
//! courtside-cli --club riverside --user-id 7d3c... session resolve --start 2025-10-01 --end 2025-12-19
//!
//! # Import players into a teaching period
//! courtside-cli --club riverside --user-id 7d3c... players import roster.csv --teaching-period 9f1a...
//! ```

mod commands;
mod helpers;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use courtside::{
    config::{DatabaseUrl, ServerConfig},
    database::Database,
    errors::{AppError, AppResult},
    logging::LoggingConfig,
};
use courtside_core::models::ScopeKind;
use courtside_core::permissions::ClubRole;
use std::path::PathBuf;
use tracing::debug;
use uuid::Uuid;

type Result<T> = AppResult<T>;

#[derive(Parser)]
#[command(
    name = "courtside-cli",
    about = "Courtside club administration CLI",
    long_about = "Command-line tool for setting up clubs, managing cancellations, checking sessions and importing players."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Club subdomain to act in
    #[arg(long, global = true)]
    club: Option<String>,

    /// Club member to act as
    #[arg(long, global = true)]
    user_id: Option<Uuid>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Club management commands
    Club {
        #[command(subcommand)]
        action: ClubCommand,
    },

    /// Cancellation registry commands
    Cancellation {
        #[command(subcommand)]
        action: CancellationCommand,
    },

    /// Session resolver commands
    Session {
        #[command(subcommand)]
        action: SessionCommand,
    },

    /// Player roster commands
    Players {
        #[command(subcommand)]
        action: PlayersCommand,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum ClubCommand {
    /// Create a club, optionally with its first administrator
    Create {
        /// Display name
        #[arg(long)]
        name: String,

        /// Subdomain the club is served under
        #[arg(long)]
        subdomain: String,

        /// User id of the first administrator
        #[arg(long, requires = "admin_name")]
        admin_id: Option<Uuid>,

        /// Display name of the first administrator
        #[arg(long)]
        admin_name: Option<String>,
    },

    /// Add a member to the club given by --club
    AddMember {
        /// User id of the new member
        #[arg(long)]
        member_id: Uuid,

        /// Display name
        #[arg(long)]
        name: String,

        /// Role in the club
        #[arg(long, value_enum, default_value_t = RoleArg::Coach)]
        role: RoleArg,
    },
}

/// Club role accepted on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum RoleArg {
    /// Full administrative rights
    Admin,
    /// Runs assigned sessions
    Coach,
}

impl From<RoleArg> for ClubRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Admin => Self::Admin,
            RoleArg::Coach => Self::Coach,
        }
    }
}

/// Cancellation scope accepted on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ScopeArg {
    /// One occurrence of one slot, needs --slot-id and --date
    Session,
    /// Every slot on --date
    Day,
    /// Every slot from --week-start to --week-end
    Week,
}

impl From<ScopeArg> for ScopeKind {
    fn from(scope: ScopeArg) -> Self {
        match scope {
            ScopeArg::Session => Self::Session,
            ScopeArg::Day => Self::Day,
            ScopeArg::Week => Self::Week,
        }
    }
}

#[non_exhaustive]
#[derive(Subcommand)]
enum CancellationCommand {
    /// List cancellations in creation order
    List {
        /// Include deactivated cancellations
        #[arg(long)]
        include_inactive: bool,
    },

    /// Create a cancellation
    Create {
        /// What the cancellation covers
        #[arg(long, value_enum)]
        scope: ScopeArg,

        /// Date for session and day scopes (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// First date for week scope
        #[arg(long)]
        week_start: Option<NaiveDate>,

        /// Last date for week scope
        #[arg(long)]
        week_end: Option<NaiveDate>,

        /// Slot for session scope
        #[arg(long)]
        slot_id: Option<Uuid>,

        /// Reason shown to players and coaches
        #[arg(long)]
        reason: Option<String>,
    },

    /// Deactivate a cancellation; the record is kept
    Deactivate {
        /// Cancellation to deactivate
        cancellation_id: Uuid,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum SessionCommand {
    /// Check whether one occurrence is cancelled
    Check {
        /// Slot to check
        #[arg(long)]
        slot_id: Uuid,

        /// Date to check (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
    },

    /// List cancelled occurrences between two dates, inclusive
    Resolve {
        /// First date
        #[arg(long)]
        start: NaiveDate,

        /// Last date
        #[arg(long)]
        end: NaiveDate,

        /// Only groups with enrollments in this teaching period
        #[arg(long)]
        teaching_period: Option<Uuid>,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum PlayersCommand {
    /// Import students from CSV and enroll them for a teaching period
    Import {
        /// CSV file with header first_name,last_name,contact_email,medical_notes,group
        file: PathBuf,

        /// Teaching period to enroll into
        #[arg(long)]
        teaching_period: Uuid,

        /// Rows per transaction (defaults to IMPORT_BATCH_SIZE)
        #[arg(long)]
        batch_size: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::for_cli();
    if cli.verbose {
        logging.level = "debug".to_owned();
    }
    logging
        .init()
        .map_err(|e| AppError::config(format!("Failed to initialize logging: {e}")))?;

    let mut config = ServerConfig::from_env()?;
    if let Some(url) = cli.database_url.as_deref() {
        config.database_url = DatabaseUrl::parse_url(url)?;
    }
    debug!("Connecting to database: {}", config.database_url);
    let database = Database::new(&config.database_url.to_connection_string()).await?;

    let session = commands::Session {
        database: &database,
        club: cli.club.as_deref(),
        user_id: cli.user_id,
    };

    match cli.command {
        Command::Club { action } => match action {
            ClubCommand::Create {
                name,
                subdomain,
                admin_id,
                admin_name,
            } => {
                commands::club::create(&database, &name, &subdomain, admin_id, admin_name.as_deref())
                    .await?;
            }
            ClubCommand::AddMember {
                member_id,
                name,
                role,
            } => {
                commands::club::add_member(&session, member_id, &name, role.into()).await?;
            }
        },
        Command::Cancellation { action } => match action {
            CancellationCommand::List { include_inactive } => {
                commands::cancellation::list(&session, include_inactive).await?;
            }
            CancellationCommand::Create {
                scope,
                date,
                week_start,
                week_end,
                slot_id,
                reason,
            } => {
                let request = courtside_core::models::CancellationRequest {
                    scope: scope.into(),
                    date,
                    week_start,
                    week_end,
                    slot_id,
                    reason,
                };
                commands::cancellation::create(&session, &request).await?;
            }
            CancellationCommand::Deactivate { cancellation_id } => {
                commands::cancellation::deactivate(&session, cancellation_id).await?;
            }
        },
        Command::Session { action } => match action {
            SessionCommand::Check { slot_id, date } => {
                commands::session::check(&session, slot_id, date).await?;
            }
            SessionCommand::Resolve {
                start,
                end,
                teaching_period,
            } => {
                commands::session::resolve(&session, start, end, teaching_period, config.max_range_days)
                    .await?;
            }
        },
        Command::Players { action } => match action {
            PlayersCommand::Import {
                file,
                teaching_period,
                batch_size,
            } => {
                let batch_size = batch_size.unwrap_or(config.import_batch_size);
                commands::players::import(&session, &file, teaching_period, batch_size).await?;
            }
        },
    }

    Ok(())
}
