// ABOUTME: Courtside HTTP API server binary
// ABOUTME: Loads configuration from the environment, opens the database and serves the club API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

//! # Courtside API Server Binary
//!
//! Serves the club administration API. Clubs are addressed by subdomain
//! under `BASE_DOMAIN`; the acting member comes from the `x-user-id` header
//! set by the authenticating proxy.

use anyhow::Result;
use clap::Parser;
use courtside::{
    config::{DatabaseUrl, ServerConfig},
    database::Database,
    logging,
    server::{self, ServerResources},
};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "courtside-server")]
#[command(about = "Courtside - tennis club administration API")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(url) = args.database_url.as_deref() {
        config.database_url = DatabaseUrl::parse_url(url)?;
    }

    logging::init_from_env()?;

    info!("Starting Courtside API server");
    info!("{}", config.summary());

    let database = Database::new(&config.database_url.to_connection_string()).await?;
    info!("Database initialized: {}", config.database_url);

    display_available_endpoints(&config);

    let resources = Arc::new(ServerResources::new(database, config));
    if let Err(e) = server::run(resources).await {
        error!("Server error: {e}");
        return Err(e.into());
    }
    Ok(())
}

/// Log the API surface at startup
#[allow(clippy::cognitive_complexity)]
fn display_available_endpoints(config: &ServerConfig) {
    let host = format!("<club>.{}:{}", config.base_domain, config.http_port);
    info!("=== Available API Endpoints ===");
    info!("   Health:            GET    http://{host}/health");
    info!("   Cancellations:     GET    http://{host}/api/cancellations");
    info!("   Cancel:            POST   http://{host}/api/cancellations");
    info!("   Deactivate:        DELETE http://{host}/api/cancellations/{{id}}");
    info!("   Check session:     GET    http://{host}/api/sessions/check");
    info!("   Cancelled range:   GET    http://{host}/api/sessions/cancelled");
    info!("   Open register:     POST   http://{host}/api/registers");
    info!("   Get register:      GET    http://{host}/api/registers/{{id}}");
    info!("   Mark attendance:   PUT    http://{host}/api/registers/{{id}}/entries/{{student_id}}");
    info!("   Plans:             POST   http://{host}/api/plans");
    info!("=== End of Endpoint List ===");
}
