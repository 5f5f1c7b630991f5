// ABOUTME: Environment-only server configuration for the club administration backend
// ABOUTME: Reads HTTP_PORT, DATABASE_URL, BASE_DOMAIN and request limits with typed defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

//! Environment-based configuration

use super::database::DatabaseUrl;
use crate::constants::{limits, network};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use tracing::info;

/// Server configuration loaded from the environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port the HTTP API listens on
    pub http_port: u16,
    /// Database location
    pub database_url: DatabaseUrl,
    /// Domain clubs are served under as `<subdomain>.<base_domain>`
    pub base_domain: String,
    /// Widest range accepted by range resolution, in days
    pub max_range_days: i64,
    /// Rows per transaction during CSV import
    pub import_batch_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: network::DEFAULT_HTTP_PORT,
            database_url: DatabaseUrl::default(),
            base_domain: network::DEFAULT_BASE_DOMAIN.to_owned(),
            max_range_days: limits::DEFAULT_MAX_RANGE_DAYS,
            import_batch_size: limits::DEFAULT_IMPORT_BATCH_SIZE,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the variable that failed to parse
    pub fn from_env() -> AppResult<Self> {
        let database_url = match env::var("DATABASE_URL") {
            Ok(value) => DatabaseUrl::parse_url(&value)?,
            Err(_) => DatabaseUrl::default(),
        };

        let config = Self {
            http_port: env_parse("HTTP_PORT", network::DEFAULT_HTTP_PORT)?,
            database_url,
            base_domain: env_var_or("BASE_DOMAIN", network::DEFAULT_BASE_DOMAIN)
                .trim()
                .trim_start_matches('.')
                .to_ascii_lowercase(),
            max_range_days: env_parse("MAX_RANGE_DAYS", limits::DEFAULT_MAX_RANGE_DAYS)?,
            import_batch_size: env_parse("IMPORT_BATCH_SIZE", limits::DEFAULT_IMPORT_BATCH_SIZE)?,
        };
        config.validate()?;

        info!("Configuration loaded from environment");
        Ok(config)
    }

    /// Reject values that cannot work at runtime
    ///
    /// # Errors
    ///
    /// Returns a configuration error for non-positive limits or an empty base domain
    pub fn validate(&self) -> AppResult<()> {
        if self.max_range_days < 1 {
            return Err(AppError::config("MAX_RANGE_DAYS must be at least 1"));
        }
        if self.import_batch_size == 0 {
            return Err(AppError::config("IMPORT_BATCH_SIZE must be at least 1"));
        }
        if self.base_domain.is_empty() {
            return Err(AppError::config("BASE_DOMAIN must not be empty"));
        }
        Ok(())
    }

    /// Human-readable configuration summary for startup logs
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Courtside Server Configuration:\n\
             - HTTP Port: {}\n\
             - Database: {}\n\
             - Base Domain: {}\n\
             - Max Range Days: {}\n\
             - Import Batch Size: {}",
            self.http_port,
            if self.database_url.is_memory() {
                "SQLite (in-memory)"
            } else {
                "SQLite"
            },
            self.base_domain,
            self.max_range_days,
            self.import_batch_size,
        )
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn env_parse<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::config(format!("Invalid {key} value '{raw}': {e}"))),
        Err(_) => Ok(default),
    }
}
