// ABOUTME: Conversion of sqlx errors into AppError
// ABOUTME: Uniqueness violations become conflicts, missing rows become not-found
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Club Systems

use super::{AppError, ErrorCode};

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        if matches!(error, sqlx::Error::RowNotFound) {
            return Self::new(ErrorCode::ResourceNotFound, "Row not found");
        }

        let unique_violation = error
            .as_database_error()
            .filter(|db_error| db_error.is_unique_violation())
            .map(|db_error| db_error.message().to_owned());

        if let Some(message) = unique_violation {
            return Self::new(ErrorCode::ResourceAlreadyExists, message);
        }

        tracing::error!(error = %error, "Database operation failed");
        Self::new(ErrorCode::DatabaseError, error.to_string()).with_source(error)
    }
}
