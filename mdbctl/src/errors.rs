use crate::db::errors::DbError;
use crate::ops::capture::BackupError;
use crate::ops::restore::RestoreError;
use crate::types::IdentifierError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Invalid request data or business rule violation
    #[error("{message}")]
    BadRequest { message: String },

    /// Identifier failed the validation gate before any work happened
    #[error(transparent)]
    Validation(#[from] IdentifierError),

    /// Backup capture pipeline error
    #[error(transparent)]
    Backup(#[from] BackupError),

    /// Restore pipeline error
    #[error(transparent)]
    Restore(#[from] RestoreError),

    /// Database driver error
    #[error(transparent)]
    Database(#[from] DbError),

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::BadRequest { .. } | Error::Validation(_) => StatusCode::BAD_REQUEST,
            // The archive vanishing between upload and restore is our fault,
            // not the external tool's.
            Error::Restore(RestoreError::ArchiveNotFound(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Backup(_) | Error::Restore(_) => StatusCode::BAD_GATEWAY,
            Error::Database(db_err) => match db_err {
                DbError::InvalidDocument { .. } => StatusCode::BAD_REQUEST,
                DbError::Connection(_) => StatusCode::SERVICE_UNAVAILABLE,
                DbError::Driver(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Error::Internal { .. } | Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::BadRequest { message } => message.clone(),
            Error::Validation(err) => err.to_string(),
            // Pipeline failures carry the underlying tool message; the caller
            // needs it to diagnose a failed dump or restore.
            Error::Backup(err) => err.to_string(),
            Error::Restore(err) => err.to_string(),
            Error::Database(db_err) => match db_err {
                DbError::InvalidDocument { message } => message.clone(),
                DbError::Connection(_) => "Database connection failed".to_string(),
                DbError::Driver(_) => "Database error occurred".to_string(),
            },
            Error::Internal { .. } | Error::Other(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Internal { .. } | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Database(DbError::InvalidDocument { .. }) => {
                tracing::debug!("Client error: {}", self);
            }
            Error::Database(_) => {
                tracing::error!("Database error: {:#}", self);
            }
            Error::Backup(_) | Error::Restore(_) => {
                tracing::warn!("Pipeline error: {}", self);
            }
            Error::BadRequest { .. } | Error::Validation(_) => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();

        match &self {
            // Backup and restore report through the same JSON envelope their
            // success responses use, so clients parse one shape.
            Error::Backup(_) | Error::Restore(_) => {
                let body = json!({
                    "success": false,
                    "message": self.user_message(),
                });
                (status, axum::response::Json(body)).into_response()
            }
            _ => (status, self.user_message()).into_response(),
        }
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;
