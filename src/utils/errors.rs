//! Error handling for the bakeshop backend
//!
//! This module defines the main error type used throughout the application
//! and maps every variant onto an HTTP status and a JSON error body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Main error type for the bakeshop application
#[derive(Error, Debug)]
pub enum BakeshopError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Storage service error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication required: {0}")]
    Authentication(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Date unavailable: {0}")]
    DateUnavailable(chrono::NaiveDate),

    #[error("Workshop is full: {requested} seats requested, {remaining} remaining")]
    WorkshopFull { requested: i32, remaining: i64 },

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("Multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Storage service specific errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Invalid storage response: {0}")]
    InvalidResponse(String),

    #[error("File too large: {size} bytes exceeds {limit}")]
    TooLarge { size: usize, limit: usize },

    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),
}

/// Result type alias for bakeshop operations
pub type Result<T> = std::result::Result<T, BakeshopError>;

/// Result type alias for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

impl BakeshopError {
    /// Shorthand for a missing row
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        BakeshopError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// HTTP status reported to the caller
    pub fn status_code(&self) -> StatusCode {
        match self {
            BakeshopError::InvalidInput(_)
            | BakeshopError::InvalidStateTransition { .. }
            | BakeshopError::DateUnavailable(_)
            | BakeshopError::WorkshopFull { .. }
            | BakeshopError::Multipart(_) => StatusCode::BAD_REQUEST,
            BakeshopError::Storage(StorageError::TooLarge { .. })
            | BakeshopError::Storage(StorageError::UnsupportedContentType(_)) => {
                StatusCode::BAD_REQUEST
            }
            BakeshopError::Authentication(_) | BakeshopError::Token(_) => StatusCode::UNAUTHORIZED,
            BakeshopError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            BakeshopError::NotFound { .. } => StatusCode::NOT_FOUND,
            BakeshopError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            BakeshopError::Database(_) => ErrorSeverity::Critical,
            BakeshopError::Migration(_) => ErrorSeverity::Critical,
            BakeshopError::Config(_) => ErrorSeverity::Critical,
            BakeshopError::PermissionDenied(_) => ErrorSeverity::Warning,
            BakeshopError::Authentication(_) => ErrorSeverity::Warning,
            BakeshopError::Token(_) => ErrorSeverity::Warning,
            BakeshopError::RateLimitExceeded => ErrorSeverity::Warning,
            BakeshopError::InvalidInput(_) => ErrorSeverity::Info,
            BakeshopError::InvalidStateTransition { .. } => ErrorSeverity::Info,
            BakeshopError::DateUnavailable(_) => ErrorSeverity::Info,
            BakeshopError::WorkshopFull { .. } => ErrorSeverity::Info,
            BakeshopError::NotFound { .. } => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

impl IntoResponse for BakeshopError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        match self.severity() {
            ErrorSeverity::Critical | ErrorSeverity::Error => {
                tracing::error!(status = status.as_u16(), error = %message, "Request failed")
            }
            ErrorSeverity::Warning => {
                tracing::warn!(status = status.as_u16(), error = %message, "Request rejected")
            }
            ErrorSeverity::Info => {
                tracing::debug!(status = status.as_u16(), error = %message, "Request rejected")
            }
        }

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<axum::extract::rejection::JsonRejection> for BakeshopError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        BakeshopError::InvalidInput(rejection.body_text())
    }
}

impl From<axum::extract::rejection::QueryRejection> for BakeshopError {
    fn from(rejection: axum::extract::rejection::QueryRejection) -> Self {
        BakeshopError::InvalidInput(rejection.body_text())
    }
}

impl From<axum::extract::rejection::PathRejection> for BakeshopError {
    fn from(rejection: axum::extract::rejection::PathRejection) -> Self {
        BakeshopError::InvalidInput(rejection.body_text())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
