//! Error type system for the account service
//!
//! Every failure that reaches a handler is an [`AppError`]. Each variant maps
//! to exactly one HTTP status and renders as `{"error": "<message>"}`, with an
//! optional `details` object for per-field validation messages.

use crate::auth::jwt::TokenError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Main error type for the account service
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Request errors
    #[error("{0}")]
    InvalidRequest(String),

    #[error("validation failed")]
    Validation(BTreeMap<String, String>),

    #[error("invalid login credentials")]
    InvalidCredentials,

    // Access errors
    #[error("user not authorized: {0}")]
    Unauthorized(String),

    #[error("access denied: {0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(String),

    // Persistence errors
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    // Credential errors
    #[error("failed to hash password: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("token error: {0}")]
    Token(#[from] TokenError),

    // System errors
    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("background task failed: {0}")]
    Task(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_)
            | AppError::Validation(_)
            | AppError::InvalidCredentials => StatusCode::BAD_REQUEST,

            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,

            AppError::Forbidden(_) => StatusCode::FORBIDDEN,

            AppError::NotFound(_) => StatusCode::NOT_FOUND,

            AppError::Database(_)
            | AppError::Pool(_)
            | AppError::Hash(_)
            | AppError::Token(_)
            | AppError::Config(_)
            | AppError::Io(_)
            | AppError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short variant name used in log records
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::InvalidRequest(_) => "InvalidRequest",
            AppError::Validation(_) => "Validation",
            AppError::InvalidCredentials => "InvalidCredentials",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Forbidden(_) => "Forbidden",
            AppError::NotFound(_) => "NotFound",
            AppError::Database(_) => "Database",
            AppError::Pool(_) => "Pool",
            AppError::Hash(_) => "Hash",
            AppError::Token(_) => "Token",
            AppError::Config(_) => "Config",
            AppError::Io(_) => "Io",
            AppError::Task(_) => "Task",
        }
    }

    /// Shorthand for a missing account
    pub fn account_not_found(id: i64) -> Self {
        AppError::NotFound(format!("account {}", id))
    }

    /// Message safe to show to clients. Server-side failures are masked.
    fn public_message(&self) -> String {
        if self.status_code().is_server_error() {
            "internal server error".to_string()
        } else {
            self.to_string()
        }
    }
}

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<BTreeMap<String, String>>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn from_error(error: &AppError) -> Self {
        let details = match error {
            AppError::Validation(fields) => Some(fields.clone()),
            _ => None,
        };
        Self {
            error: error.public_message(),
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        if status_code.is_server_error() {
            tracing::error!(
                error_type = self.error_type(),
                status_code = %status_code,
                "Request failed: {}",
                self
            );
        } else {
            tracing::warn!(
                error_type = self.error_type(),
                status_code = %status_code,
                "Request rejected: {}",
                self
            );
        }

        (status_code, Json(ErrorResponse::from_error(&self))).into_response()
    }
}

/// Result type alias for operations that can fail with AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::InvalidRequest("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InvalidCredentials.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Unauthorized("missing token".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden("other account".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::account_not_found(7).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Database(rusqlite::Error::InvalidQuery).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_login_failure_message() {
        let body = ErrorResponse::from_error(&AppError::InvalidCredentials);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"error": "invalid login credentials"}));
    }

    #[test]
    fn test_validation_details() {
        let mut fields = BTreeMap::new();
        fields.insert("first_name".to_string(), "first_name is required".to_string());
        let body = ErrorResponse::from_error(&AppError::Validation(fields));

        assert_eq!(body.error, "validation failed");
        assert_eq!(
            body.details.unwrap().get("first_name").map(String::as_str),
            Some("first_name is required")
        );
    }

    #[test]
    fn test_server_errors_are_masked() {
        let body = ErrorResponse::from_error(&AppError::Database(rusqlite::Error::InvalidQuery));
        assert_eq!(body.error, "internal server error");
        assert!(body.details.is_none());
    }
}
