/// Error types for blog-service
///
/// Errors are converted to appropriate HTTP responses for API clients.
/// Ownership refusals are not errors at all: the access policy answers them
/// with a redirect decision (see `services::policy`).
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

/// Result type for blog-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// A single field-level validation message, rendered back to the caller so
/// the submission form can be re-displayed with prior input retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Unresolvable slug, username, or post id
    #[error("{0} not found")]
    NotFound(String),

    /// Anonymous access to an identity-gated action
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Per-field validation failures
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    /// Transient backing-store failure (timeout, broken connection)
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Non-transient database failure
    #[error("database error: {0}")]
    Database(String),

    /// Internal server error
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Shorthand for a single-field validation failure.
    pub fn invalid_field(field: &str, message: &str) -> Self {
        AppError::Validation(vec![FieldError::new(field, message)])
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            // Bounded-wait failures surface as transient, not retried here.
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                AppError::StoreUnavailable(err.to_string())
            }
            _ => AppError::Database(err.to_string()),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        match self {
            AppError::Validation(errors) => HttpResponse::build(status).json(serde_json::json!({
                "errors": errors,
                "status": status.as_u16(),
            })),
            _ => HttpResponse::build(status).json(serde_json::json!({
                "error": self.to_string(),
                "status": status.as_u16(),
            })),
        }
    }
}
