//! Error boundary - converts every handler failure into the wire envelope.

use actix_web::{HttpResponse, ResponseError, http::StatusCode, web};
use mentora_shared::ErrorResponse;
use std::fmt;

use mentora_core::error::RepoError;
use mentora_core::ports::AiError;

/// Application-level error type. Implementing `ResponseError` makes actix
/// render these as structured JSON; nothing a handler returns can reach the
/// client as an unhandled fault.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    /// Curation already performed for this (user, subject); carries the
    /// human-readable message, the stable code lives in the envelope.
    ResourceExists(String),
    /// AI provider failure - generic to the client, detailed in the log.
    Upstream(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::ResourceExists(msg) => write!(f, "Resource exists: {}", msg),
            AppError::Upstream(msg) => write!(f, "Upstream error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ResourceExists(_) => StatusCode::CONFLICT,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::ResourceExists(message) => ErrorResponse::resource_exists(message),
            AppError::Upstream(detail) => {
                tracing::error!("AI provider error: {}", detail);
                ErrorResponse::upstream_error()
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Duplicate(msg) => AppError::ResourceExists(msg),
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

impl From<AiError> for AppError {
    fn from(err: AiError) -> Self {
        AppError::Upstream(err.to_string())
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

/// JSON extractor configuration: malformed bodies get the same envelope as
/// every other validation failure instead of actix's default error text.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let body = ErrorResponse::bad_request(err.to_string());
        actix_web::error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(body),
        )
        .into()
    })
}
