//! Custom error types for the API service
//!
//! Every error renders as a failed envelope:
//! `{ "success": false, "message": ..., "error": { "code", "description" } }`.

use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::{Envelope, ErrorDetail, FieldErrors};
use thiserror::Error;
use tracing::error;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing, invalid or expired credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Unique field already taken
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Payload failed schema validation
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Too many requests: {0}")]
    TooManyRequests(String),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] common::error::DatabaseError),
}

impl ApiError {
    pub fn unauthorized() -> Self {
        ApiError::Unauthorized("Could not validate credentials".to_string())
    }

    pub fn not_found(what: &str) -> Self {
        ApiError::NotFound(format!("{} not found", what))
    }

    /// Map a failed write to `conflict` when a unique constraint rejected it
    pub fn from_write(e: anyhow::Error, conflict: impl FnOnce() -> ApiError) -> Self {
        if is_unique_violation(&e) {
            return conflict();
        }
        ApiError::Internal(e)
    }

    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            ApiError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
            ApiError::TooManyRequests(_) => (StatusCode::TOO_MANY_REQUESTS, "TOO_MANY_REQUESTS"),
            ApiError::Internal(_) | ApiError::Database(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ApiError::PayloadTooLarge("Upload exceeds the request size limit".to_string());
        }
        ApiError::BadRequest(format!("Invalid multipart body: {}", e.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.parts();

        let (message, fields) = match self {
            ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Conflict(msg)
            | ApiError::PayloadTooLarge(msg)
            | ApiError::TooManyRequests(msg) => (msg, None),
            ApiError::Validation(fields) => ("Please correct the highlighted fields.".to_string(), Some(fields)),
            ApiError::Internal(e) => {
                error!("Internal error: {:#}", e);
                ("Internal server error".to_string(), None)
            }
            ApiError::Database(e) => {
                error!("Database error: {}", e);
                ("Database error".to_string(), None)
            }
        };

        let description = match &fields {
            Some(fields) => fields.to_string(),
            None => message.clone(),
        };

        let body = Envelope::<()>::failure(
            message,
            ErrorDetail {
                code: code.to_string(),
                description,
                fields,
            },
        );

        (status, Json(body)).into_response()
    }
}

/// Whether a Postgres unique constraint (SQLSTATE 23505) caused `e`
pub fn is_unique_violation(e: &anyhow::Error) -> bool {
    e.chain().any(|cause| match cause.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::Database(db)) => db.is_unique_violation(),
        _ => false,
    })
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
