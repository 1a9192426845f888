// ==========================================
// Order Batch Ingestion Service - API error types
// ==========================================
// Maps importer and repository failures to the deterministic HTTP
// status table and the standard error body:
// { timestamp, status, error, code, message, path }
// ==========================================

use crate::domain::types::ErrorCode;
use crate::importer::error::IngestError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

/// API layer error type
#[derive(Error, Debug)]
pub enum ApiError {
    // ===== Request validation =====
    #[error("the Idempotency-Key header is required")]
    MissingIdempotencyKey,

    #[error("the Idempotency-Key header must not exceed 50 characters")]
    IdempotencyKeyTooLong,

    #[error("the uploaded file is missing or empty")]
    MissingFile,

    #[error("invalid file format: {0}")]
    Format(String),

    // ===== Replay =====
    #[error("this file was already processed under the given idempotency key")]
    AlreadyProcessed,

    #[error("this file is currently being processed under the given idempotency key")]
    BeingProcessed,

    // ===== Authorization =====
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    // ===== Infrastructure =====
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingIdempotencyKey
            | ApiError::IdempotencyKeyTooLong
            | ApiError::MissingFile
            | ApiError::Format(_) => StatusCode::BAD_REQUEST,
            ApiError::AlreadyProcessed | ApiError::BeingProcessed => StatusCode::CONFLICT,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ApiError::MissingIdempotencyKey | ApiError::MissingFile => ErrorCode::FieldRequired,
            ApiError::IdempotencyKeyTooLong | ApiError::Format(_) => ErrorCode::FormatInvalid,
            ApiError::AlreadyProcessed => ErrorCode::AlreadyProcessed,
            ApiError::BeingProcessed => ErrorCode::BeingProcessed,
            ApiError::Unauthorized(_) => ErrorCode::Unauthorized,
            ApiError::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Render as the standard error body for the request path.
    pub fn into_response_for(self, path: &str) -> Response {
        let message = self.to_string();
        error_response(self.status(), self.code(), &message, path)
    }
}

// From<IngestError>: replay and structural outcomes keep their status;
// everything else is an internal failure
impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::FormatInvalid(msg) => ApiError::Format(msg),
            IngestError::AlreadyProcessed => ApiError::AlreadyProcessed,
            IngestError::BeingProcessed => ApiError::BeingProcessed,
            IngestError::Repository(e) => ApiError::Internal(e.to_string()),
        }
    }
}

// ==========================================
// ErrorResponse - standard error body
// ==========================================
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Local time the error was produced (ISO-8601)
    pub timestamp: NaiveDateTime,
    /// Numeric HTTP status
    pub status: u16,
    /// Standard HTTP reason phrase
    pub error: String,
    /// Stable business code from the taxonomy
    pub code: ErrorCode,
    /// Human-readable message, intended for direct display
    pub message: String,
    /// Endpoint that produced the error
    pub path: String,
}

/// Build the standard JSON error response.
pub fn error_response(
    status: StatusCode,
    code: ErrorCode,
    message: &str,
    path: &str,
) -> Response {
    let body = ErrorResponse {
        timestamp: chrono::Local::now().naive_local(),
        status: status.as_u16(),
        error: status
            .canonical_reason()
            .unwrap_or("Unknown")
            .to_string(),
        code,
        message: message.to_string(),
        path: path.to_string(),
    };
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::MissingIdempotencyKey.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Format("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::AlreadyProcessed.status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::BeingProcessed.status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::Unauthorized("x".into()).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_code_mapping() {
        assert_eq!(ApiError::MissingIdempotencyKey.code(), ErrorCode::FieldRequired);
        assert_eq!(ApiError::MissingFile.code(), ErrorCode::FieldRequired);
        assert_eq!(ApiError::Format("x".into()).code(), ErrorCode::FormatInvalid);
        assert_eq!(ApiError::AlreadyProcessed.code(), ErrorCode::AlreadyProcessed);
    }

    #[test]
    fn test_ingest_error_conversion() {
        let api: ApiError = IngestError::AlreadyProcessed.into();
        assert!(matches!(api, ApiError::AlreadyProcessed));

        let api: ApiError = IngestError::FormatInvalid("bad header".into()).into();
        assert!(matches!(api, ApiError::Format(_)));
    }
}
