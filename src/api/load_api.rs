// ==========================================
// Order Batch Ingestion Service - Order load endpoint
// ==========================================
// POST /api/v1/orders/load (multipart/form-data)
// Responsibilities: decode the upload, enforce the required header,
// compute the digest, parse, delegate to the processor and map the
// outcome to a response. No business rules live here.
// ==========================================

use crate::api::error::ApiError;
use crate::api::routes::AppState;
use crate::domain::types::ErrorCode;
use crate::domain::{BatchSummary, RowError};
use crate::importer::{parse_rows, sha256_hex};
use crate::repository::BatchLoadRepository;
use axum::extract::{Multipart, OriginalUri, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{error, info};
use uuid::Uuid;

/// Limit enforced by the idempotency store schema.
const MAX_IDEMPOTENCY_KEY_LEN: usize = 50;

// ==========================================
// LoadOrdersResponse - success / all-rejected body
// ==========================================
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadOrdersResponse {
    pub batch_load_id: Uuid,
    pub total_processed: i64,
    pub stored_count: i64,
    pub error_count: i64,
    /// Error counts grouped by taxonomy code
    pub errors_by_code: BTreeMap<ErrorCode, i64>,
    /// Per-row detail, in input-row order
    pub error_details: Vec<RowError>,
}

/// Handle one upload.
///
/// Status mapping:
/// - 201: at least one row stored
/// - 422: run completed with every row rejected
/// - 400: structural failure or missing required input
/// - 409: replay
/// - 500: infrastructure failure after reservation
pub async fn load_orders(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    let path = uri.path().to_string();

    let idempotency_key = match read_idempotency_key(&headers) {
        Ok(key) => key,
        Err(e) => return e.into_response_for(&path),
    };

    let bytes = match read_file_part(multipart).await {
        Ok(bytes) => bytes,
        Err(e) => return e.into_response_for(&path),
    };

    info!(
        idempotency_key = %idempotency_key,
        size = bytes.len(),
        "received order load request"
    );

    let file_hash = sha256_hex(&bytes);

    let rows = match parse_rows(&bytes) {
        Ok(rows) => rows,
        Err(e) => return ApiError::from(e).into_response_for(&path),
    };

    match state.processor.process(&idempotency_key, &file_hash, rows).await {
        Ok(summary) => assemble_response(&state, summary, &path).await,
        Err(e) => ApiError::from(e).into_response_for(&path),
    }
}

/// Read and validate the Idempotency-Key header.
fn read_idempotency_key(headers: &HeaderMap) -> Result<String, ApiError> {
    let value = headers
        .get("Idempotency-Key")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .unwrap_or("");

    if value.is_empty() {
        return Err(ApiError::MissingIdempotencyKey);
    }
    if value.len() > MAX_IDEMPOTENCY_KEY_LEN {
        return Err(ApiError::IdempotencyKeyTooLong);
    }
    Ok(value.to_string())
}

/// Extract the raw bytes of the `file` part.
async fn read_file_part(mut multipart: Multipart) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Format(format!("unreadable multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::Format(format!("unreadable file part: {e}")))?;
            if bytes.is_empty() {
                return Err(ApiError::MissingFile);
            }
            return Ok(bytes.to_vec());
        }
    }
    Err(ApiError::MissingFile)
}

/// Build the full diagnostic body from the persisted batch record.
async fn assemble_response(state: &AppState, summary: BatchSummary, path: &str) -> Response {
    let batch = match state.batches.get(summary.batch_load_id).await {
        Ok(Some(batch)) => batch,
        Ok(None) => {
            error!(batch_id = %summary.batch_load_id, "batch not found after processing");
            return ApiError::Internal("batch not found after processing".to_string())
                .into_response_for(path);
        }
        Err(e) => {
            error!(batch_id = %summary.batch_load_id, error = %e, "could not load batch");
            return ApiError::Internal(e.to_string()).into_response_for(path);
        }
    };

    let mut errors_by_code: BTreeMap<ErrorCode, i64> = BTreeMap::new();
    for row_error in &batch.errors {
        *errors_by_code.entry(row_error.code).or_insert(0) += 1;
    }

    let response = LoadOrdersResponse {
        batch_load_id: batch.id,
        total_processed: batch.total_processed,
        stored_count: batch.success_count,
        error_count: batch.error_count,
        errors_by_code,
        error_details: batch.errors,
    };

    info!(
        batch_id = %response.batch_load_id,
        total = response.total_processed,
        stored = response.stored_count,
        errors = response.error_count,
        "order load completed"
    );

    let status = if response.stored_count > 0 {
        StatusCode::CREATED
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };

    (status, Json(response)).into_response()
}
