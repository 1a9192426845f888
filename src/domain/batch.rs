// ==========================================
// Order Batch Ingestion Service - Batch load aggregate
// ==========================================
// BatchLoad is the persisted audit record of one upload under one
// idempotency key. It exclusively owns its RowError children; the
// orders it loaded live in the orders store and are not referenced
// from here.
// ==========================================

use crate::domain::types::{BatchLoadStatus, ErrorCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// RowError - one validation failure for one row
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowError {
    pub line_number: usize,
    pub code: ErrorCode,
    pub message: String,
}

impl RowError {
    pub fn new(line_number: usize, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            line_number,
            code,
            message: message.into(),
        }
    }
}

// ==========================================
// BatchLoad - persisted batch audit record
// ==========================================
// Natural key: (idempotency_key, file_hash), unique in the store.
// Invariant: success_count + error_count = total_processed.
// Once COMPLETED or FAILED the counters and children are immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchLoad {
    pub id: Uuid,
    pub idempotency_key: String,
    pub file_hash: String,
    pub status: BatchLoadStatus,
    pub total_processed: i64,
    pub success_count: i64,
    pub error_count: i64,
    /// Owned children, in input-row order. Empty while PROCESSING.
    pub errors: Vec<RowError>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ==========================================
// BatchSummary - orchestrator result
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub batch_load_id: Uuid,
    pub total_processed: i64,
    pub success_count: i64,
    pub error_count: i64,
}
