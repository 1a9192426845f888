// ==========================================
// Order Batch Ingestion Service - Importer error types
// ==========================================
// Tool: thiserror derive macro
// Row-level validation failures are never raised as errors; they are
// collected as RowError values. Everything here short-circuits the
// batch.
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// Importer layer error type
#[derive(Error, Debug)]
pub enum IngestError {
    // ===== Structural errors (pre-reservation) =====
    #[error("invalid file format: {0}")]
    FormatInvalid(String),

    // ===== Replay outcomes (post-lookup) =====
    #[error("this file was already processed under the given idempotency key")]
    AlreadyProcessed,

    #[error("this file is currently being processed under the given idempotency key")]
    BeingProcessed,

    // ===== Infrastructure =====
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Result type alias
pub type IngestResult<T> = Result<T, IngestError>;
