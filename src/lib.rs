// ==========================================
// Order Batch Ingestion Service - Core Library
// ==========================================
// Accepts CSV order submissions over HTTP, validates each row against
// the referential catalog, persists the valid subset transactionally
// and records a per-row diagnostic report under an idempotency key.
// Stack: axum + rusqlite + tracing
// ==========================================

// ==========================================
// Module declarations
// ==========================================

// Domain layer - record types and enums
pub mod domain;

// Repository layer - data access
pub mod repository;

// Importer layer - parsing, validation, orchestration
pub mod importer;

// Configuration layer - service settings
pub mod config;

// Database infrastructure (connection init / PRAGMA policy / schema)
pub mod db;

// Logging system
pub mod logging;

// API layer - HTTP surface
pub mod api;

// ==========================================
// Core type re-exports
// ==========================================

// Domain types
pub use domain::types::{BatchLoadStatus, ErrorCode, OrderStatus};

// Domain records
pub use domain::{BatchLoad, BatchSummary, CatalogSnapshot, CsvRow, OrderData, RowError};

// Importer
pub use importer::{BatchProcessor, IngestError};

// Repositories
pub use repository::{
    BatchLoadRepository, CatalogSnapshotReader, OrderWriter, SqliteBatchLoadRepository,
    SqliteCatalogRepository, SqliteOrderRepository,
};

// ==========================================
// Constants
// ==========================================

// Service version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Service name
pub const APP_NAME: &str = "order-ingest";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
