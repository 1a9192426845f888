// ==========================================
// Order Batch Ingestion Service - Repository layer
// ==========================================
// Data access behind narrow async traits. Each repository wraps a
// shared SQLite connection; write operations run inside explicit
// transactions on that connection.
// ==========================================

pub mod batch_load_repo;
pub mod batch_load_repo_impl;
pub mod catalog_repo;
pub mod error;
pub mod order_repo;

pub use batch_load_repo::BatchLoadRepository;
pub use batch_load_repo_impl::SqliteBatchLoadRepository;
pub use catalog_repo::{CatalogSnapshotReader, SqliteCatalogRepository};
pub use error::{RepositoryError, RepositoryResult};
pub use order_repo::{OrderWriter, SqliteOrderRepository};
