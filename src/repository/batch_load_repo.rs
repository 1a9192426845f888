// ==========================================
// Order Batch Ingestion Service - Batch load repository trait
// ==========================================
// The idempotency store. Uniqueness of (idempotency_key, file_hash) is
// enforced by the database, not by in-process locking; `reserve` is the
// only cross-request coordination primitive in the service.
// ==========================================

use crate::domain::{BatchLoad, RowError};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait BatchLoadRepository: Send + Sync {
    /// Look up a batch load by its natural key.
    ///
    /// # Returns
    /// - Ok(Some(BatchLoad)): record exists (children loaded)
    /// - Ok(None): no record for (key, digest)
    async fn find_by_key_and_digest(
        &self,
        idempotency_key: &str,
        file_hash: &str,
    ) -> RepositoryResult<Option<BatchLoad>>;

    /// Atomically create a PROCESSING record for (key, digest).
    ///
    /// # Errors
    /// - UniqueConstraintViolation: another request holds the reservation.
    ///   No side effects in that case.
    async fn reserve(&self, idempotency_key: &str, file_hash: &str)
        -> RepositoryResult<BatchLoad>;

    /// Transition PROCESSING -> COMPLETED, storing counters and error
    /// children in one transaction.
    ///
    /// Retrying with identical arguments returns the stored record
    /// unchanged; any other call against a terminal record is an
    /// invalid state transition.
    async fn finalize(
        &self,
        id: Uuid,
        total_processed: i64,
        success_count: i64,
        errors: &[RowError],
    ) -> RepositoryResult<BatchLoad>;

    /// Transition PROCESSING -> FAILED. Counters and children untouched.
    async fn fail(&self, id: Uuid) -> RepositoryResult<BatchLoad>;

    /// Fetch a batch load by id, children included.
    async fn get(&self, id: Uuid) -> RepositoryResult<Option<BatchLoad>>;

    /// Delete a record (children cascade). Used to clear a FAILED
    /// reservation so the same (key, digest) can be retried once.
    async fn remove(&self, id: Uuid) -> RepositoryResult<()>;
}
