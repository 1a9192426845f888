// ==========================================
// Order Batch Ingestion Service - Batch processor
// ==========================================
// The orchestrator. Composes the pipeline for one upload:
// replay lookup -> reserve -> snapshot -> validate rows -> bulk insert
// -> finalize. Any failure between reservation and insert marks the
// reserved record FAILED and surfaces the error unchanged.
// ==========================================

use crate::domain::{BatchSummary, CsvRow, OrderData, RowError};
use crate::importer::error::{IngestError, IngestResult};
use crate::importer::row_validator::validate_row;
use crate::repository::batch_load_repo::BatchLoadRepository;
use crate::repository::catalog_repo::CatalogSnapshotReader;
use crate::repository::error::RepositoryError;
use crate::repository::order_repo::OrderWriter;
use crate::BatchLoadStatus;
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::{debug, error, info, instrument, warn};

// ==========================================
// BatchProcessor
// ==========================================
pub struct BatchProcessor<B, C, O>
where
    B: BatchLoadRepository,
    C: CatalogSnapshotReader,
    O: OrderWriter,
{
    // Idempotency store
    batch_repo: B,

    // Read-only catalog port
    catalog: C,

    // Orders store port
    orders: O,

    // "Today" for the delivery-date rule is computed in this timezone
    business_tz: Tz,

    // Advisory upper bound on rows per upload
    batch_size_hint: usize,
}

impl<B, C, O> BatchProcessor<B, C, O>
where
    B: BatchLoadRepository,
    C: CatalogSnapshotReader,
    O: OrderWriter,
{
    pub fn new(batch_repo: B, catalog: C, orders: O, business_tz: Tz, batch_size_hint: usize) -> Self {
        Self {
            batch_repo,
            catalog,
            orders,
            business_tz,
            batch_size_hint,
        }
    }

    /// The current date in the business timezone. A delivery date equal
    /// to this value is still deliverable.
    pub fn business_today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.business_tz).date_naive()
    }

    /// Process one upload under one idempotency key.
    ///
    /// # Arguments
    /// - idempotency_key: operator-supplied replay scope
    /// - file_hash: SHA-256 hex of the raw uploaded bytes
    /// - rows: parsed data rows, in file order
    ///
    /// # Returns
    /// - Ok(BatchSummary): the run completed (possibly with every row
    ///   rejected; COMPLETED describes the run, not its success)
    /// - Err(AlreadyProcessed | BeingProcessed): replay detected
    /// - Err(Repository): infrastructure failure; the reserved record
    ///   was marked FAILED if the failure hit after reservation
    #[instrument(skip(self, rows), fields(batch_id = tracing::field::Empty))]
    pub async fn process(
        &self,
        idempotency_key: &str,
        file_hash: &str,
        rows: Vec<CsvRow>,
    ) -> IngestResult<BatchSummary> {
        info!(
            idempotency_key = %idempotency_key,
            rows = rows.len(),
            "starting batch processing"
        );
        if rows.len() > self.batch_size_hint {
            warn!(
                rows = rows.len(),
                hint = self.batch_size_hint,
                "upload exceeds the configured batch size hint"
            );
        }

        // === Phase 1: replay detection ===
        if let Some(existing) = self
            .batch_repo
            .find_by_key_and_digest(idempotency_key, file_hash)
            .await?
        {
            match existing.status {
                BatchLoadStatus::Completed => {
                    info!(batch_id = %existing.id, "replay of a completed batch");
                    return Err(IngestError::AlreadyProcessed);
                }
                BatchLoadStatus::Processing => {
                    info!(batch_id = %existing.id, "batch is currently being processed");
                    return Err(IngestError::BeingProcessed);
                }
                BatchLoadStatus::Failed => {
                    // A failed run does not consume the key: clear its
                    // record so this retry can reserve the slot.
                    warn!(batch_id = %existing.id, "clearing failed batch record for retry");
                    self.batch_repo.remove(existing.id).await?;
                }
            }
        }

        // === Phase 2: reservation (atomic via unique constraint) ===
        let batch = match self.batch_repo.reserve(idempotency_key, file_hash).await {
            Ok(batch) => batch,
            Err(RepositoryError::UniqueConstraintViolation(_)) => {
                warn!(idempotency_key = %idempotency_key, "lost the reservation race");
                return Err(IngestError::AlreadyProcessed);
            }
            Err(e) => return Err(e.into()),
        };
        tracing::Span::current().record("batch_id", tracing::field::display(batch.id));

        // === Phases 3-5: snapshot, validate, store ===
        let total_processed = rows.len();
        let (valid_orders, errors) = match self.validate_and_store(&rows).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(batch_id = %batch.id, error = %e, "batch processing failed");
                if let Err(fail_err) = self.batch_repo.fail(batch.id).await {
                    error!(
                        batch_id = %batch.id,
                        error = %fail_err,
                        "could not mark batch as failed"
                    );
                }
                return Err(e.into());
            }
        };

        // === Phase 6: finalize ===
        // A failure here is surfaced unchanged; the batch stays
        // observably unfinalized (PROCESSING) rather than FAILED.
        let finalized = self
            .batch_repo
            .finalize(
                batch.id,
                total_processed as i64,
                valid_orders.len() as i64,
                &errors,
            )
            .await?;

        info!(
            batch_id = %finalized.id,
            total = finalized.total_processed,
            success = finalized.success_count,
            errors = finalized.error_count,
            "batch processing completed"
        );

        Ok(BatchSummary {
            batch_load_id: finalized.id,
            total_processed: finalized.total_processed,
            success_count: finalized.success_count,
            error_count: finalized.error_count,
        })
    }

    /// Phases 3-5: capture the snapshot, fold the rows through the
    /// validator and bulk-insert whatever survived.
    async fn validate_and_store(
        &self,
        rows: &[CsvRow],
    ) -> Result<(Vec<OrderData>, Vec<RowError>), RepositoryError> {
        debug!("loading catalog snapshot");
        let snapshot = self.catalog.load_snapshot().await?;
        let today = self.business_today();

        // Seed the seen-set from the store so intra-batch duplicates and
        // already-stored numbers share one membership check.
        let mut seen = snapshot.existing_order_numbers.clone();
        let mut valid_orders = Vec::new();
        let mut errors = Vec::new();

        for row in rows {
            match validate_row(row, &snapshot, &mut seen, today) {
                Ok(order) => valid_orders.push(order),
                Err(row_error) => errors.push(row_error),
            }
        }
        debug!(
            valid = valid_orders.len(),
            errors = errors.len(),
            "validation complete"
        );

        if !valid_orders.is_empty() {
            let inserted = self.orders.insert_batch(&valid_orders).await?;
            debug!(inserted, "orders stored");
        }

        Ok((valid_orders, errors))
    }
}
