// ==========================================
// Order Batch Ingestion Service - Batch load repository (SQLite)
// ==========================================
// Storage: batch_loads + batch_load_errors (cascade delete)
// Natural key: UNIQUE (idempotency_key, file_hash)
// ==========================================

use crate::db::{configure_connection, open_connection};
use crate::domain::types::{BatchLoadStatus, ErrorCode};
use crate::domain::{BatchLoad, RowError};
use crate::repository::batch_load_repo::BatchLoadRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Persisted error messages are capped by the schema.
const MAX_ERROR_MESSAGE_LEN: usize = 500;

const SELECT_BATCH: &str = "SELECT id, idempotency_key, file_hash, status, total_processed, \
                            success_count, error_count, created_at, updated_at FROM batch_loads";

/// Columns as SQLite hands them back, before enum/uuid/timestamp parsing.
struct RawBatchRow {
    id: String,
    idempotency_key: String,
    file_hash: String,
    status: String,
    total_processed: i64,
    success_count: i64,
    error_count: i64,
    created_at: String,
    updated_at: String,
}

impl RawBatchRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            idempotency_key: row.get(1)?,
            file_hash: row.get(2)?,
            status: row.get(3)?,
            total_processed: row.get(4)?,
            success_count: row.get(5)?,
            error_count: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }

    fn into_batch(self) -> RepositoryResult<BatchLoad> {
        let status = BatchLoadStatus::parse(&self.status).ok_or_else(|| {
            RepositoryError::FieldValueError {
                field: "status".to_string(),
                message: format!("unknown status: {}", self.status),
            }
        })?;

        Ok(BatchLoad {
            id: parse_uuid(&self.id)?,
            idempotency_key: self.idempotency_key,
            file_hash: self.file_hash,
            status,
            total_processed: self.total_processed,
            success_count: self.success_count,
            error_count: self.error_count,
            errors: Vec::new(),
            created_at: parse_timestamp("created_at", &self.created_at)?,
            updated_at: parse_timestamp("updated_at", &self.updated_at)?,
        })
    }
}

fn parse_uuid(value: &str) -> RepositoryResult<Uuid> {
    Uuid::parse_str(value).map_err(|e| RepositoryError::FieldValueError {
        field: "id".to_string(),
        message: e.to_string(),
    })
}

fn parse_timestamp(field: &str, value: &str) -> RepositoryResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::FieldValueError {
            field: field.to_string(),
            message: e.to_string(),
        })
}

// ==========================================
// SqliteBatchLoadRepository
// ==========================================
pub struct SqliteBatchLoadRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteBatchLoadRepository {
    /// Create a repository with its own connection.
    ///
    /// # Arguments
    /// - db_path: database file path
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create a repository over a shared connection.
    ///
    /// Re-applies the unified PRAGMA set to the connection (idempotent)
    /// so behavior does not depend on who opened it.
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_connection(&guard)
                .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        }

        Ok(Self { conn })
    }

    fn lock(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Load a batch with children on an open connection.
    fn get_by_id(conn: &Connection, id: Uuid) -> RepositoryResult<Option<BatchLoad>> {
        let raw = conn
            .query_row(
                &format!("{SELECT_BATCH} WHERE id = ?1"),
                params![id.to_string()],
                RawBatchRow::from_row,
            )
            .optional()?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        let mut batch = raw.into_batch()?;
        batch.errors = Self::load_errors(conn, id)?;
        Ok(Some(batch))
    }

    /// Load the error children in input-row order.
    fn load_errors(conn: &Connection, batch_id: Uuid) -> RepositoryResult<Vec<RowError>> {
        let mut stmt = conn.prepare(
            "SELECT line_number, code, message FROM batch_load_errors \
             WHERE batch_load_id = ?1 ORDER BY line_number",
        )?;

        let rows = stmt.query_map(params![batch_id.to_string()], |row| {
            let line_number: i64 = row.get(0)?;
            let code: String = row.get(1)?;
            let message: String = row.get(2)?;
            Ok((line_number, code, message))
        })?;

        let mut errors = Vec::new();
        for row in rows {
            let (line_number, code, message) = row?;
            errors.push(RowError {
                line_number: line_number as usize,
                // An unknown code in an old row degrades to INTERNAL_ERROR
                // rather than poisoning the read.
                code: ErrorCode::parse(&code).unwrap_or(ErrorCode::InternalError),
                message,
            });
        }
        Ok(errors)
    }

    /// Insert error children inside a transaction.
    fn insert_errors_tx(
        tx: &Transaction<'_>,
        batch_id: Uuid,
        errors: &[RowError],
        now: &str,
    ) -> RepositoryResult<()> {
        let mut stmt = tx.prepare(
            "INSERT INTO batch_load_errors (id, batch_load_id, line_number, code, message, \
             created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;

        for error in errors {
            let message: String = error.message.chars().take(MAX_ERROR_MESSAGE_LEN).collect();
            stmt.execute(params![
                Uuid::new_v4().to_string(),
                batch_id.to_string(),
                error.line_number as i64,
                error.code.as_str(),
                message,
                now,
            ])?;
        }
        Ok(())
    }
}

#[async_trait]
impl BatchLoadRepository for SqliteBatchLoadRepository {
    async fn find_by_key_and_digest(
        &self,
        idempotency_key: &str,
        file_hash: &str,
    ) -> RepositoryResult<Option<BatchLoad>> {
        let conn = self.lock()?;

        let raw = conn
            .query_row(
                &format!("{SELECT_BATCH} WHERE idempotency_key = ?1 AND file_hash = ?2"),
                params![idempotency_key, file_hash],
                RawBatchRow::from_row,
            )
            .optional()?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        let mut batch = raw.into_batch()?;
        batch.errors = Self::load_errors(&conn, batch.id)?;
        Ok(Some(batch))
    }

    async fn reserve(
        &self,
        idempotency_key: &str,
        file_hash: &str,
    ) -> RepositoryResult<BatchLoad> {
        let conn = self.lock()?;

        let id = Uuid::new_v4();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO batch_loads (id, idempotency_key, file_hash, status, \
             total_processed, success_count, error_count, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, 0, 0, 0, ?5, ?5)",
            params![
                id.to_string(),
                idempotency_key,
                file_hash,
                BatchLoadStatus::Processing.as_str(),
                now.to_rfc3339(),
            ],
        )?;

        Ok(BatchLoad {
            id,
            idempotency_key: idempotency_key.to_string(),
            file_hash: file_hash.to_string(),
            status: BatchLoadStatus::Processing,
            total_processed: 0,
            success_count: 0,
            error_count: 0,
            errors: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn finalize(
        &self,
        id: Uuid,
        total_processed: i64,
        success_count: i64,
        errors: &[RowError],
    ) -> RepositoryResult<BatchLoad> {
        let mut conn = self.lock()?;
        let now = Utc::now().to_rfc3339();

        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let updated = tx.execute(
            "UPDATE batch_loads SET status = ?1, total_processed = ?2, success_count = ?3, \
             error_count = ?4, updated_at = ?5 WHERE id = ?6 AND status = ?7",
            params![
                BatchLoadStatus::Completed.as_str(),
                total_processed,
                success_count,
                errors.len() as i64,
                now,
                id.to_string(),
                BatchLoadStatus::Processing.as_str(),
            ],
        )?;

        if updated == 0 {
            drop(tx);
            // Distinguish a retry with identical arguments (idempotent)
            // from a genuine invalid transition.
            let existing =
                Self::get_by_id(&conn, id)?.ok_or_else(|| RepositoryError::NotFound {
                    entity: "BatchLoad".to_string(),
                    id: id.to_string(),
                })?;
            if existing.status == BatchLoadStatus::Completed
                && existing.total_processed == total_processed
                && existing.success_count == success_count
                && existing.error_count == errors.len() as i64
            {
                return Ok(existing);
            }
            return Err(RepositoryError::InvalidStateTransition {
                from: existing.status.to_string(),
                to: BatchLoadStatus::Completed.to_string(),
            });
        }

        // The record was PROCESSING, so no children exist yet; the delete
        // keeps the write path safe if that ever stops holding.
        tx.execute(
            "DELETE FROM batch_load_errors WHERE batch_load_id = ?1",
            params![id.to_string()],
        )?;
        Self::insert_errors_tx(&tx, id, errors, &now)?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Self::get_by_id(&conn, id)?.ok_or_else(|| RepositoryError::NotFound {
            entity: "BatchLoad".to_string(),
            id: id.to_string(),
        })
    }

    async fn fail(&self, id: Uuid) -> RepositoryResult<BatchLoad> {
        let conn = self.lock()?;
        let now = Utc::now().to_rfc3339();

        let updated = conn.execute(
            "UPDATE batch_loads SET status = ?1, updated_at = ?2 \
             WHERE id = ?3 AND status = ?4",
            params![
                BatchLoadStatus::Failed.as_str(),
                now,
                id.to_string(),
                BatchLoadStatus::Processing.as_str(),
            ],
        )?;

        let existing = Self::get_by_id(&conn, id)?.ok_or_else(|| RepositoryError::NotFound {
            entity: "BatchLoad".to_string(),
            id: id.to_string(),
        })?;

        if updated == 0 && existing.status != BatchLoadStatus::Failed {
            return Err(RepositoryError::InvalidStateTransition {
                from: existing.status.to_string(),
                to: BatchLoadStatus::Failed.to_string(),
            });
        }

        Ok(existing)
    }

    async fn get(&self, id: Uuid) -> RepositoryResult<Option<BatchLoad>> {
        let conn = self.lock()?;
        Self::get_by_id(&conn, id)
    }

    async fn remove(&self, id: Uuid) -> RepositoryResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "DELETE FROM batch_loads WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(())
    }
}
