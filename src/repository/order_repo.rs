// ==========================================
// Order Batch Ingestion Service - Order writer
// ==========================================
// Bulk insert of validated orders. One transaction per call: all rows
// land or none do. The unique constraint on order_number turns a
// snapshot race between concurrent batches into a failed call here.
// ==========================================

use crate::db::{configure_connection, open_connection};
use crate::domain::OrderData;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

// ==========================================
// OrderWriter trait
// ==========================================
#[async_trait]
pub trait OrderWriter: Send + Sync {
    /// Insert every order in one transaction.
    ///
    /// # Returns
    /// - Ok(usize): number of rows inserted
    ///
    /// # Errors
    /// - UniqueConstraintViolation: an order_number collided; nothing
    ///   from this call is committed
    async fn insert_batch(&self, orders: &[OrderData]) -> RepositoryResult<usize>;
}

// ==========================================
// SqliteOrderRepository
// ==========================================
pub struct SqliteOrderRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteOrderRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

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
}

#[async_trait]
impl OrderWriter for SqliteOrderRepository {
    async fn insert_batch(&self, orders: &[OrderData]) -> RepositoryResult<usize> {
        if orders.is_empty() {
            return Ok(0);
        }

        let mut conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let now = Utc::now().to_rfc3339();
        let mut count = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO orders (id, order_number, client_id, zone_id, delivery_date, \
                 status, requires_refrigeration, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;

            for order in orders {
                stmt.execute(params![
                    Uuid::new_v4().to_string(),
                    order.order_number,
                    order.client_id,
                    order.zone_id,
                    order.delivery_date.format("%Y-%m-%d").to_string(),
                    order.status.as_str(),
                    order.requires_refrigeration as i32,
                    now,
                ])?;
                count += 1;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(count)
    }
}
