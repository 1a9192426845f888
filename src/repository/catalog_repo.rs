// ==========================================
// Order Batch Ingestion Service - Catalog snapshot reader
// ==========================================
// Read-only view over the referential catalog (clients, zones) and the
// existing order numbers. Three queries, issued once per batch.
// ==========================================

use crate::db::{configure_connection, open_connection};
use crate::domain::CatalogSnapshot;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::Connection;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

// ==========================================
// CatalogSnapshotReader trait
// ==========================================
// The orchestrator validates every row of a batch against one snapshot;
// the catalog is never consulted per row.
#[async_trait]
pub trait CatalogSnapshotReader: Send + Sync {
    /// Capture a point-in-time snapshot of the reference data.
    async fn load_snapshot(&self) -> RepositoryResult<CatalogSnapshot>;
}

// ==========================================
// SqliteCatalogRepository
// ==========================================
pub struct SqliteCatalogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteCatalogRepository {
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
impl CatalogSnapshotReader for SqliteCatalogRepository {
    async fn load_snapshot(&self) -> RepositoryResult<CatalogSnapshot> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        let mut active_clients = HashSet::new();
        {
            let mut stmt = conn.prepare("SELECT id FROM clients WHERE active = 1")?;
            let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
            for row in rows {
                active_clients.insert(row?);
            }
        }

        let mut zones = HashMap::new();
        {
            let mut stmt = conn.prepare("SELECT id, refrigeration_capable FROM zones")?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, bool>(1)?))
            })?;
            for row in rows {
                let (id, refrigeration_capable) = row?;
                zones.insert(id, refrigeration_capable);
            }
        }

        let mut existing_order_numbers = HashSet::new();
        {
            let mut stmt = conn.prepare("SELECT order_number FROM orders")?;
            let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
            for row in rows {
                existing_order_numbers.insert(row?);
            }
        }

        Ok(CatalogSnapshot {
            active_clients,
            zones,
            existing_order_numbers,
        })
    }
}
