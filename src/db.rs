// ==========================================
// Order Batch Ingestion Service - SQLite connection init
// ==========================================
// Goals:
// - Unify PRAGMA behavior for every Connection::open so foreign keys
//   are enforced on each connection, not just some
// - Unify busy_timeout to absorb transient write contention
// - Bootstrap the schema idempotently at startup
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// Default busy_timeout (milliseconds)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Apply the unified PRAGMA set to a SQLite connection.
///
/// foreign_keys and busy_timeout are per-connection settings and must be
/// applied to every connection the service opens.
pub fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Open a SQLite connection and apply the unified configuration.
pub fn open_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_connection(&conn)?;
    Ok(conn)
}

/// Create the persistent schema if it does not exist yet.
///
/// The unique constraints here are load-bearing:
/// - `batch_loads (idempotency_key, file_hash)` is the cross-request
///   coordination primitive for idempotent reservation
/// - `orders (order_number)` catches snapshot races between concurrent
///   batches at commit time
pub fn bootstrap_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS batch_loads (
            id              TEXT PRIMARY KEY,
            idempotency_key TEXT NOT NULL CHECK (length(idempotency_key) <= 50),
            file_hash       TEXT NOT NULL CHECK (length(file_hash) = 64),
            status          TEXT NOT NULL,
            total_processed INTEGER NOT NULL DEFAULT 0,
            success_count   INTEGER NOT NULL DEFAULT 0,
            error_count     INTEGER NOT NULL DEFAULT 0,
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL,
            UNIQUE (idempotency_key, file_hash)
        );

        CREATE TABLE IF NOT EXISTS batch_load_errors (
            id            TEXT PRIMARY KEY,
            batch_load_id TEXT NOT NULL REFERENCES batch_loads(id) ON DELETE CASCADE,
            line_number   INTEGER NOT NULL,
            code          TEXT NOT NULL CHECK (length(code) <= 50),
            message       TEXT NOT NULL CHECK (length(message) <= 500),
            created_at    TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_batch_load_errors_batch
            ON batch_load_errors (batch_load_id);

        CREATE TABLE IF NOT EXISTS orders (
            id                     TEXT PRIMARY KEY,
            order_number           TEXT NOT NULL UNIQUE,
            client_id              TEXT NOT NULL,
            zone_id                TEXT NOT NULL,
            delivery_date          TEXT NOT NULL,
            status                 TEXT NOT NULL,
            requires_refrigeration INTEGER NOT NULL DEFAULT 0,
            created_at             TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS clients (
            id     TEXT PRIMARY KEY,
            name   TEXT NOT NULL,
            active INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS zones (
            id                    TEXT PRIMARY KEY,
            refrigeration_capable INTEGER NOT NULL DEFAULT 0
        );
        "#,
    )?;
    Ok(())
}
