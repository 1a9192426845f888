// ==========================================
// Shared test helpers
// ==========================================
// Temp databases, seeded catalogs and CSV builders for the
// integration tests.
// ==========================================
#![allow(dead_code)]

use order_ingest::api::routes::SqliteBatchProcessor;
use order_ingest::db;
use order_ingest::importer::BatchProcessor;
use order_ingest::repository::{
    SqliteBatchLoadRepository, SqliteCatalogRepository, SqliteOrderRepository,
};
use rusqlite::params;
use tempfile::NamedTempFile;

pub const CSV_HEADER: &str =
    "orderNumber,clientId,deliveryDate,status,zoneId,requiresRefrigeration";

/// Create a temp SQLite database with the service schema.
///
/// The NamedTempFile must stay alive for the duration of the test.
pub fn create_test_db() -> (NamedTempFile, String) {
    let temp_file = NamedTempFile::new().expect("Failed to create temp db file");
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = db::open_connection(&db_path).expect("Failed to open test db");
    db::bootstrap_schema(&conn).expect("Failed to bootstrap schema");

    (temp_file, db_path)
}

/// Seed the standard reference data:
/// - CLI-1 active, CLI-2 inactive
/// - ZONA1 refrigeration-capable, ZONA2 not
pub fn seed_catalog(db_path: &str) {
    let conn = db::open_connection(db_path).expect("Failed to open test db");
    conn.execute_batch(
        "INSERT INTO clients (id, name, active) VALUES
             ('CLI-1', 'Comercial Lima Norte', 1),
             ('CLI-2', 'Distribuidora Sur', 0);
         INSERT INTO zones (id, refrigeration_capable) VALUES
             ('ZONA1', 1),
             ('ZONA2', 0);",
    )
    .expect("Failed to seed catalog");
}

/// Insert an order directly, bypassing the pipeline.
pub fn insert_existing_order(db_path: &str, order_number: &str) {
    let conn = db::open_connection(db_path).expect("Failed to open test db");
    conn.execute(
        "INSERT INTO orders (id, order_number, client_id, zone_id, delivery_date, status, \
         requires_refrigeration, created_at) \
         VALUES (?1, ?2, 'CLI-1', 'ZONA1', '2099-01-01', 'PENDING', 0, ?3)",
        params![
            uuid::Uuid::new_v4().to_string(),
            order_number,
            chrono::Utc::now().to_rfc3339()
        ],
    )
    .expect("Failed to insert order");
}

/// Build a processor over its own connections to the given database.
pub fn create_test_processor(db_path: &str) -> SqliteBatchProcessor {
    BatchProcessor::new(
        SqliteBatchLoadRepository::new(db_path).expect("Failed to create batch repo"),
        SqliteCatalogRepository::new(db_path).expect("Failed to create catalog repo"),
        SqliteOrderRepository::new(db_path).expect("Failed to create order repo"),
        chrono_tz::America::Lima,
        500,
    )
}

/// Assemble an upload: standard header plus the given data lines.
pub fn csv_bytes(rows: &[&str]) -> Vec<u8> {
    let mut out = String::from(CSV_HEADER);
    for row in rows {
        out.push('\n');
        out.push_str(row);
    }
    out.push('\n');
    out.into_bytes()
}

pub fn order_count(db_path: &str) -> i64 {
    let conn = db::open_connection(db_path).expect("Failed to open test db");
    conn.query_row("SELECT COUNT(*) FROM orders", [], |r| r.get(0))
        .expect("Failed to count orders")
}

pub fn order_exists(db_path: &str, order_number: &str) -> bool {
    let conn = db::open_connection(db_path).expect("Failed to open test db");
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM orders WHERE order_number = ?1",
            params![order_number],
            |r| r.get(0),
        )
        .expect("Failed to count orders");
    count == 1
}

pub fn batch_load_count(db_path: &str, idempotency_key: &str, file_hash: &str) -> i64 {
    let conn = db::open_connection(db_path).expect("Failed to open test db");
    conn.query_row(
        "SELECT COUNT(*) FROM batch_loads WHERE idempotency_key = ?1 AND file_hash = ?2",
        params![idempotency_key, file_hash],
        |r| r.get(0),
    )
    .expect("Failed to count batch loads")
}

pub fn batch_load_status(db_path: &str, idempotency_key: &str, file_hash: &str) -> String {
    let conn = db::open_connection(db_path).expect("Failed to open test db");
    conn.query_row(
        "SELECT status FROM batch_loads WHERE idempotency_key = ?1 AND file_hash = ?2",
        params![idempotency_key, file_hash],
        |r| r.get(0),
    )
    .expect("Failed to read batch load status")
}
