// ==========================================
// Importer pipeline end-to-end tests
// ==========================================
// Exercise the full parse -> validate -> store -> finalize flow against
// a real (temp) SQLite database.
// ==========================================

mod test_helpers;

use order_ingest::domain::types::{BatchLoadStatus, ErrorCode};
use order_ingest::importer::{parse_rows, sha256_hex, IngestError};
use order_ingest::logging;
use order_ingest::repository::BatchLoadRepository;
use order_ingest::SqliteBatchLoadRepository;

#[tokio::test]
async fn test_happy_path_single_valid_row() {
    logging::init_test();
    let (_temp_file, db_path) = test_helpers::create_test_db();
    test_helpers::seed_catalog(&db_path);

    let bytes = test_helpers::csv_bytes(&["P001,CLI-1,2099-01-01,PENDING,ZONA1,true"]);
    let rows = parse_rows(&bytes).unwrap();
    let processor = test_helpers::create_test_processor(&db_path);

    let summary = processor
        .process("batch-A", &sha256_hex(&bytes), rows)
        .await
        .unwrap();

    assert_eq!(summary.total_processed, 1);
    assert_eq!(summary.success_count, 1);
    assert_eq!(summary.error_count, 0);
    assert!(test_helpers::order_exists(&db_path, "P001"));

    let batch = SqliteBatchLoadRepository::new(&db_path)
        .unwrap()
        .get(summary.batch_load_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(batch.status, BatchLoadStatus::Completed);
    assert!(batch.errors.is_empty());
}

#[tokio::test]
async fn test_mixed_outcome_stores_only_valid_rows() {
    logging::init_test();
    let (_temp_file, db_path) = test_helpers::create_test_db();
    test_helpers::seed_catalog(&db_path);

    let bytes = test_helpers::csv_bytes(&[
        "P010,CLI-1,2099-01-01,PENDING,ZONA1,true",
        "P011,CLI-UNKNOWN,2099-01-01,PENDING,ZONA1,false",
        "P012,CLI-1,2020-01-01,PENDING,ZONA1,false",
    ]);
    let rows = parse_rows(&bytes).unwrap();
    let processor = test_helpers::create_test_processor(&db_path);

    let summary = processor
        .process("batch-mixed", &sha256_hex(&bytes), rows)
        .await
        .unwrap();

    assert_eq!(summary.total_processed, 3);
    assert_eq!(summary.success_count, 1);
    assert_eq!(summary.error_count, 2);
    assert!(test_helpers::order_exists(&db_path, "P010"));
    assert!(!test_helpers::order_exists(&db_path, "P011"));
    assert!(!test_helpers::order_exists(&db_path, "P012"));

    let batch = SqliteBatchLoadRepository::new(&db_path)
        .unwrap()
        .get(summary.batch_load_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(batch.errors.len(), 2);
    assert_eq!(batch.errors[0].line_number, 3);
    assert_eq!(batch.errors[0].code, ErrorCode::ClientNotFound);
    assert_eq!(batch.errors[1].line_number, 4);
    assert_eq!(batch.errors[1].code, ErrorCode::DeliveryDatePast);
}

#[tokio::test]
async fn test_all_rows_rejected_still_completes_the_run() {
    logging::init_test();
    let (_temp_file, db_path) = test_helpers::create_test_db();
    test_helpers::seed_catalog(&db_path);

    let bytes = test_helpers::csv_bytes(&[
        "P020,CLI-1,2099-01-01,PENDING,ZONA9,false",
        "P021,CLI-1,2099-01-01,PENDING,ZONA8,false",
    ]);
    let rows = parse_rows(&bytes).unwrap();
    let processor = test_helpers::create_test_processor(&db_path);
    let file_hash = sha256_hex(&bytes);

    let summary = processor
        .process("batch-allfail", &file_hash, rows)
        .await
        .unwrap();

    assert_eq!(summary.success_count, 0);
    assert_eq!(summary.error_count, 2);
    assert_eq!(test_helpers::order_count(&db_path), 0);
    // COMPLETED describes the run, not its success.
    assert_eq!(
        test_helpers::batch_load_status(&db_path, "batch-allfail", &file_hash),
        "COMPLETED"
    );
}

#[tokio::test]
async fn test_intra_batch_duplicate_keeps_first_copy() {
    logging::init_test();
    let (_temp_file, db_path) = test_helpers::create_test_db();
    test_helpers::seed_catalog(&db_path);

    let bytes = test_helpers::csv_bytes(&[
        "P030,CLI-1,2099-01-01,PENDING,ZONA1,false",
        "P030,CLI-1,2099-02-01,CONFIRMED,ZONA1,false",
    ]);
    let rows = parse_rows(&bytes).unwrap();
    let processor = test_helpers::create_test_processor(&db_path);

    let summary = processor
        .process("batch-dup", &sha256_hex(&bytes), rows)
        .await
        .unwrap();

    assert_eq!(summary.success_count, 1);
    assert_eq!(summary.error_count, 1);
    assert_eq!(test_helpers::order_count(&db_path), 1);

    let batch = SqliteBatchLoadRepository::new(&db_path)
        .unwrap()
        .get(summary.batch_load_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(batch.errors[0].line_number, 3);
    assert_eq!(batch.errors[0].code, ErrorCode::OrderDuplicate);
}

#[tokio::test]
async fn test_order_number_already_in_store_is_a_duplicate() {
    logging::init_test();
    let (_temp_file, db_path) = test_helpers::create_test_db();
    test_helpers::seed_catalog(&db_path);
    test_helpers::insert_existing_order(&db_path, "P040");

    let bytes = test_helpers::csv_bytes(&["P040,CLI-1,2099-01-01,PENDING,ZONA1,false"]);
    let rows = parse_rows(&bytes).unwrap();
    let processor = test_helpers::create_test_processor(&db_path);

    let summary = processor
        .process("batch-store-dup", &sha256_hex(&bytes), rows)
        .await
        .unwrap();

    assert_eq!(summary.success_count, 0);
    assert_eq!(summary.error_count, 1);

    let batch = SqliteBatchLoadRepository::new(&db_path)
        .unwrap()
        .get(summary.batch_load_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(batch.errors[0].code, ErrorCode::OrderDuplicate);
}

#[tokio::test]
async fn test_cold_chain_mismatch_is_rejected() {
    logging::init_test();
    let (_temp_file, db_path) = test_helpers::create_test_db();
    test_helpers::seed_catalog(&db_path);

    let bytes = test_helpers::csv_bytes(&["P050,CLI-1,2099-01-01,PENDING,ZONA2,true"]);
    let rows = parse_rows(&bytes).unwrap();
    let processor = test_helpers::create_test_processor(&db_path);

    let summary = processor
        .process("batch-cold", &sha256_hex(&bytes), rows)
        .await
        .unwrap();

    assert_eq!(summary.success_count, 0);

    let batch = SqliteBatchLoadRepository::new(&db_path)
        .unwrap()
        .get(summary.batch_load_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(batch.errors[0].code, ErrorCode::ColdChainUnsupported);
}

#[tokio::test]
async fn test_short_row_is_padded_and_fails_on_its_first_rule() {
    logging::init_test();
    let (_temp_file, db_path) = test_helpers::create_test_db();
    test_helpers::seed_catalog(&db_path);

    // Five fields: zone present, refrigeration column missing.
    let bytes = test_helpers::csv_bytes(&[
        "P060,CLI-1,2099-01-01,PENDING,ZONA1",
        "P061,CLI-1",
    ]);
    let rows = parse_rows(&bytes).unwrap();
    let processor = test_helpers::create_test_processor(&db_path);

    let summary = processor
        .process("batch-short", &sha256_hex(&bytes), rows)
        .await
        .unwrap();

    // The padded boolean defaults to false, so the five-field row passes.
    assert_eq!(summary.success_count, 1);
    assert_eq!(summary.error_count, 1);

    let batch = SqliteBatchLoadRepository::new(&db_path)
        .unwrap()
        .get(summary.batch_load_id)
        .await
        .unwrap()
        .unwrap();
    // The two-field row fails on the first rule that looks at a padded
    // column: status.
    assert_eq!(batch.errors[0].line_number, 3);
    assert_eq!(batch.errors[0].code, ErrorCode::StatusInvalid);
}

#[tokio::test]
async fn test_counters_always_reconcile() {
    logging::init_test();
    let (_temp_file, db_path) = test_helpers::create_test_db();
    test_helpers::seed_catalog(&db_path);

    let bytes = test_helpers::csv_bytes(&[
        "P070,CLI-1,2099-01-01,PENDING,ZONA1,true",
        "P070,CLI-1,2099-01-01,PENDING,ZONA1,true",
        ",CLI-1,2099-01-01,PENDING,ZONA1,false",
        "P071,CLI-2,2099-01-01,PENDING,ZONA1,false",
        "P072,CLI-1,2099-01-01,SHIPPED,ZONA1,false",
        "P073,CLI-1,2099-13-01,PENDING,ZONA1,false",
        "P074,CLI-1,2099-01-01,DELIVERED,ZONA2,false",
    ]);
    let rows = parse_rows(&bytes).unwrap();
    let total = rows.len() as i64;
    let processor = test_helpers::create_test_processor(&db_path);

    let summary = processor
        .process("batch-inv", &sha256_hex(&bytes), rows)
        .await
        .unwrap();

    assert_eq!(summary.total_processed, total);
    assert_eq!(summary.success_count + summary.error_count, total);

    let batch = SqliteBatchLoadRepository::new(&db_path)
        .unwrap()
        .get(summary.batch_load_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(batch.errors.len() as i64, summary.error_count);
    assert_eq!(summary.success_count, test_helpers::order_count(&db_path));
}

#[tokio::test]
async fn test_header_only_upload_never_reaches_the_processor() {
    logging::init_test();

    let bytes = test_helpers::csv_bytes(&[]);
    let result = parse_rows(&bytes);

    assert!(matches!(result, Err(IngestError::FormatInvalid(_))));
}
