// ==========================================
// Order Batch Ingestion Service - Order records
// ==========================================
// CsvRow is the raw parsed row; OrderData is produced only by a
// successful validation. Both are immutable once built.
// ==========================================

use crate::domain::types::OrderStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// CsvRow - parsed upload row
// ==========================================
// All fields are raw trimmed strings except requires_refrigeration,
// which the parser already decoded (liberal boolean set). line_number
// is the physical line in the uploaded file: header is 1, first data
// row is 2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvRow {
    pub line_number: usize,
    pub order_number: String,
    pub client_id: String,
    pub delivery_date: String,
    pub status: String,
    pub zone_id: String,
    pub requires_refrigeration: bool,
}

// ==========================================
// OrderData - validated order
// ==========================================
// Lives in the external orders store; linkage to the batch that loaded
// it is by transaction, not by reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderData {
    pub order_number: String,
    pub client_id: String,
    pub delivery_date: NaiveDate,
    pub status: OrderStatus,
    pub zone_id: String,
    pub requires_refrigeration: bool,
}
