// ==========================================
// Order Batch Ingestion Service - Row validator
// ==========================================
// Pure business-rule core. One row in, either a validated order or a
// structured row error out, never both. Rules apply in a fixed order;
// the first failure determines the reported code.
// ==========================================

use crate::domain::types::{ErrorCode, OrderStatus};
use crate::domain::{CatalogSnapshot, CsvRow, OrderData, RowError};
use chrono::NaiveDate;
use std::collections::HashSet;

/// Delivery dates must use this layout.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Validate one row against the catalog snapshot and the business rules.
///
/// # Arguments
/// - row: parsed upload row
/// - snapshot: point-in-time catalog view for this batch
/// - seen: order numbers already taken, seeded from the snapshot's
///   existing numbers; accepted numbers are added here so the second
///   copy of a number within one upload is rejected
/// - today: the current date in the business timezone
///
/// # Rule order (first failure wins)
/// 1. order number present and alphanumeric (`-`/`_` allowed)
/// 2. order number not already taken (store or earlier row)
/// 3. client present, known and active
/// 4. status one of PENDING/CONFIRMED/DELIVERED
/// 5. zone present and known
/// 6. refrigeration only in a refrigeration-capable zone
/// 7. delivery date parses as YYYY-MM-DD
/// 8. delivery date not before today
pub fn validate_row(
    row: &CsvRow,
    snapshot: &CatalogSnapshot,
    seen: &mut HashSet<String>,
    today: NaiveDate,
) -> Result<OrderData, RowError> {
    let line = row.line_number;

    // 1. Order number format
    if row.order_number.is_empty() {
        return Err(RowError::new(
            line,
            ErrorCode::OrderNumberInvalid,
            "order number is required",
        ));
    }
    if !is_order_number(&row.order_number) {
        return Err(RowError::new(
            line,
            ErrorCode::OrderNumberInvalid,
            format!("order number must be alphanumeric: {}", row.order_number),
        ));
    }

    // 2. Uniqueness (store + earlier rows of this upload)
    if seen.contains(&row.order_number) {
        return Err(RowError::new(
            line,
            ErrorCode::OrderDuplicate,
            format!("an order already exists with number: {}", row.order_number),
        ));
    }

    // 3. Client exists and is active
    if row.client_id.is_empty() {
        return Err(RowError::new(
            line,
            ErrorCode::ClientNotFound,
            "client id is required",
        ));
    }
    if !snapshot.active_clients.contains(&row.client_id) {
        return Err(RowError::new(
            line,
            ErrorCode::ClientNotFound,
            format!("client not found or inactive: {}", row.client_id),
        ));
    }

    // 4. Status
    let Some(status) = OrderStatus::parse(&row.status) else {
        return Err(RowError::new(
            line,
            ErrorCode::StatusInvalid,
            format!(
                "invalid status: {}. valid values: PENDING, CONFIRMED, DELIVERED",
                row.status
            ),
        ));
    };

    // 5. Zone exists
    if row.zone_id.is_empty() {
        return Err(RowError::new(
            line,
            ErrorCode::ZoneNotFound,
            "zone id is required",
        ));
    }
    let Some(&refrigeration_capable) = snapshot.zones.get(&row.zone_id) else {
        return Err(RowError::new(
            line,
            ErrorCode::ZoneNotFound,
            format!("zone not found: {}", row.zone_id),
        ));
    };

    // 6. Cold chain compatibility
    if row.requires_refrigeration && !refrigeration_capable {
        return Err(RowError::new(
            line,
            ErrorCode::ColdChainUnsupported,
            format!("zone {} does not support cold chain", row.zone_id),
        ));
    }

    // 7. Delivery date parses
    if row.delivery_date.is_empty() {
        return Err(RowError::new(
            line,
            ErrorCode::DeliveryDatePast,
            "delivery date is required",
        ));
    }
    let Ok(delivery_date) = NaiveDate::parse_from_str(&row.delivery_date, DATE_FORMAT) else {
        return Err(RowError::new(
            line,
            ErrorCode::DeliveryDatePast,
            format!(
                "invalid date format: {}. expected YYYY-MM-DD",
                row.delivery_date
            ),
        ));
    };

    // 8. Delivery date not in the past (today in the business timezone
    //    is allowed)
    if delivery_date < today {
        return Err(RowError::new(
            line,
            ErrorCode::DeliveryDatePast,
            format!("delivery date cannot be in the past: {delivery_date}"),
        ));
    }

    seen.insert(row.order_number.clone());

    Ok(OrderData {
        order_number: row.order_number.clone(),
        client_id: row.client_id.clone(),
        delivery_date,
        status,
        zone_id: row.zone_id.clone(),
        requires_refrigeration: row.requires_refrigeration,
    })
}

/// Liberal order-number shape: alphanumeric plus `-` and `_`.
/// The strict catalog recommendation (`^[A-Z][0-9]{3}$`) is deliberately
/// not enforced here.
fn is_order_number(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
