// ==========================================
// Order Batch Ingestion Service - CSV record parser
// ==========================================
// Decodes the uploaded blob into an ordered sequence of CsvRow.
// Header contract: exactly six named columns. Structural failures here
// abort the whole batch before any reservation happens.
// ==========================================

use crate::domain::CsvRow;
use crate::importer::error::{IngestError, IngestResult};
use csv::{ReaderBuilder, Trim};

/// The fixed upload layout. Column order is part of the contract.
pub const EXPECTED_HEADER: [&str; 6] = [
    "orderNumber",
    "clientId",
    "deliveryDate",
    "status",
    "zoneId",
    "requiresRefrigeration",
];

/// Parse the uploaded bytes into data rows.
///
/// # Returns
/// - Ok(Vec<CsvRow>): at least one data row, in file order, each tagged
///   with its physical line number (header is line 1)
/// - Err(IngestError::FormatInvalid): header absent/mismatched, file
///   unreadable as CSV, or no data rows
///
/// Rows with fewer than six fields are right-padded with empty strings
/// so validation can report a per-row error instead of aborting; extra
/// fields beyond the sixth are ignored. Blank lines are skipped.
pub fn parse_rows(bytes: &[u8]) -> IngestResult<Vec<CsvRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| IngestError::FormatInvalid(format!("unreadable header row: {e}")))?
        .clone();

    if headers.len() != EXPECTED_HEADER.len() {
        return Err(IngestError::FormatInvalid(format!(
            "expected {} columns but found {}",
            EXPECTED_HEADER.len(),
            headers.len()
        )));
    }
    for (found, expected) in headers.iter().zip(EXPECTED_HEADER) {
        if !found.eq_ignore_ascii_case(expected) {
            return Err(IngestError::FormatInvalid(format!(
                "unexpected column '{found}', expected '{expected}'"
            )));
        }
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record =
            result.map_err(|e| IngestError::FormatInvalid(format!("unreadable data row: {e}")))?;

        let line_number = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(rows.len() + 2);

        // Blank lines carry no data
        if record.len() == 0 || (record.len() == 1 && record.get(0).unwrap_or("").is_empty()) {
            continue;
        }

        let field = |idx: usize| record.get(idx).unwrap_or("").to_string();

        rows.push(CsvRow {
            line_number,
            order_number: field(0),
            client_id: field(1),
            delivery_date: field(2),
            status: field(3),
            zone_id: field(4),
            requires_refrigeration: parse_flexible_bool(record.get(5).unwrap_or("")),
        });
    }

    if rows.is_empty() {
        return Err(IngestError::FormatInvalid(
            "file contains no data rows".to_string(),
        ));
    }

    Ok(rows)
}

/// Liberal boolean decoding for the refrigeration column.
///
/// Accepted as true (case-insensitive): `true`, `1`, `si`, `sí`.
/// Everything else, including the empty string, is false; the validator
/// does not re-check this field.
pub fn parse_flexible_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "1" | "si" | "sí"
    )
}
