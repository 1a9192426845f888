// ==========================================
// Order Batch Ingestion Service - Domain enums
// ==========================================
// All enums serialize as SCREAMING_SNAKE_CASE; the same spelling is
// stored in the database and emitted on the wire.
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// OrderStatus - order lifecycle states
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Freshly created, awaiting confirmation
    Pending,
    /// Confirmed for dispatch
    Confirmed,
    /// Delivered to the client
    Delivered,
}

impl OrderStatus {
    /// Parse a raw status value (case-insensitive, trimmed).
    ///
    /// Returns None for anything outside the three valid states.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "PENDING" => Some(OrderStatus::Pending),
            "CONFIRMED" => Some(OrderStatus::Confirmed),
            "DELIVERED" => Some(OrderStatus::Delivered),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Delivered => "DELIVERED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// BatchLoadStatus - batch load lifecycle
// ==========================================
// reserve -> PROCESSING -> finalize -> COMPLETED
//                       -> fail     -> FAILED
// COMPLETED and FAILED are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchLoadStatus {
    Processing,
    Completed,
    Failed,
}

impl BatchLoadStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PROCESSING" => Some(BatchLoadStatus::Processing),
            "COMPLETED" => Some(BatchLoadStatus::Completed),
            "FAILED" => Some(BatchLoadStatus::Failed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BatchLoadStatus::Processing => "PROCESSING",
            BatchLoadStatus::Completed => "COMPLETED",
            BatchLoadStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for BatchLoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// ErrorCode - stable machine-readable taxonomy
// ==========================================
// The `code` field of every error response and every persisted row error
// carries one of these values verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ===== Row-level (collected, batch continues) =====
    OrderNumberInvalid,
    OrderDuplicate,
    ClientNotFound,
    ZoneNotFound,
    ColdChainUnsupported,
    DeliveryDatePast,
    StatusInvalid,

    // ===== Structural (abort whole batch, pre-reservation) =====
    FormatInvalid,
    FieldRequired,

    // ===== Replay (abort, post-lookup) =====
    AlreadyProcessed,
    BeingProcessed,

    // ===== Authorization =====
    Unauthorized,

    // ===== Infrastructure =====
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::OrderNumberInvalid => "ORDER_NUMBER_INVALID",
            ErrorCode::OrderDuplicate => "ORDER_DUPLICATE",
            ErrorCode::ClientNotFound => "CLIENT_NOT_FOUND",
            ErrorCode::ZoneNotFound => "ZONE_NOT_FOUND",
            ErrorCode::ColdChainUnsupported => "COLD_CHAIN_UNSUPPORTED",
            ErrorCode::DeliveryDatePast => "DELIVERY_DATE_PAST",
            ErrorCode::StatusInvalid => "STATUS_INVALID",
            ErrorCode::FormatInvalid => "FORMAT_INVALID",
            ErrorCode::FieldRequired => "FIELD_REQUIRED",
            ErrorCode::AlreadyProcessed => "ALREADY_PROCESSED",
            ErrorCode::BeingProcessed => "BEING_PROCESSED",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Parse a persisted code back to the enum.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ORDER_NUMBER_INVALID" => Some(ErrorCode::OrderNumberInvalid),
            "ORDER_DUPLICATE" => Some(ErrorCode::OrderDuplicate),
            "CLIENT_NOT_FOUND" => Some(ErrorCode::ClientNotFound),
            "ZONE_NOT_FOUND" => Some(ErrorCode::ZoneNotFound),
            "COLD_CHAIN_UNSUPPORTED" => Some(ErrorCode::ColdChainUnsupported),
            "DELIVERY_DATE_PAST" => Some(ErrorCode::DeliveryDatePast),
            "STATUS_INVALID" => Some(ErrorCode::StatusInvalid),
            "FORMAT_INVALID" => Some(ErrorCode::FormatInvalid),
            "FIELD_REQUIRED" => Some(ErrorCode::FieldRequired),
            "ALREADY_PROCESSED" => Some(ErrorCode::AlreadyProcessed),
            "BEING_PROCESSED" => Some(ErrorCode::BeingProcessed),
            "UNAUTHORIZED" => Some(ErrorCode::Unauthorized),
            "INTERNAL_ERROR" => Some(ErrorCode::InternalError),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_parse_case_insensitive() {
        assert_eq!(OrderStatus::parse("pending"), Some(OrderStatus::Pending));
        assert_eq!(OrderStatus::parse(" Confirmed "), Some(OrderStatus::Confirmed));
        assert_eq!(OrderStatus::parse("DELIVERED"), Some(OrderStatus::Delivered));
        assert_eq!(OrderStatus::parse("SHIPPED"), None);
        assert_eq!(OrderStatus::parse(""), None);
    }

    #[test]
    fn test_batch_load_status_round_trip() {
        for status in [
            BatchLoadStatus::Processing,
            BatchLoadStatus::Completed,
            BatchLoadStatus::Failed,
        ] {
            assert_eq!(BatchLoadStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_error_code_round_trip() {
        for code in [
            ErrorCode::OrderNumberInvalid,
            ErrorCode::OrderDuplicate,
            ErrorCode::ClientNotFound,
            ErrorCode::ZoneNotFound,
            ErrorCode::ColdChainUnsupported,
            ErrorCode::DeliveryDatePast,
            ErrorCode::StatusInvalid,
            ErrorCode::FormatInvalid,
            ErrorCode::FieldRequired,
            ErrorCode::AlreadyProcessed,
            ErrorCode::BeingProcessed,
            ErrorCode::Unauthorized,
            ErrorCode::InternalError,
        ] {
            assert_eq!(ErrorCode::parse(code.as_str()), Some(code));
        }
    }

    #[test]
    fn test_error_code_serializes_verbatim() {
        let json = serde_json::to_string(&ErrorCode::ColdChainUnsupported).unwrap();
        assert_eq!(json, "\"COLD_CHAIN_UNSUPPORTED\"");
    }
}
