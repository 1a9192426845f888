// ==========================================
// Order Batch Ingestion Service - Catalog snapshot
// ==========================================

use std::collections::{HashMap, HashSet};

// ==========================================
// CatalogSnapshot - point-in-time reference data
// ==========================================
// Captured once per batch, immutable for the batch's duration. Writes
// committed before acquisition are visible; concurrent writes are not.
// The unique constraint on orders.order_number catches the resulting
// race at commit time.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    /// IDs of clients currently active
    pub active_clients: HashSet<String>,
    /// Zone ID -> refrigeration-capable flag
    pub zones: HashMap<String, bool>,
    /// Order numbers already present in the orders store
    pub existing_order_numbers: HashSet<String>,
}
