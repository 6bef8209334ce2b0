//! Inventory Log Model

use serde::{Deserialize, Serialize};

/// Kind of stock movement recorded in the ledger log
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockChangeKind {
    Inbound,
    Outbound,
    Adjustment,
}

/// Immutable audit record of one stock change.
///
/// Entries are append-only: never updated, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryLogEntry {
    pub id: u64,
    pub ingredient_id: u64,
    pub change_kind: StockChangeKind,
    /// Magnitude of the change, in the ingredient's unit
    pub quantity: f64,
    pub old_stock: f64,
    pub new_stock: f64,
    pub reason: String,
    pub created_by: String,
    /// Unix millis
    pub created_at: i64,
}
