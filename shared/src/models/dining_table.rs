//! Dining Table Model

use serde::{Deserialize, Serialize};

/// Physical table status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    #[default]
    Free,
    Occupied,
    Reserved,
    UnderMaintenance,
}

impl TableStatus {
    /// Whether new orders may be opened on a table in this status.
    pub fn accepts_orders(self) -> bool {
        !matches!(self, TableStatus::UnderMaintenance)
    }
}

/// Dining table entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiningTable {
    pub id: u64,
    /// Human-facing table number, unique across the restaurant
    pub number: String,
    pub capacity: i32,
    pub status: TableStatus,
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableCreate {
    pub number: String,
    pub capacity: Option<i32>,
}
