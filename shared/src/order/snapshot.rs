//! Order snapshot - current state of one order with its line items

use super::types::{ItemStatus, LineItem, OrderStatus, PaymentMethod};
use serde::{Deserialize, Serialize};

/// Checkout metadata stamped onto an order when it is paid
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CheckoutInfo {
    /// Unix millis
    pub time: i64,
    pub payment_method: PaymentMethod,
    pub received_amount: f64,
    pub change_amount: f64,
}

/// Order snapshot
///
/// Line items are embedded; `total_amount` always equals the sum of the
/// embedded items' subtotals (maintained by recomputation on every
/// add/remove). Mutable until a terminal status is reached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderSnapshot {
    pub id: u64,
    pub table_id: u64,
    pub created_by: String,
    /// Unix millis
    pub opened_at: i64,
    pub status: OrderStatus,
    pub items: Vec<LineItem>,
    pub total_amount: f64,
    /// Present once the order is `Paid`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout: Option<CheckoutInfo>,
}

impl OrderSnapshot {
    /// Create a new empty order in `Placed` status
    pub fn new(id: u64, table_id: u64, created_by: String) -> Self {
        Self {
            id,
            table_id,
            created_by,
            opened_at: chrono::Utc::now().timestamp_millis(),
            status: OrderStatus::Placed,
            items: Vec::new(),
            total_amount: 0.0,
            checkout: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn item(&self, item_id: u64) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    pub fn item_position(&self, item_id: u64) -> Option<usize> {
        self.items.iter().position(|i| i.id == item_id)
    }

    pub fn pending_items(&self) -> impl Iterator<Item = &LineItem> {
        self.items
            .iter()
            .filter(|i| i.status == ItemStatus::Pending)
    }

    /// All line items done: the gate for the `Served` transition.
    pub fn all_items_completed(&self) -> bool {
        !self.items.is_empty()
            && self
                .items
                .iter()
                .all(|i| i.status == ItemStatus::Completed)
    }
}
