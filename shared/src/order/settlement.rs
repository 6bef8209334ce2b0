//! Settlement - the finalized record produced by checkout

use super::types::PaymentMethod;
use serde::{Deserialize, Serialize};

/// One line of a settlement, flattened from the paid orders' items
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SettlementLine {
    pub order_id: u64,
    pub dish_name: String,
    pub unit_price: f64,
    pub quantity: i32,
    pub subtotal: f64,
}

/// Settlement record
///
/// Everything receipt rendering needs; rendering itself happens outside
/// the core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settlement {
    pub id: u64,
    pub table_id: u64,
    pub table_number: String,
    pub order_ids: Vec<u64>,
    pub lines: Vec<SettlementLine>,
    pub total_amount: f64,
    pub payment_method: PaymentMethod,
    pub received_amount: f64,
    pub change_amount: f64,
    /// Unix millis
    pub settled_at: i64,
}
