//! Dish Model

use serde::{Deserialize, Serialize};

/// Dish entity
///
/// Price and availability are editable going forward; line items freeze
/// their own unit price at add time, so historical subtotals never move.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dish {
    pub id: u64,
    pub name: String,
    /// Price in currency unit
    pub price: f64,
    pub category: Option<String>,
    pub description: Option<String>,
    pub is_available: bool,
}

/// Create dish payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DishCreate {
    pub name: String,
    pub price: f64,
    pub category: Option<String>,
    pub description: Option<String>,
}

/// Update dish payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DishUpdate {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub is_available: Option<bool>,
}
