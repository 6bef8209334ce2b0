//! Ingredient Model

use serde::{Deserialize, Serialize};

/// Ingredient entity
///
/// `stock` is mutated exclusively through the inventory ledger; nothing
/// else writes it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ingredient {
    pub id: u64,
    pub name: String,
    /// Unit of measure (e.g. kg, Bag)
    pub unit: String,
    pub stock: f64,
    pub low_stock_threshold: f64,
}

impl Ingredient {
    /// Needs restocking when stock has fallen to the threshold or below.
    pub fn is_low(&self) -> bool {
        self.stock <= self.low_stock_threshold
    }
}

/// Create ingredient payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientCreate {
    pub name: String,
    pub unit: String,
    pub stock: f64,
    pub low_stock_threshold: f64,
}
