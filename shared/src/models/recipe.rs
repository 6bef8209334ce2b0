//! Recipe Model

use serde::{Deserialize, Serialize};

/// Recipe entry: quantity of one ingredient consumed per unit of dish.
///
/// Unique per `(dish_id, ingredient_id)` pair. A dish with zero recipe
/// entries is invalid for every stock-gated operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeEntry {
    pub dish_id: u64,
    pub ingredient_id: u64,
    pub quantity: f64,
}
