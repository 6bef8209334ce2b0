//! Domain models

pub mod dining_table;
pub mod dish;
pub mod ingredient;
pub mod inventory_log;
pub mod recipe;

pub use dining_table::{DiningTable, DiningTableCreate, TableStatus};
pub use dish::{Dish, DishCreate, DishUpdate};
pub use ingredient::{Ingredient, IngredientCreate};
pub use inventory_log::{InventoryLogEntry, StockChangeKind};
pub use recipe::RecipeEntry;
