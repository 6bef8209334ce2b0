//! Comanda core: dine-in restaurant operations
//!
//! The operational core behind the (external) presentation layer:
//!
//! - **store**: redb-backed store of record shared by every component
//! - **catalog**: dishes and their recipes (bill-of-materials)
//! - **inventory**: ingredient stock, atomic check-and-deduct, append-only log
//! - **tables**: physical tables and their occupancy
//! - **orders**: the order/line-item state machines and checkout
//!
//! # Control Flow
//!
//! ```text
//! OrderManager ──reads──▶ Catalog (pricing, recipes)
//!      │
//!      ├──deducts──▶ InventoryLedger ──appends──▶ inventory log
//!      │
//!      └──flips────▶ TableRegistry (occupancy)
//! ```
//!
//! Every mutating operation runs inside exactly one write transaction;
//! an error return before commit rolls the whole operation back, so no
//! partial state is ever observable.

pub mod catalog;
pub mod inventory;
pub mod money;
pub mod orders;
pub mod state;
pub mod store;
pub mod tables;
pub mod utils;

// Re-exports
pub use catalog::CatalogService;
pub use inventory::InventoryLedger;
pub use orders::manager::{KitchenTicket, OrderManager, RemoveOutcome};
pub use state::Comanda;
pub use store::{StorageError, StorageResult, Store};
pub use tables::TableRegistry;

// Re-export shared types for convenience
pub use shared::error::{CoreError, CoreResult, StockShortfall};
pub use shared::models::{
    DiningTable, DiningTableCreate, Dish, DishCreate, DishUpdate, Ingredient, IngredientCreate,
    InventoryLogEntry, RecipeEntry, StockChangeKind, TableStatus,
};
pub use shared::order::{
    CheckoutInfo, ItemStatus, LineItem, OrderSnapshot, OrderStatus, PaymentMethod, Settlement,
    SettlementLine,
};
