//! Command action implementations
//!
//! One file per order-lifecycle operation. Each action validates
//! against the snapshots visible inside the caller's transaction and
//! performs its writes through the same transaction.

mod add_item;
mod checkout;
mod complete_item;
mod create_order;
mod remove_item;
mod start_preparation;
mod submit_order;

pub use add_item::AddItemAction;
pub use checkout::CheckoutAction;
pub use complete_item::CompleteItemAction;
pub use create_order::CreateOrderAction;
pub use remove_item::{RemoveItemAction, RemoveOutcome};
pub use start_preparation::StartPreparationAction;
pub use submit_order::SubmitOrderAction;
