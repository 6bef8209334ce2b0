//! Order types: status machines, line items, snapshots, settlements

pub mod settlement;
pub mod snapshot;
pub mod types;

pub use settlement::{Settlement, SettlementLine};
pub use snapshot::{CheckoutInfo, OrderSnapshot};
pub use types::{ItemStatus, LineItem, OrderStatus, PaymentMethod};
