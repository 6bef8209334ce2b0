//! Order lifecycle: the hub of the operations core
//!
//! # Architecture
//!
//! ```text
//! OrderManager::<operation>()
//!     ├─ 1. Begin write transaction
//!     ├─ 2. Build the operation's action
//!     ├─ 3. Action validates against current snapshots
//!     ├─ 4. Action writes orders / stock / occupancy
//!     ├─ 5. Commit (error before commit = full rollback)
//!     └─ 6. Return typed result
//! ```
//!
//! Inventory commitment is two-phase by contract: submission validates
//! sufficiency read-only; the actual deduction happens when preparation
//! starts, re-validated inside the same transaction that flips the
//! item's status.

pub mod actions;
pub mod context;
pub mod manager;

pub use manager::OrderManager;
