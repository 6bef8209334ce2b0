//! Shared types for the Comanda dine-in operations core
//!
//! Domain models, status state machines, and the error taxonomy used
//! across the workspace. Nothing in here touches storage: these are the
//! plain values exchanged between the core and its callers.

pub mod error;
pub mod models;
pub mod order;

// Re-exports
pub use error::{CoreError, CoreResult, StockShortfall};
pub use serde::{Deserialize, Serialize};
