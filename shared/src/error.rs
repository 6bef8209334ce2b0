//! Error taxonomy of the operations core
//!
//! Every mutating operation returns `CoreResult<T>`; the error variant
//! carries the failure kind plus whatever detail the caller needs to
//! render or assert on. `InsufficientStock` in particular is never a
//! bare boolean: it lists each short ingredient with the required and
//! available quantities.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Per-ingredient shortfall detail carried by [`CoreError::InsufficientStock`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockShortfall {
    pub ingredient_id: u64,
    pub name: String,
    pub required: f64,
    pub available: f64,
    pub unit: String,
}

impl StockShortfall {
    /// Quantity missing to satisfy the demand.
    pub fn missing(&self) -> f64 {
        self.required - self.available
    }
}

impl fmt::Display for StockShortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: need {}{}, have {}{}",
            self.name, self.required, self.unit, self.available, self.unit
        )
    }
}

fn join_shortfalls(shortfalls: &[StockShortfall]) -> String {
    shortfalls
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Core error taxonomy
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("operation not legal for current status: {0}")]
    StateConflict(String),

    #[error("insufficient stock: {}", join_shortfalls(.0))]
    InsufficientStock(Vec<StockShortfall>),

    #[error("dish '{0}' has no recipe configured")]
    UnconfiguredRecipe(String),

    #[error("insufficient payment: required {required:.2}, received {received:.2}")]
    InsufficientPayment { required: f64, received: f64 },

    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("has active dependents: {0}")]
    HasActiveDependents(String),

    #[error("no active orders for table {0}")]
    NoActiveOrders(u64),

    #[error("order total is zero, nothing to collect")]
    ZeroBalance,

    #[error("storage error: {0}")]
    Storage(String),
}

impl CoreError {
    pub fn not_found(what: impl Into<String>) -> Self {
        CoreError::NotFound(what.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        CoreError::Validation(msg.into())
    }

    pub fn state_conflict(msg: impl Into<String>) -> Self {
        CoreError::StateConflict(msg.into())
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
