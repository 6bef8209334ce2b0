//! Order and line-item state machines
//!
//! Both clocks are linear and never regress. The order clock is
//! `Placed → InProgress → Served → Paid`, with `Cancelled` as the
//! alternate terminal for orders whose committed value collapses to
//! zero. The item clock is `Pending → InProgress → Completed` and ticks
//! independently, constrained by the parent order (an order only
//! reaches `Served` once every line item is `Completed`).
//!
//! Illegal edges are rejected by construction through
//! [`OrderStatus::can_transition_to`] / [`ItemStatus::can_transition_to`]
//! instead of ad hoc string checks.

use serde::{Deserialize, Serialize};

/// Order status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Placed,
    InProgress,
    Served,
    Paid,
    Cancelled,
}

impl OrderStatus {
    /// Terminal orders admit no further mutation.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Paid | OrderStatus::Cancelled)
    }

    /// Active orders keep their table occupied.
    pub fn is_active(self) -> bool {
        !self.is_terminal()
    }

    /// Legal forward edges of the order clock.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Placed, InProgress)
                | (InProgress, Served)
                | (Placed | InProgress | Served, Paid)
                | (Placed | InProgress | Served, Cancelled)
        )
    }
}

/// Line-item status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl ItemStatus {
    /// Legal forward edges of the item clock.
    pub fn can_transition_to(self, next: ItemStatus) -> bool {
        matches!(
            (self, next),
            (ItemStatus::Pending, ItemStatus::InProgress)
                | (ItemStatus::InProgress, ItemStatus::Completed)
        )
    }
}

/// Payment method accepted at checkout
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    WechatPay,
    Alipay,
}

impl PaymentMethod {
    /// Cash requires a tendered amount; electronic methods settle at
    /// exactly the total with zero change.
    pub fn is_cash(self) -> bool {
        matches!(self, PaymentMethod::Cash)
    }
}

/// One dish entry within an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    pub id: u64,
    pub dish_id: u64,
    /// Dish name frozen at add time
    pub dish_name: String,
    /// Unit price frozen at add time; later catalog edits never touch it
    pub unit_price: f64,
    pub quantity: i32,
    /// `unit_price * quantity`, frozen at add time
    pub subtotal: f64,
    pub status: ItemStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_clock_is_linear() {
        use OrderStatus::*;
        assert!(Placed.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Served));
        assert!(Served.can_transition_to(Paid));
        // No regression, no skipping into Served
        assert!(!InProgress.can_transition_to(Placed));
        assert!(!Placed.can_transition_to(Served));
        assert!(!Served.can_transition_to(InProgress));
        // Terminal states are dead ends
        assert!(!Paid.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Placed));
    }

    #[test]
    fn any_active_order_can_cancel_or_pay() {
        use OrderStatus::*;
        for from in [Placed, InProgress, Served] {
            assert!(from.can_transition_to(Cancelled));
            assert!(from.can_transition_to(Paid));
        }
    }

    #[test]
    fn item_clock_is_linear() {
        use ItemStatus::*;
        assert!(Pending.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Completed));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Pending));
        assert!(!InProgress.can_transition_to(Pending));
    }
}
