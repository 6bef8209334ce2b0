//! SubmitOrder command handler
//!
//! First phase of the two-phase inventory commitment: every pending
//! item is checked read-only against current stock. Any shortfall
//! rejects the whole submission and nothing changes; partial submission
//! does not exist. Deduction is deferred to `StartPreparation`.

use crate::orders::context::TxnContext;
use shared::error::{CoreError, CoreResult};
use shared::order::{OrderSnapshot, OrderStatus};

/// SubmitOrder action
#[derive(Debug, Clone)]
pub struct SubmitOrderAction {
    pub order_id: u64,
}

impl SubmitOrderAction {
    pub fn execute(&self, ctx: &TxnContext<'_>) -> CoreResult<OrderSnapshot> {
        let mut order = ctx.load_order(self.order_id)?;
        if order.status != OrderStatus::Placed {
            return Err(CoreError::state_conflict(format!(
                "order {} is {:?}; only Placed orders can be submitted",
                order.id, order.status
            )));
        }

        let pending: Vec<(u64, i32)> = order
            .pending_items()
            .map(|i| (i.dish_id, i.quantity))
            .collect();
        if pending.is_empty() {
            return Err(CoreError::state_conflict(format!(
                "order {} has no pending items to submit",
                order.id
            )));
        }

        // Validate every pending item; collect shortfalls across all of
        // them so the caller sees the full picture at once.
        let mut shortfalls = Vec::new();
        for (dish_id, quantity) in pending {
            match ctx.ledger().check_sufficiency_txn(ctx.txn(), dish_id, quantity) {
                Ok(_) => {}
                Err(CoreError::InsufficientStock(mut short)) => shortfalls.append(&mut short),
                Err(other) => return Err(other),
            }
        }
        if !shortfalls.is_empty() {
            return Err(CoreError::InsufficientStock(shortfalls));
        }

        order.status = OrderStatus::InProgress;
        ctx.store_order(&order)?;

        tracing::info!(order_id = order.id, "order submitted");
        Ok(order)
    }
}
