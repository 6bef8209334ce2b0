//! StartPreparation command handler
//!
//! Second phase of the two-phase inventory commitment: the ledger
//! deduction and the item's Pending → InProgress transition commit in
//! one transaction. If stock was consumed by a concurrent preparation
//! since submission, the deduction re-validates and fails, the item
//! stays Pending, and the caller gets the per-ingredient shortfall.

use crate::orders::context::TxnContext;
use shared::error::{CoreError, CoreResult};
use shared::order::{ItemStatus, LineItem, OrderStatus};

/// StartPreparation action
#[derive(Debug, Clone)]
pub struct StartPreparationAction {
    pub item_id: u64,
    pub actor: String,
}

/// Log reason used for order-driven deductions
const DEDUCT_REASON: &str = "Order consumption";

impl StartPreparationAction {
    pub fn execute(&self, ctx: &TxnContext<'_>) -> CoreResult<LineItem> {
        let mut order = ctx.find_order_for_item(self.item_id)?;
        let idx = order
            .item_position(self.item_id)
            .ok_or_else(|| CoreError::not_found(format!("line item {}", self.item_id)))?;

        if !order.items[idx]
            .status
            .can_transition_to(ItemStatus::InProgress)
        {
            return Err(CoreError::state_conflict(format!(
                "line item {} is {:?}; only Pending items can start preparation",
                self.item_id, order.items[idx].status
            )));
        }
        if order.status == OrderStatus::Placed {
            return Err(CoreError::state_conflict(format!(
                "order {} has not been submitted",
                order.id
            )));
        }

        ctx.ledger().deduct_txn(
            ctx.txn(),
            order.items[idx].dish_id,
            order.items[idx].quantity,
            &self.actor,
            DEDUCT_REASON,
        )?;

        order.items[idx].status = ItemStatus::InProgress;
        ctx.store_order(&order)?;

        tracing::info!(
            item_id = self.item_id,
            order_id = order.id,
            dish = %order.items[idx].dish_name,
            "preparation started"
        );
        Ok(order.items[idx].clone())
    }
}
