//! RemoveItem command handler
//!
//! Removes a Pending line item and recomputes the order total in the
//! same transaction. An order whose committed value collapses to zero
//! cannot keep existing: it is cancelled, dropped from the active
//! index, and its table freed when no other active order remains.

use crate::money;
use crate::orders::context::TxnContext;
use shared::error::{CoreError, CoreResult};
use shared::models::TableStatus;
use shared::order::{ItemStatus, OrderSnapshot, OrderStatus};

/// RemoveItem action
#[derive(Debug, Clone)]
pub struct RemoveItemAction {
    pub item_id: u64,
}

/// What removal did to the parent order
#[derive(Debug, Clone)]
pub enum RemoveOutcome {
    /// Item removed, order still live with the recomputed total
    Removed { order: OrderSnapshot },
    /// Removal emptied the order; it is now Cancelled
    OrderCancelled { order: OrderSnapshot },
}

impl RemoveItemAction {
    pub fn execute(&self, ctx: &TxnContext<'_>) -> CoreResult<RemoveOutcome> {
        let mut order = ctx.find_order_for_item(self.item_id)?;
        let item = order
            .item(self.item_id)
            .ok_or_else(|| CoreError::not_found(format!("line item {}", self.item_id)))?;

        if item.status != ItemStatus::Pending {
            return Err(CoreError::state_conflict(format!(
                "line item {} is {:?}; only Pending items can be removed",
                item.id, item.status
            )));
        }

        order.items.retain(|i| i.id != self.item_id);
        ctx.store().remove_line_item_index(ctx.txn(), self.item_id)?;
        order.total_amount = money::order_total(&order.items);

        if order.items.is_empty() || order.total_amount <= 0.0 {
            return self.cancel_order(ctx, order);
        }

        ctx.store_order(&order)?;
        Ok(RemoveOutcome::Removed { order })
    }

    /// Cancel an order with no committed value left.
    fn cancel_order(
        &self,
        ctx: &TxnContext<'_>,
        mut order: OrderSnapshot,
    ) -> CoreResult<RemoveOutcome> {
        for remaining in &order.items {
            ctx.store().remove_line_item_index(ctx.txn(), remaining.id)?;
        }
        order.status = OrderStatus::Cancelled;
        ctx.store_order(&order)?;
        ctx.store().remove_active_order(ctx.txn(), order.id)?;

        let siblings = ctx
            .store()
            .active_orders_for_table_txn(ctx.txn(), order.table_id)?;
        if siblings.is_empty() {
            let mut table = ctx.load_table(order.table_id)?;
            if table.status == TableStatus::Occupied {
                table.status = TableStatus::Free;
                ctx.store_table(&table)?;
            }
        }

        tracing::info!(order_id = order.id, "order cancelled: no items left");
        Ok(RemoveOutcome::OrderCancelled { order })
    }
}
