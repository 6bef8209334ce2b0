//! CreateOrder command handler
//!
//! Opens a new order on a table and flips the table to Occupied.

use crate::orders::context::TxnContext;
use shared::error::{CoreError, CoreResult};
use shared::models::TableStatus;
use shared::order::OrderSnapshot;

/// CreateOrder action
#[derive(Debug, Clone)]
pub struct CreateOrderAction {
    pub table_id: u64,
    pub actor: String,
}

impl CreateOrderAction {
    pub fn execute(&self, ctx: &TxnContext<'_>) -> CoreResult<OrderSnapshot> {
        let mut table = ctx.load_table(self.table_id)?;
        if !table.status.accepts_orders() {
            return Err(CoreError::state_conflict(format!(
                "table '{}' is under maintenance",
                table.number
            )));
        }

        let order_id = ctx.store().next_order_id(ctx.txn())?;
        let order = OrderSnapshot::new(order_id, table.id, self.actor.clone());
        ctx.store_order(&order)?;
        ctx.store()
            .index_active_order(ctx.txn(), order_id, table.id)?;

        if table.status != TableStatus::Occupied {
            table.status = TableStatus::Occupied;
            ctx.store_table(&table)?;
        }

        Ok(order)
    }
}
