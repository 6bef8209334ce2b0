//! OrderManager: order lifecycle command processing
//!
//! Thin transactional shell around the action implementations: every
//! mutating method begins one write transaction, runs the action, and
//! commits only on success. An error return drops the transaction, so
//! the operation rolls back completely and no partial state is ever
//! visible to another caller.

use crate::inventory::InventoryLedger;
use crate::orders::actions::{
    AddItemAction, CheckoutAction, CompleteItemAction, CreateOrderAction, RemoveItemAction,
    StartPreparationAction, SubmitOrderAction,
};
use crate::orders::context::TxnContext;
use crate::store::{StorageError, Store};
use serde::Serialize;
use shared::error::{CoreError, CoreResult};
use shared::order::{ItemStatus, LineItem, OrderSnapshot, OrderStatus, PaymentMethod, Settlement};

pub use crate::orders::actions::RemoveOutcome;

/// One row of the kitchen work queue
#[derive(Debug, Clone, Serialize)]
pub struct KitchenTicket {
    pub item_id: u64,
    pub order_id: u64,
    pub table_number: String,
    pub dish_name: String,
    pub quantity: i32,
    pub status: ItemStatus,
    /// When the parent order was opened (Unix millis)
    pub ordered_at: i64,
}

#[derive(Clone)]
pub struct OrderManager {
    store: Store,
    ledger: InventoryLedger,
}

impl OrderManager {
    pub fn new(store: Store, ledger: InventoryLedger) -> Self {
        Self { store, ledger }
    }

    /// Run one operation inside a single write transaction.
    fn with_txn<T>(&self, f: impl FnOnce(&TxnContext<'_>) -> CoreResult<T>) -> CoreResult<T> {
        let txn = self.store.begin_write()?;
        let out = {
            let ctx = TxnContext::new(&txn, &self.store, &self.ledger);
            f(&ctx)?
        };
        txn.commit().map_err(StorageError::from)?;
        Ok(out)
    }

    // ========== Mutating Operations ==========

    /// Open a new order on a table; the table becomes Occupied.
    pub fn create_order(&self, table_id: u64, actor: &str) -> CoreResult<OrderSnapshot> {
        let order = self.with_txn(|ctx| {
            CreateOrderAction {
                table_id,
                actor: actor.to_string(),
            }
            .execute(ctx)
        })?;
        tracing::info!(order_id = order.id, table_id, "order created");
        Ok(order)
    }

    /// Add a dish to a non-terminal order. No inventory check here;
    /// commitment is deferred to submission and preparation.
    pub fn add_line_item(&self, order_id: u64, dish_id: u64, quantity: i32) -> CoreResult<LineItem> {
        self.with_txn(|ctx| {
            AddItemAction {
                order_id,
                dish_id,
                quantity,
            }
            .execute(ctx)
        })
    }

    /// Remove a Pending line item. Emptying an order cancels it.
    pub fn remove_line_item(&self, item_id: u64) -> CoreResult<RemoveOutcome> {
        self.with_txn(|ctx| RemoveItemAction { item_id }.execute(ctx))
    }

    /// Validate every pending item against stock and move the order to
    /// InProgress. Read-only on inventory.
    pub fn submit_order(&self, order_id: u64) -> CoreResult<OrderSnapshot> {
        self.with_txn(|ctx| SubmitOrderAction { order_id }.execute(ctx))
    }

    /// Deduct the item's recipe demand and move it to InProgress, in
    /// one transaction.
    pub fn start_preparation(&self, item_id: u64, actor: &str) -> CoreResult<LineItem> {
        self.with_txn(|ctx| {
            StartPreparationAction {
                item_id,
                actor: actor.to_string(),
            }
            .execute(ctx)
        })
    }

    /// Complete an InProgress item; the order advances to Served once
    /// every item is done.
    pub fn complete_item(&self, item_id: u64) -> CoreResult<OrderSnapshot> {
        self.with_txn(|ctx| CompleteItemAction { item_id }.execute(ctx))
    }

    /// Settle every active order of the table and free it.
    pub fn checkout(
        &self,
        table_id: u64,
        payment_method: PaymentMethod,
        received_amount: Option<f64>,
    ) -> CoreResult<Settlement> {
        self.with_txn(|ctx| {
            CheckoutAction {
                table_id,
                payment_method,
                received_amount,
            }
            .execute(ctx)
        })
    }

    // ========== Read Accessors ==========

    pub fn get_order(&self, order_id: u64) -> CoreResult<OrderSnapshot> {
        self.store
            .get_order(order_id)?
            .ok_or_else(|| CoreError::not_found(format!("order {order_id}")))
    }

    /// A live line item (items of terminal orders resolve NotFound).
    pub fn get_line_item(&self, item_id: u64) -> CoreResult<LineItem> {
        let order_id = self
            .store
            .order_id_for_item(item_id)?
            .ok_or_else(|| CoreError::not_found(format!("line item {item_id}")))?;
        let order = self.get_order(order_id)?;
        order
            .item(item_id)
            .cloned()
            .ok_or_else(|| CoreError::not_found(format!("line item {item_id}")))
    }

    /// Orders of one table with their line items, oldest first,
    /// optionally filtered by status.
    pub fn list_orders_for_table(
        &self,
        table_id: u64,
        status: Option<OrderStatus>,
    ) -> CoreResult<Vec<OrderSnapshot>> {
        let mut orders = self.store.list_orders()?;
        orders.retain(|o| o.table_id == table_id);
        if let Some(status) = status {
            orders.retain(|o| o.status == status);
        }
        Ok(orders)
    }

    /// Every non-terminal order, oldest first.
    pub fn list_active_orders(&self) -> CoreResult<Vec<OrderSnapshot>> {
        let mut orders = Vec::new();
        for (order_id, _) in self.store.active_order_ids()? {
            if let Some(order) = self.store.get_order(order_id)? {
                orders.push(order);
            }
        }
        orders.sort_by_key(|o| o.id);
        Ok(orders)
    }

    /// Kitchen work queue: items of submitted orders with their table
    /// number, optionally filtered by item status, oldest order first.
    pub fn kitchen_queue(&self, status: Option<ItemStatus>) -> CoreResult<Vec<KitchenTicket>> {
        let mut tickets = Vec::new();
        let mut orders = self.list_active_orders()?;
        orders.retain(|o| {
            matches!(o.status, OrderStatus::InProgress | OrderStatus::Served)
        });
        orders.sort_by_key(|o| (o.opened_at, o.id));

        for order in orders {
            let table_number = self
                .store
                .get_table(order.table_id)?
                .map(|t| t.number)
                .unwrap_or_default();
            for item in &order.items {
                if status.is_none_or(|s| item.status == s) {
                    tickets.push(KitchenTicket {
                        item_id: item.id,
                        order_id: order.id,
                        table_number: table_number.clone(),
                        dish_name: item.dish_name.clone(),
                        quantity: item.quantity,
                        status: item.status,
                        ordered_at: order.opened_at,
                    });
                }
            }
        }
        Ok(tickets)
    }
}

#[cfg(test)]
mod tests;
