//! Transaction-scoped context shared by the command actions

use crate::inventory::InventoryLedger;
use crate::store::Store;
use redb::WriteTransaction;
use shared::error::{CoreError, CoreResult};
use shared::models::DiningTable;
use shared::order::OrderSnapshot;

/// Everything an action needs to read and write within one transaction.
///
/// Dropping the underlying transaction without commit rolls back every
/// write an action made through this context.
pub struct TxnContext<'a> {
    txn: &'a WriteTransaction,
    store: &'a Store,
    ledger: &'a InventoryLedger,
}

impl<'a> TxnContext<'a> {
    pub fn new(txn: &'a WriteTransaction, store: &'a Store, ledger: &'a InventoryLedger) -> Self {
        Self { txn, store, ledger }
    }

    pub fn txn(&self) -> &WriteTransaction {
        self.txn
    }

    pub fn store(&self) -> &Store {
        self.store
    }

    pub fn ledger(&self) -> &InventoryLedger {
        self.ledger
    }

    pub fn load_order(&self, order_id: u64) -> CoreResult<OrderSnapshot> {
        self.store
            .get_order_txn(self.txn, order_id)?
            .ok_or_else(|| CoreError::not_found(format!("order {order_id}")))
    }

    pub fn store_order(&self, order: &OrderSnapshot) -> CoreResult<()> {
        Ok(self.store.put_order(self.txn, order)?)
    }

    /// Resolve a live line item to its owning order. Items of terminal
    /// orders are dropped from the index, so they resolve to NotFound.
    pub fn find_order_for_item(&self, item_id: u64) -> CoreResult<OrderSnapshot> {
        let order_id = self
            .store
            .order_id_for_item_txn(self.txn, item_id)?
            .ok_or_else(|| CoreError::not_found(format!("line item {item_id}")))?;
        self.load_order(order_id)
    }

    pub fn load_table(&self, table_id: u64) -> CoreResult<DiningTable> {
        self.store
            .get_table_txn(self.txn, table_id)?
            .ok_or_else(|| CoreError::not_found(format!("table {table_id}")))
    }

    pub fn store_table(&self, table: &DiningTable) -> CoreResult<()> {
        Ok(self.store.put_table(self.txn, table)?)
    }
}
