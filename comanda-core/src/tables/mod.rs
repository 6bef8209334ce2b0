//! Table registry: physical tables and their occupancy
//!
//! Occupancy is owned by the order lifecycle: a table is `Occupied`
//! exactly while it has at least one non-terminal order. Manual status
//! edits are admin operations and are rejected while active orders
//! exist.

use crate::store::{StorageError, Store};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use shared::error::{CoreError, CoreResult};
use shared::models::{DiningTable, DiningTableCreate, TableStatus};

/// Default seats on a new table when the payload leaves it out
const DEFAULT_CAPACITY: i32 = 4;

#[derive(Clone)]
pub struct TableRegistry {
    store: Store,
}

impl TableRegistry {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Create a table; the human-facing number must be unique.
    pub fn create(&self, data: DiningTableCreate) -> CoreResult<DiningTable> {
        validate_required_text(&data.number, "table number", MAX_NAME_LEN)?;
        let capacity = data.capacity.unwrap_or(DEFAULT_CAPACITY);
        if capacity <= 0 {
            return Err(CoreError::validation(format!(
                "capacity must be positive, got {capacity}"
            )));
        }

        let txn = self.store.begin_write()?;
        let table = {
            if self
                .store
                .find_table_by_number_txn(&txn, &data.number)?
                .is_some()
            {
                return Err(CoreError::DuplicateKey(format!(
                    "table number '{}' already exists",
                    data.number
                )));
            }
            let id = self.store.next_table_id(&txn)?;
            let table = DiningTable {
                id,
                number: data.number,
                capacity,
                status: TableStatus::Free,
            };
            self.store.put_table(&txn, &table)?;
            table
        };
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(table_id = table.id, number = %table.number, "table created");
        Ok(table)
    }

    /// Delete a table. Blocked while any order for it is in a
    /// non-terminal status.
    pub fn delete(&self, table_id: u64) -> CoreResult<()> {
        let txn = self.store.begin_write()?;
        {
            let table = self
                .store
                .get_table_txn(&txn, table_id)?
                .ok_or_else(|| CoreError::not_found(format!("table {table_id}")))?;
            let active = self.store.active_orders_for_table_txn(&txn, table_id)?;
            if !active.is_empty() {
                return Err(CoreError::HasActiveDependents(format!(
                    "table '{}' has {} active order(s)",
                    table.number,
                    active.len()
                )));
            }
            self.store.delete_table(&txn, table_id)?;
        }
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(table_id, "table deleted");
        Ok(())
    }

    /// Manually set a table's status (admin operation). Rejected while
    /// the table has active orders, since occupancy then belongs to the
    /// order lifecycle.
    pub fn set_status(&self, table_id: u64, status: TableStatus) -> CoreResult<DiningTable> {
        let txn = self.store.begin_write()?;
        let table = {
            let mut table = self
                .store
                .get_table_txn(&txn, table_id)?
                .ok_or_else(|| CoreError::not_found(format!("table {table_id}")))?;
            let active = self.store.active_orders_for_table_txn(&txn, table_id)?;
            if !active.is_empty() {
                return Err(CoreError::state_conflict(format!(
                    "table '{}' has active orders; settle or cancel them first",
                    table.number
                )));
            }
            table.status = status;
            self.store.put_table(&txn, &table)?;
            table
        };
        txn.commit().map_err(StorageError::from)?;

        tracing::debug!(table_id, status = ?table.status, "table status set");
        Ok(table)
    }

    pub fn get(&self, table_id: u64) -> CoreResult<DiningTable> {
        self.store
            .get_table(table_id)?
            .ok_or_else(|| CoreError::not_found(format!("table {table_id}")))
    }

    /// Tables ordered by number, optionally filtered by status and/or a
    /// number substring.
    pub fn list(
        &self,
        status: Option<TableStatus>,
        number_contains: Option<&str>,
    ) -> CoreResult<Vec<DiningTable>> {
        let mut tables = self.store.list_tables()?;
        if let Some(status) = status {
            tables.retain(|t| t.status == status);
        }
        if let Some(needle) = number_contains {
            tables.retain(|t| t.number.contains(needle));
        }
        Ok(tables)
    }
}
