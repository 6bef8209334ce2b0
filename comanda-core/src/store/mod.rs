//! redb-backed store of record
//!
//! Single logical store shared by every component. All rows are
//! JSON-serialized values keyed by `u64` surrogate ids allocated from
//! the `counters` table inside the same write transaction that inserts
//! the row.
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `dining_tables` | `table_id` | `DiningTable` | Table registry |
//! | `dishes` | `dish_id` | `Dish` | Catalog |
//! | `ingredients` | `ingredient_id` | `Ingredient` | Stock of record |
//! | `recipes` | `(dish_id, ingredient_id)` | `f64` | Bill-of-materials |
//! | `orders` | `order_id` | `OrderSnapshot` | Orders with embedded items |
//! | `active_orders` | `order_id` | `table_id` | Non-terminal order index |
//! | `line_items` | `item_id` | `order_id` | Item-to-order index |
//! | `inventory_log` | `log_id` | `InventoryLogEntry` | Append-only audit log |
//! | `settlements` | `settlement_id` | `Settlement` | Checkout records |
//! | `counters` | name | `u64` | Surrogate id counters |
//!
//! # Atomicity
//!
//! redb commits are all-or-nothing and writers are serialized, so a
//! sufficiency check and the deduction it gates always see the same
//! stock snapshot when run inside one write transaction. A transaction
//! dropped before `commit()` rolls back completely.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use shared::error::CoreError;
use shared::models::{DiningTable, Dish, Ingredient, InventoryLogEntry, RecipeEntry};
use shared::order::{OrderSnapshot, Settlement};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

const TABLES_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("dining_tables");
const DISHES_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("dishes");
const INGREDIENTS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("ingredients");

/// Key = (dish_id, ingredient_id), value = quantity per unit of dish
const RECIPES_TABLE: TableDefinition<(u64, u64), f64> = TableDefinition::new("recipes");

const ORDERS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("orders");

/// Index of non-terminal orders: key = order_id, value = table_id
const ACTIVE_ORDERS_TABLE: TableDefinition<u64, u64> = TableDefinition::new("active_orders");

/// Index of live line items: key = item_id, value = owning order_id
const LINE_ITEMS_TABLE: TableDefinition<u64, u64> = TableDefinition::new("line_items");

const INVENTORY_LOG_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("inventory_log");
const SETTLEMENTS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("settlements");
const COUNTERS_TABLE: TableDefinition<&str, u64> = TableDefinition::new("counters");

const TABLE_ID_KEY: &str = "table_id";
const DISH_ID_KEY: &str = "dish_id";
const INGREDIENT_ID_KEY: &str = "ingredient_id";
const ORDER_ID_KEY: &str = "order_id";
const ITEM_ID_KEY: &str = "item_id";
const LOG_ID_KEY: &str = "log_id";
const SETTLEMENT_ID_KEY: &str = "settlement_id";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for CoreError {
    fn from(err: StorageError) -> Self {
        CoreError::Storage(err.to_string())
    }
}

/// Store of record backed by redb
#[derive(Clone)]
pub struct Store {
    db: Arc<Database>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

impl Store {
    /// Open or create the database at the given path.
    ///
    /// redb commits with immediate durability: once `commit()` returns
    /// the data survives power loss, and the file is always left in a
    /// consistent state.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        let store = Self { db: Arc::new(db) };
        store.init_tables()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        let store = Self { db: Arc::new(db) };
        store.init_tables()?;
        Ok(store)
    }

    fn init_tables(&self) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let _ = txn.open_table(TABLES_TABLE)?;
            let _ = txn.open_table(DISHES_TABLE)?;
            let _ = txn.open_table(INGREDIENTS_TABLE)?;
            let _ = txn.open_table(RECIPES_TABLE)?;
            let _ = txn.open_table(ORDERS_TABLE)?;
            let _ = txn.open_table(ACTIVE_ORDERS_TABLE)?;
            let _ = txn.open_table(LINE_ITEMS_TABLE)?;
            let _ = txn.open_table(INVENTORY_LOG_TABLE)?;
            let _ = txn.open_table(SETTLEMENTS_TABLE)?;
            let _ = txn.open_table(COUNTERS_TABLE)?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Begin a write transaction. Writers are serialized by redb.
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    // ========== Id Counters ==========

    fn next_id(&self, txn: &WriteTransaction, key: &str) -> StorageResult<u64> {
        let mut table = txn.open_table(COUNTERS_TABLE)?;
        let current = table.get(key)?.map(|g| g.value()).unwrap_or(0);
        let next = current + 1;
        table.insert(key, next)?;
        Ok(next)
    }

    pub fn next_table_id(&self, txn: &WriteTransaction) -> StorageResult<u64> {
        self.next_id(txn, TABLE_ID_KEY)
    }

    pub fn next_dish_id(&self, txn: &WriteTransaction) -> StorageResult<u64> {
        self.next_id(txn, DISH_ID_KEY)
    }

    pub fn next_ingredient_id(&self, txn: &WriteTransaction) -> StorageResult<u64> {
        self.next_id(txn, INGREDIENT_ID_KEY)
    }

    pub fn next_order_id(&self, txn: &WriteTransaction) -> StorageResult<u64> {
        self.next_id(txn, ORDER_ID_KEY)
    }

    pub fn next_item_id(&self, txn: &WriteTransaction) -> StorageResult<u64> {
        self.next_id(txn, ITEM_ID_KEY)
    }

    pub fn next_log_id(&self, txn: &WriteTransaction) -> StorageResult<u64> {
        self.next_id(txn, LOG_ID_KEY)
    }

    pub fn next_settlement_id(&self, txn: &WriteTransaction) -> StorageResult<u64> {
        self.next_id(txn, SETTLEMENT_ID_KEY)
    }

    // ========== Dining Tables ==========

    pub fn put_table(&self, txn: &WriteTransaction, table: &DiningTable) -> StorageResult<()> {
        let bytes = serde_json::to_vec(table)?;
        let mut t = txn.open_table(TABLES_TABLE)?;
        t.insert(table.id, bytes.as_slice())?;
        Ok(())
    }

    pub fn get_table_txn(
        &self,
        txn: &WriteTransaction,
        id: u64,
    ) -> StorageResult<Option<DiningTable>> {
        let t = txn.open_table(TABLES_TABLE)?;
        match t.get(id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_table(&self, id: u64) -> StorageResult<Option<DiningTable>> {
        let read = self.db.begin_read()?;
        let t = read.open_table(TABLES_TABLE)?;
        match t.get(id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    pub fn delete_table(&self, txn: &WriteTransaction, id: u64) -> StorageResult<bool> {
        let mut t = txn.open_table(TABLES_TABLE)?;
        Ok(t.remove(id)?.is_some())
    }

    /// Scan for a table with the given human-facing number.
    pub fn find_table_by_number_txn(
        &self,
        txn: &WriteTransaction,
        number: &str,
    ) -> StorageResult<Option<DiningTable>> {
        let t = txn.open_table(TABLES_TABLE)?;
        for entry in t.iter()? {
            let (_, v) = entry?;
            let table: DiningTable = serde_json::from_slice(v.value())?;
            if table.number == number {
                return Ok(Some(table));
            }
        }
        Ok(None)
    }

    /// All tables, ordered by number.
    pub fn list_tables(&self) -> StorageResult<Vec<DiningTable>> {
        let read = self.db.begin_read()?;
        let t = read.open_table(TABLES_TABLE)?;
        let mut tables = Vec::new();
        for entry in t.iter()? {
            let (_, v) = entry?;
            tables.push(serde_json::from_slice::<DiningTable>(v.value())?);
        }
        tables.sort_by(|a, b| a.number.cmp(&b.number));
        Ok(tables)
    }

    // ========== Dishes ==========

    pub fn put_dish(&self, txn: &WriteTransaction, dish: &Dish) -> StorageResult<()> {
        let bytes = serde_json::to_vec(dish)?;
        let mut t = txn.open_table(DISHES_TABLE)?;
        t.insert(dish.id, bytes.as_slice())?;
        Ok(())
    }

    pub fn get_dish_txn(&self, txn: &WriteTransaction, id: u64) -> StorageResult<Option<Dish>> {
        let t = txn.open_table(DISHES_TABLE)?;
        match t.get(id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_dish(&self, id: u64) -> StorageResult<Option<Dish>> {
        let read = self.db.begin_read()?;
        let t = read.open_table(DISHES_TABLE)?;
        match t.get(id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    pub fn delete_dish(&self, txn: &WriteTransaction, id: u64) -> StorageResult<bool> {
        let mut t = txn.open_table(DISHES_TABLE)?;
        Ok(t.remove(id)?.is_some())
    }

    /// All dishes, ordered by name.
    pub fn list_dishes(&self) -> StorageResult<Vec<Dish>> {
        let read = self.db.begin_read()?;
        let t = read.open_table(DISHES_TABLE)?;
        let mut dishes = Vec::new();
        for entry in t.iter()? {
            let (_, v) = entry?;
            dishes.push(serde_json::from_slice::<Dish>(v.value())?);
        }
        dishes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(dishes)
    }

    // ========== Ingredients ==========

    pub fn put_ingredient(
        &self,
        txn: &WriteTransaction,
        ingredient: &Ingredient,
    ) -> StorageResult<()> {
        let bytes = serde_json::to_vec(ingredient)?;
        let mut t = txn.open_table(INGREDIENTS_TABLE)?;
        t.insert(ingredient.id, bytes.as_slice())?;
        Ok(())
    }

    pub fn get_ingredient_txn(
        &self,
        txn: &WriteTransaction,
        id: u64,
    ) -> StorageResult<Option<Ingredient>> {
        let t = txn.open_table(INGREDIENTS_TABLE)?;
        match t.get(id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_ingredient(&self, id: u64) -> StorageResult<Option<Ingredient>> {
        let read = self.db.begin_read()?;
        let t = read.open_table(INGREDIENTS_TABLE)?;
        match t.get(id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    pub fn delete_ingredient(&self, txn: &WriteTransaction, id: u64) -> StorageResult<bool> {
        let mut t = txn.open_table(INGREDIENTS_TABLE)?;
        Ok(t.remove(id)?.is_some())
    }

    /// All ingredients, ordered by name.
    pub fn list_ingredients(&self) -> StorageResult<Vec<Ingredient>> {
        let read = self.db.begin_read()?;
        let t = read.open_table(INGREDIENTS_TABLE)?;
        let mut ingredients = Vec::new();
        for entry in t.iter()? {
            let (_, v) = entry?;
            ingredients.push(serde_json::from_slice::<Ingredient>(v.value())?);
        }
        ingredients.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(ingredients)
    }

    // ========== Recipes ==========

    /// Upsert one (dish, ingredient) recipe entry.
    pub fn put_recipe_entry(
        &self,
        txn: &WriteTransaction,
        dish_id: u64,
        ingredient_id: u64,
        quantity: f64,
    ) -> StorageResult<()> {
        let mut t = txn.open_table(RECIPES_TABLE)?;
        t.insert((dish_id, ingredient_id), quantity)?;
        Ok(())
    }

    pub fn remove_recipe_entry(
        &self,
        txn: &WriteTransaction,
        dish_id: u64,
        ingredient_id: u64,
    ) -> StorageResult<bool> {
        let mut t = txn.open_table(RECIPES_TABLE)?;
        Ok(t.remove((dish_id, ingredient_id))?.is_some())
    }

    /// Recipe entries for one dish, ordered by ingredient id.
    pub fn recipe_for_dish_txn(
        &self,
        txn: &WriteTransaction,
        dish_id: u64,
    ) -> StorageResult<Vec<RecipeEntry>> {
        let t = txn.open_table(RECIPES_TABLE)?;
        let mut entries = Vec::new();
        for entry in t.range((dish_id, u64::MIN)..=(dish_id, u64::MAX))? {
            let (k, v) = entry?;
            let (d, ingredient_id) = k.value();
            entries.push(RecipeEntry {
                dish_id: d,
                ingredient_id,
                quantity: v.value(),
            });
        }
        Ok(entries)
    }

    pub fn recipe_for_dish(&self, dish_id: u64) -> StorageResult<Vec<RecipeEntry>> {
        let read = self.db.begin_read()?;
        let t = read.open_table(RECIPES_TABLE)?;
        let mut entries = Vec::new();
        for entry in t.range((dish_id, u64::MIN)..=(dish_id, u64::MAX))? {
            let (k, v) = entry?;
            let (d, ingredient_id) = k.value();
            entries.push(RecipeEntry {
                dish_id: d,
                ingredient_id,
                quantity: v.value(),
            });
        }
        Ok(entries)
    }

    /// Cascade helper for dish deletion.
    pub fn remove_recipe_entries_for_dish(
        &self,
        txn: &WriteTransaction,
        dish_id: u64,
    ) -> StorageResult<usize> {
        let keys: Vec<(u64, u64)> = {
            let t = txn.open_table(RECIPES_TABLE)?;
            let mut keys = Vec::new();
            for entry in t.range((dish_id, u64::MIN)..=(dish_id, u64::MAX))? {
                let (k, _) = entry?;
                keys.push(k.value());
            }
            keys
        };
        let mut t = txn.open_table(RECIPES_TABLE)?;
        for key in &keys {
            t.remove(*key)?;
        }
        Ok(keys.len())
    }

    /// Cascade helper for ingredient deletion (full scan, the recipe
    /// table is small).
    pub fn remove_recipe_entries_for_ingredient(
        &self,
        txn: &WriteTransaction,
        ingredient_id: u64,
    ) -> StorageResult<usize> {
        let keys: Vec<(u64, u64)> = {
            let t = txn.open_table(RECIPES_TABLE)?;
            let mut keys = Vec::new();
            for entry in t.iter()? {
                let (k, _) = entry?;
                let key = k.value();
                if key.1 == ingredient_id {
                    keys.push(key);
                }
            }
            keys
        };
        let mut t = txn.open_table(RECIPES_TABLE)?;
        for key in &keys {
            t.remove(*key)?;
        }
        Ok(keys.len())
    }

    // ========== Orders ==========

    pub fn put_order(&self, txn: &WriteTransaction, order: &OrderSnapshot) -> StorageResult<()> {
        let bytes = serde_json::to_vec(order)?;
        let mut t = txn.open_table(ORDERS_TABLE)?;
        t.insert(order.id, bytes.as_slice())?;
        Ok(())
    }

    pub fn get_order_txn(
        &self,
        txn: &WriteTransaction,
        id: u64,
    ) -> StorageResult<Option<OrderSnapshot>> {
        let t = txn.open_table(ORDERS_TABLE)?;
        match t.get(id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_order(&self, id: u64) -> StorageResult<Option<OrderSnapshot>> {
        let read = self.db.begin_read()?;
        let t = read.open_table(ORDERS_TABLE)?;
        match t.get(id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// All orders, ordered by id.
    pub fn list_orders(&self) -> StorageResult<Vec<OrderSnapshot>> {
        let read = self.db.begin_read()?;
        let t = read.open_table(ORDERS_TABLE)?;
        let mut orders = Vec::new();
        for entry in t.iter()? {
            let (_, v) = entry?;
            orders.push(serde_json::from_slice::<OrderSnapshot>(v.value())?);
        }
        Ok(orders)
    }

    // ========== Active Order Index ==========

    pub fn index_active_order(
        &self,
        txn: &WriteTransaction,
        order_id: u64,
        table_id: u64,
    ) -> StorageResult<()> {
        let mut t = txn.open_table(ACTIVE_ORDERS_TABLE)?;
        t.insert(order_id, table_id)?;
        Ok(())
    }

    pub fn remove_active_order(&self, txn: &WriteTransaction, order_id: u64) -> StorageResult<()> {
        let mut t = txn.open_table(ACTIVE_ORDERS_TABLE)?;
        t.remove(order_id)?;
        Ok(())
    }

    /// Ids of non-terminal orders for one table, ascending.
    pub fn active_orders_for_table_txn(
        &self,
        txn: &WriteTransaction,
        table_id: u64,
    ) -> StorageResult<Vec<u64>> {
        let t = txn.open_table(ACTIVE_ORDERS_TABLE)?;
        let mut ids = Vec::new();
        for entry in t.iter()? {
            let (k, v) = entry?;
            if v.value() == table_id {
                ids.push(k.value());
            }
        }
        Ok(ids)
    }

    /// All (order_id, table_id) pairs in the active index.
    pub fn active_order_ids(&self) -> StorageResult<Vec<(u64, u64)>> {
        let read = self.db.begin_read()?;
        let t = read.open_table(ACTIVE_ORDERS_TABLE)?;
        let mut ids = Vec::new();
        for entry in t.iter()? {
            let (k, v) = entry?;
            ids.push((k.value(), v.value()));
        }
        Ok(ids)
    }

    // ========== Line Item Index ==========

    pub fn index_line_item(
        &self,
        txn: &WriteTransaction,
        item_id: u64,
        order_id: u64,
    ) -> StorageResult<()> {
        let mut t = txn.open_table(LINE_ITEMS_TABLE)?;
        t.insert(item_id, order_id)?;
        Ok(())
    }

    pub fn remove_line_item_index(
        &self,
        txn: &WriteTransaction,
        item_id: u64,
    ) -> StorageResult<()> {
        let mut t = txn.open_table(LINE_ITEMS_TABLE)?;
        t.remove(item_id)?;
        Ok(())
    }

    /// Owning order of a live line item, if any.
    pub fn order_id_for_item_txn(
        &self,
        txn: &WriteTransaction,
        item_id: u64,
    ) -> StorageResult<Option<u64>> {
        let t = txn.open_table(LINE_ITEMS_TABLE)?;
        Ok(t.get(item_id)?.map(|g| g.value()))
    }

    pub fn order_id_for_item(&self, item_id: u64) -> StorageResult<Option<u64>> {
        let read = self.db.begin_read()?;
        let t = read.open_table(LINE_ITEMS_TABLE)?;
        Ok(t.get(item_id)?.map(|g| g.value()))
    }

    // ========== Inventory Log ==========

    /// Append one audit entry. The log is append-only: there is no
    /// update or delete path.
    pub fn append_log(&self, txn: &WriteTransaction, entry: &InventoryLogEntry) -> StorageResult<()> {
        let bytes = serde_json::to_vec(entry)?;
        let mut t = txn.open_table(INVENTORY_LOG_TABLE)?;
        t.insert(entry.id, bytes.as_slice())?;
        Ok(())
    }

    /// Log entries, newest first, optionally for one ingredient.
    pub fn list_log_entries(
        &self,
        ingredient_id: Option<u64>,
    ) -> StorageResult<Vec<InventoryLogEntry>> {
        let read = self.db.begin_read()?;
        let t = read.open_table(INVENTORY_LOG_TABLE)?;
        let mut entries = Vec::new();
        for entry in t.iter()? {
            let (_, v) = entry?;
            let log: InventoryLogEntry = serde_json::from_slice(v.value())?;
            if ingredient_id.is_none_or(|id| log.ingredient_id == id) {
                entries.push(log);
            }
        }
        entries.reverse();
        Ok(entries)
    }

    // ========== Settlements ==========

    pub fn put_settlement(
        &self,
        txn: &WriteTransaction,
        settlement: &Settlement,
    ) -> StorageResult<()> {
        let bytes = serde_json::to_vec(settlement)?;
        let mut t = txn.open_table(SETTLEMENTS_TABLE)?;
        t.insert(settlement.id, bytes.as_slice())?;
        Ok(())
    }

    pub fn get_settlement(&self, id: u64) -> StorageResult<Option<Settlement>> {
        let read = self.db.begin_read()?;
        let t = read.open_table(SETTLEMENTS_TABLE)?;
        match t.get(id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }
}
