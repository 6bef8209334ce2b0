//! Aggregated core state
//!
//! One [`Comanda`] value wires every component to the same store of
//! record. This is what the embedding presentation layer holds on to.

use crate::catalog::CatalogService;
use crate::inventory::InventoryLedger;
use crate::orders::OrderManager;
use crate::store::Store;
use crate::tables::TableRegistry;
use shared::error::CoreResult;
use std::path::Path;

pub struct Comanda {
    store: Store,
    pub catalog: CatalogService,
    pub inventory: InventoryLedger,
    pub tables: TableRegistry,
    pub orders: OrderManager,
}

impl Comanda {
    /// Open (or create) the store of record at the given path and wire
    /// up every component.
    pub fn open(path: impl AsRef<Path>) -> CoreResult<Self> {
        let store = Store::open(path)?;
        Ok(Self::with_store(store))
    }

    /// In-memory instance (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> CoreResult<Self> {
        let store = Store::open_in_memory()?;
        Ok(Self::with_store(store))
    }

    fn with_store(store: Store) -> Self {
        let inventory = InventoryLedger::new(store.clone());
        Self {
            catalog: CatalogService::new(store.clone()),
            tables: TableRegistry::new(store.clone()),
            orders: OrderManager::new(store.clone(), inventory.clone()),
            inventory,
            store,
        }
    }

    /// Direct store access for read-side integrations
    pub fn store(&self) -> &Store {
        &self.store
    }
}
