//! AddItem command handler
//!
//! Appends a line item to an order. Deliberately does NOT touch
//! inventory: adding to an order is cheap and reversible, commitment
//! happens at submission / preparation time. Unit price and subtotal
//! are frozen here so later catalog edits never rewrite the order.

use crate::money;
use crate::orders::context::TxnContext;
use shared::error::{CoreError, CoreResult};
use shared::order::{ItemStatus, LineItem};

/// AddItem action
#[derive(Debug, Clone)]
pub struct AddItemAction {
    pub order_id: u64,
    pub dish_id: u64,
    pub quantity: i32,
}

impl AddItemAction {
    pub fn execute(&self, ctx: &TxnContext<'_>) -> CoreResult<LineItem> {
        money::validate_quantity(self.quantity)?;

        let mut order = ctx.load_order(self.order_id)?;
        if order.status.is_terminal() {
            return Err(CoreError::state_conflict(format!(
                "order {} is {:?} and cannot be modified",
                order.id, order.status
            )));
        }

        let dish = ctx
            .store()
            .get_dish_txn(ctx.txn(), self.dish_id)?
            .ok_or_else(|| CoreError::not_found(format!("dish {}", self.dish_id)))?;
        if !dish.is_available {
            return Err(CoreError::state_conflict(format!(
                "dish '{}' is not available",
                dish.name
            )));
        }

        let item_id = ctx.store().next_item_id(ctx.txn())?;
        let item = LineItem {
            id: item_id,
            dish_id: dish.id,
            dish_name: dish.name,
            unit_price: dish.price,
            quantity: self.quantity,
            subtotal: money::line_subtotal(dish.price, self.quantity),
            status: ItemStatus::Pending,
        };

        order.items.push(item.clone());
        order.total_amount = money::order_total(&order.items);
        ctx.store_order(&order)?;
        ctx.store().index_line_item(ctx.txn(), item_id, order.id)?;

        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogService;
    use crate::inventory::InventoryLedger;
    use crate::orders::actions::CreateOrderAction;
    use crate::store::Store;
    use crate::tables::TableRegistry;
    use shared::models::{DiningTableCreate, DishCreate, DishUpdate};
    use shared::order::OrderSnapshot;

    struct Fixture {
        store: Store,
        ledger: InventoryLedger,
        catalog: CatalogService,
        registry: TableRegistry,
    }

    fn fixture() -> Fixture {
        let store = Store::open_in_memory().unwrap();
        Fixture {
            ledger: InventoryLedger::new(store.clone()),
            catalog: CatalogService::new(store.clone()),
            registry: TableRegistry::new(store.clone()),
            store,
        }
    }

    impl Fixture {
        fn open_order(&self) -> OrderSnapshot {
            let table = self
                .registry
                .create(DiningTableCreate {
                    number: "T1".to_string(),
                    capacity: Some(4),
                })
                .unwrap();
            self.run(|ctx| {
                CreateOrderAction {
                    table_id: table.id,
                    actor: "Operator".to_string(),
                }
                .execute(ctx)
            })
            .unwrap()
        }

        fn run<T>(&self, f: impl FnOnce(&TxnContext) -> CoreResult<T>) -> CoreResult<T> {
            let txn = self.store.begin_write().unwrap();
            let out = {
                let ctx = TxnContext::new(&txn, &self.store, &self.ledger);
                f(&ctx)
            };
            if out.is_ok() {
                txn.commit().unwrap();
            }
            out
        }

        fn add(&self, order_id: u64, dish_id: u64, quantity: i32) -> CoreResult<LineItem> {
            self.run(|ctx| {
                AddItemAction {
                    order_id,
                    dish_id,
                    quantity,
                }
                .execute(ctx)
            })
        }
    }

    #[test]
    fn add_freezes_price_and_updates_total() {
        let f = fixture();
        let order = f.open_order();
        let dish = f
            .catalog
            .create_dish(DishCreate {
                name: "Kung Pao Chicken".to_string(),
                price: 38.0,
                category: None,
                description: None,
            })
            .unwrap();

        let item = f.add(order.id, dish.id, 2).unwrap();
        assert_eq!(item.unit_price, 38.0);
        assert_eq!(item.subtotal, 76.0);
        assert_eq!(item.status, ItemStatus::Pending);

        // A later price edit does not move the frozen subtotal
        f.catalog
            .update_dish(
                dish.id,
                DishUpdate {
                    price: Some(48.0),
                    ..Default::default()
                },
            )
            .unwrap();
        let stored = f.store.get_order(order.id).unwrap().unwrap();
        assert_eq!(stored.items[0].subtotal, 76.0);
        assert_eq!(stored.total_amount, 76.0);
    }

    #[test]
    fn total_tracks_item_sum_across_adds() {
        let f = fixture();
        let order = f.open_order();
        let a = f
            .catalog
            .create_dish(DishCreate {
                name: "Mapo Tofu".to_string(),
                price: 28.0,
                category: None,
                description: None,
            })
            .unwrap();
        let b = f
            .catalog
            .create_dish(DishCreate {
                name: "Twice-Cooked Pork".to_string(),
                price: 36.0,
                category: None,
                description: None,
            })
            .unwrap();

        f.add(order.id, a.id, 1).unwrap();
        f.add(order.id, b.id, 2).unwrap();

        let stored = f.store.get_order(order.id).unwrap().unwrap();
        assert_eq!(stored.total_amount, 100.0);
        assert_eq!(stored.items.len(), 2);
    }

    #[test]
    fn rejects_bad_quantity_missing_dish_and_unavailable_dish() {
        let f = fixture();
        let order = f.open_order();
        let dish = f
            .catalog
            .create_dish(DishCreate {
                name: "Mapo Tofu".to_string(),
                price: 28.0,
                category: None,
                description: None,
            })
            .unwrap();

        assert!(matches!(
            f.add(order.id, dish.id, 0),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            f.add(order.id, 99, 1),
            Err(CoreError::NotFound(_))
        ));

        f.catalog
            .update_dish(
                dish.id,
                DishUpdate {
                    is_available: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(matches!(
            f.add(order.id, dish.id, 1),
            Err(CoreError::StateConflict(_))
        ));
    }

    #[test]
    fn missing_order_is_not_found() {
        let f = fixture();
        let dish = f
            .catalog
            .create_dish(DishCreate {
                name: "Mapo Tofu".to_string(),
                price: 28.0,
                category: None,
                description: None,
            })
            .unwrap();
        assert!(matches!(f.add(7, dish.id, 1), Err(CoreError::NotFound(_))));
    }
}
