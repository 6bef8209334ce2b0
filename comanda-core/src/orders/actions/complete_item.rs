//! CompleteItem command handler
//!
//! Marks an InProgress item Completed. When that completes the last
//! item of an InProgress order, the order advances to Served.

use crate::orders::context::TxnContext;
use shared::error::{CoreError, CoreResult};
use shared::order::{ItemStatus, OrderSnapshot, OrderStatus};

/// CompleteItem action
#[derive(Debug, Clone)]
pub struct CompleteItemAction {
    pub item_id: u64,
}

impl CompleteItemAction {
    pub fn execute(&self, ctx: &TxnContext<'_>) -> CoreResult<OrderSnapshot> {
        let mut order = ctx.find_order_for_item(self.item_id)?;
        let idx = order
            .item_position(self.item_id)
            .ok_or_else(|| CoreError::not_found(format!("line item {}", self.item_id)))?;

        if !order.items[idx]
            .status
            .can_transition_to(ItemStatus::Completed)
        {
            return Err(CoreError::state_conflict(format!(
                "line item {} is {:?}; only InProgress items can be completed",
                self.item_id, order.items[idx].status
            )));
        }

        order.items[idx].status = ItemStatus::Completed;

        if order.all_items_completed() && order.status.can_transition_to(OrderStatus::Served) {
            order.status = OrderStatus::Served;
            tracing::info!(order_id = order.id, "order served");
        }

        ctx.store_order(&order)?;
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogService;
    use crate::inventory::InventoryLedger;
    use crate::orders::actions::{
        AddItemAction, CreateOrderAction, StartPreparationAction, SubmitOrderAction,
    };
    use crate::store::Store;
    use crate::tables::TableRegistry;
    use shared::models::{DiningTableCreate, DishCreate, IngredientCreate};

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

        /// Submitted order with two items in preparation; returns
        /// (order_id, item ids).
        fn order_with_two_items_in_progress(&self) -> (u64, Vec<u64>) {
            let table = self
                .registry
                .create(DiningTableCreate {
                    number: "T1".to_string(),
                    capacity: Some(4),
                })
                .unwrap();
            let order = self
                .run(|ctx| {
                    CreateOrderAction {
                        table_id: table.id,
                        actor: "Operator".to_string(),
                    }
                    .execute(ctx)
                })
                .unwrap();

            let mut item_ids = Vec::new();
            for name in ["Mapo Tofu", "Twice-Cooked Pork"] {
                let dish = self
                    .catalog
                    .create_dish(DishCreate {
                        name: name.to_string(),
                        price: 30.0,
                        category: None,
                        description: None,
                    })
                    .unwrap();
                let ing = self
                    .ledger
                    .create_ingredient(IngredientCreate {
                        name: format!("{name} base"),
                        unit: "kg".to_string(),
                        stock: 10.0,
                        low_stock_threshold: 1.0,
                    })
                    .unwrap();
                self.catalog.set_recipe_entry(dish.id, ing.id, 0.2).unwrap();
                let item = self
                    .run(|ctx| {
                        AddItemAction {
                            order_id: order.id,
                            dish_id: dish.id,
                            quantity: 1,
                        }
                        .execute(ctx)
                    })
                    .unwrap();
                item_ids.push(item.id);
            }

            self.run(|ctx| SubmitOrderAction { order_id: order.id }.execute(ctx))
                .unwrap();
            for &item_id in &item_ids {
                self.run(|ctx| {
                    StartPreparationAction {
                        item_id,
                        actor: "Kitchen".to_string(),
                    }
                    .execute(ctx)
                })
                .unwrap();
            }
            (order.id, item_ids)
        }

        fn complete(&self, item_id: u64) -> CoreResult<OrderSnapshot> {
            self.run(|ctx| CompleteItemAction { item_id }.execute(ctx))
        }
    }

    #[test]
    fn order_serves_only_after_last_item_completes() {
        let f = fixture();
        let (_, items) = f.order_with_two_items_in_progress();

        let after_first = f.complete(items[0]).unwrap();
        assert_eq!(after_first.status, OrderStatus::InProgress);

        let after_second = f.complete(items[1]).unwrap();
        assert_eq!(after_second.status, OrderStatus::Served);
        assert!(after_second.all_items_completed());
    }

    #[test]
    fn pending_item_cannot_complete() {
        let f = fixture();
        let table = f
            .registry
            .create(DiningTableCreate {
                number: "T2".to_string(),
                capacity: Some(2),
            })
            .unwrap();
        let order = f
            .run(|ctx| {
                CreateOrderAction {
                    table_id: table.id,
                    actor: "Operator".to_string(),
                }
                .execute(ctx)
            })
            .unwrap();
        let dish = f
            .catalog
            .create_dish(DishCreate {
                name: "Mapo Tofu".to_string(),
                price: 28.0,
                category: None,
                description: None,
            })
            .unwrap();
        let item = f
            .run(|ctx| {
                AddItemAction {
                    order_id: order.id,
                    dish_id: dish.id,
                    quantity: 1,
                }
                .execute(ctx)
            })
            .unwrap();

        assert!(matches!(
            f.complete(item.id),
            Err(CoreError::StateConflict(_))
        ));
    }

    #[test]
    fn completing_twice_is_a_state_conflict() {
        let f = fixture();
        let (_, items) = f.order_with_two_items_in_progress();
        f.complete(items[0]).unwrap();
        assert!(matches!(
            f.complete(items[0]),
            Err(CoreError::StateConflict(_))
        ));
    }

    #[test]
    fn pending_sibling_blocks_served_transition() {
        let f = fixture();
        let (order_id, items) = f.order_with_two_items_in_progress();

        // Add a third item after submission; it stays Pending
        let dish = f
            .catalog
            .create_dish(DishCreate {
                name: "Boiled Fish".to_string(),
                price: 48.0,
                category: None,
                description: None,
            })
            .unwrap();
        f.run(|ctx| {
            AddItemAction {
                order_id,
                dish_id: dish.id,
                quantity: 1,
            }
            .execute(ctx)
        })
        .unwrap();

        f.complete(items[0]).unwrap();
        let after = f.complete(items[1]).unwrap();
        // Pending third item keeps the order InProgress
        assert_eq!(after.status, OrderStatus::InProgress);
    }
}
