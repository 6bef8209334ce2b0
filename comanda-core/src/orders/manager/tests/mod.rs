//! Cross-operation flow tests for the order lifecycle
//!
//! Fixtures seed the catalog with the standard sample menu so the
//! flows read like real service: dishes, ingredients, and recipes with
//! realistic quantities.

use crate::state::Comanda;
use shared::error::CoreError;
use shared::models::{DiningTableCreate, DishCreate, IngredientCreate, TableStatus};
use shared::order::{ItemStatus, OrderStatus, PaymentMethod};

mod test_boundary;

pub(crate) fn create_test_core() -> Comanda {
    Comanda::open_in_memory().unwrap()
}

/// Ids of the seeded sample menu
pub(crate) struct Menu {
    pub kung_pao: u64,
    pub mapo_tofu: u64,
    pub yu_shiang: u64,
    pub chicken: u64,
    pub pork: u64,
    pub tofu: u64,
    pub green_pepper: u64,
    pub peanuts: u64,
}

pub(crate) fn seed_menu(core: &Comanda) -> Menu {
    let ingredient = |name: &str, stock: f64, threshold: f64| {
        core.inventory
            .create_ingredient(IngredientCreate {
                name: name.to_string(),
                unit: "kg".to_string(),
                stock,
                low_stock_threshold: threshold,
            })
            .unwrap()
            .id
    };
    let chicken = ingredient("Chicken", 50.0, 10.0);
    let pork = ingredient("Pork", 40.0, 5.0);
    let tofu = ingredient("Tofu", 30.0, 5.0);
    let green_pepper = ingredient("Green Pepper", 20.0, 5.0);
    let peanuts = ingredient("Peanuts", 10.0, 2.0);

    let dish = |name: &str, price: f64| {
        core.catalog
            .create_dish(DishCreate {
                name: name.to_string(),
                price,
                category: Some("Sichuan Cuisine".to_string()),
                description: None,
            })
            .unwrap()
            .id
    };
    let kung_pao = dish("Kung Pao Chicken", 38.0);
    let mapo_tofu = dish("Mapo Tofu", 28.0);
    let yu_shiang = dish("Yu-Shiang Shredded Pork", 32.0);

    let recipe = |dish_id: u64, ingredient_id: u64, qty: f64| {
        core.catalog
            .set_recipe_entry(dish_id, ingredient_id, qty)
            .unwrap();
    };
    recipe(kung_pao, chicken, 0.3);
    recipe(kung_pao, green_pepper, 0.1);
    recipe(kung_pao, peanuts, 0.05);
    recipe(mapo_tofu, tofu, 0.25);
    recipe(mapo_tofu, pork, 0.05);
    recipe(yu_shiang, pork, 0.3);
    recipe(yu_shiang, green_pepper, 0.1);

    Menu {
        kung_pao,
        mapo_tofu,
        yu_shiang,
        chicken,
        pork,
        tofu,
        green_pepper,
        peanuts,
    }
}

pub(crate) fn create_table(core: &Comanda, number: &str, capacity: i32) -> u64 {
    core.tables
        .create(DiningTableCreate {
            number: number.to_string(),
            capacity: Some(capacity),
        })
        .unwrap()
        .id
}

/// The occupancy invariant: Occupied iff at least one active order.
pub(crate) fn assert_occupancy_invariant(core: &Comanda, table_id: u64) {
    let table = core.tables.get(table_id).unwrap();
    let active: Vec<_> = core
        .orders
        .list_orders_for_table(table_id, None)
        .unwrap()
        .into_iter()
        .filter(|o| o.status.is_active())
        .collect();
    if table.status == TableStatus::Occupied {
        assert!(
            !active.is_empty(),
            "table {} is Occupied with no active orders",
            table.number
        );
    } else {
        assert!(
            active.is_empty(),
            "table {} is {:?} with {} active orders",
            table.number,
            table.status,
            active.len()
        );
    }
}
