//! Catalog service: dishes and their recipes
//!
//! Read-mostly. Writes are admin-time CRUD; the order lifecycle only
//! reads pricing and recipe data from here. Dish deletion cascades into
//! the dish's recipe entries; line items freeze name and price at add
//! time, so catalog edits never rewrite history.

use crate::money;
use crate::store::Store;
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text};
use shared::error::{CoreError, CoreResult};
use shared::models::{Dish, DishCreate, DishUpdate, RecipeEntry};

#[derive(Clone)]
pub struct CatalogService {
    store: Store,
}

impl CatalogService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Create a new dish, available by default.
    pub fn create_dish(&self, data: DishCreate) -> CoreResult<Dish> {
        validate_required_text(&data.name, "dish name", MAX_NAME_LEN)?;
        validate_optional_text(&data.category, "category", MAX_NAME_LEN)?;
        validate_optional_text(&data.description, "description", MAX_NOTE_LEN)?;
        money::validate_price(data.price)?;

        let txn = self.store.begin_write()?;
        let dish = {
            let id = self.store.next_dish_id(&txn)?;
            let dish = Dish {
                id,
                name: data.name,
                price: data.price,
                category: data.category,
                description: data.description,
                is_available: true,
            };
            self.store.put_dish(&txn, &dish)?;
            dish
        };
        txn.commit().map_err(crate::store::StorageError::from)?;

        tracing::info!(dish_id = dish.id, name = %dish.name, "dish created");
        Ok(dish)
    }

    /// Update a dish. Price and availability edits apply going forward
    /// only; frozen line-item subtotals are untouched.
    pub fn update_dish(&self, id: u64, data: DishUpdate) -> CoreResult<Dish> {
        if let Some(name) = &data.name {
            validate_required_text(name, "dish name", MAX_NAME_LEN)?;
        }
        validate_optional_text(&data.category, "category", MAX_NAME_LEN)?;
        validate_optional_text(&data.description, "description", MAX_NOTE_LEN)?;
        if let Some(price) = data.price {
            money::validate_price(price)?;
        }

        let txn = self.store.begin_write()?;
        let dish = {
            let mut dish = self
                .store
                .get_dish_txn(&txn, id)?
                .ok_or_else(|| CoreError::not_found(format!("dish {id}")))?;
            if let Some(name) = data.name {
                dish.name = name;
            }
            if let Some(price) = data.price {
                dish.price = price;
            }
            if let Some(category) = data.category {
                dish.category = Some(category);
            }
            if let Some(description) = data.description {
                dish.description = Some(description);
            }
            if let Some(is_available) = data.is_available {
                dish.is_available = is_available;
            }
            self.store.put_dish(&txn, &dish)?;
            dish
        };
        txn.commit().map_err(crate::store::StorageError::from)?;

        tracing::debug!(dish_id = dish.id, "dish updated");
        Ok(dish)
    }

    /// Delete a dish, cascading into its recipe entries.
    pub fn delete_dish(&self, id: u64) -> CoreResult<()> {
        let txn = self.store.begin_write()?;
        {
            if !self.store.delete_dish(&txn, id)? {
                return Err(CoreError::not_found(format!("dish {id}")));
            }
            self.store.remove_recipe_entries_for_dish(&txn, id)?;
        }
        txn.commit().map_err(crate::store::StorageError::from)?;

        tracing::info!(dish_id = id, "dish deleted");
        Ok(())
    }

    pub fn get_dish(&self, id: u64) -> CoreResult<Dish> {
        self.store
            .get_dish(id)?
            .ok_or_else(|| CoreError::not_found(format!("dish {id}")))
    }

    /// All dishes, ordered by name (admin view).
    pub fn list_dishes(&self) -> CoreResult<Vec<Dish>> {
        Ok(self.store.list_dishes()?)
    }

    /// Available dishes only, ordered by name.
    pub fn list_available_dishes(&self) -> CoreResult<Vec<Dish>> {
        let mut dishes = self.store.list_dishes()?;
        dishes.retain(|d| d.is_available);
        Ok(dishes)
    }

    /// Upsert one recipe entry; unique per (dish, ingredient) pair.
    pub fn set_recipe_entry(
        &self,
        dish_id: u64,
        ingredient_id: u64,
        quantity: f64,
    ) -> CoreResult<()> {
        if !quantity.is_finite() || quantity <= 0.0 {
            return Err(CoreError::validation(format!(
                "recipe quantity must be positive, got {quantity}"
            )));
        }

        let txn = self.store.begin_write()?;
        {
            if self.store.get_dish_txn(&txn, dish_id)?.is_none() {
                return Err(CoreError::not_found(format!("dish {dish_id}")));
            }
            if self.store.get_ingredient_txn(&txn, ingredient_id)?.is_none() {
                return Err(CoreError::not_found(format!("ingredient {ingredient_id}")));
            }
            self.store
                .put_recipe_entry(&txn, dish_id, ingredient_id, quantity)?;
        }
        txn.commit().map_err(crate::store::StorageError::from)?;

        tracing::debug!(dish_id, ingredient_id, quantity, "recipe entry set");
        Ok(())
    }

    pub fn remove_recipe_entry(&self, dish_id: u64, ingredient_id: u64) -> CoreResult<()> {
        let txn = self.store.begin_write()?;
        let removed = self.store.remove_recipe_entry(&txn, dish_id, ingredient_id)?;
        if !removed {
            return Err(CoreError::not_found(format!(
                "recipe entry ({dish_id}, {ingredient_id})"
            )));
        }
        txn.commit().map_err(crate::store::StorageError::from)?;
        Ok(())
    }

    /// Recipe of one dish; empty when unconfigured. Fails only when the
    /// dish itself does not exist.
    pub fn get_recipe(&self, dish_id: u64) -> CoreResult<Vec<RecipeEntry>> {
        if self.store.get_dish(dish_id)?.is_none() {
            return Err(CoreError::not_found(format!("dish {dish_id}")));
        }
        Ok(self.store.recipe_for_dish(dish_id)?)
    }
}
