//! Inventory ledger: ingredient stock plus its append-only change log
//!
//! Stock is mutated exclusively here, and every change appends one
//! audit entry (kind, delta, old stock, new stock, reason, actor).
//!
//! The sufficiency check and the deduction it gates share one write
//! transaction: two concurrent preparation starts on dishes sharing an
//! ingredient cannot both pass the check against the same stale
//! snapshot, because redb serializes writers and each deduction
//! re-reads current stock inside its own transaction.

use crate::money;
use crate::store::{StorageError, Store};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_required_text,
};
use parking_lot::Mutex;
use redb::WriteTransaction;
use rust_decimal::Decimal;
use shared::error::{CoreError, CoreResult, StockShortfall};
use shared::models::{Ingredient, IngredientCreate, InventoryLogEntry, StockChangeKind};
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Clone)]
pub struct InventoryLedger {
    store: Store,
    /// Ingredients already warned about since last crossing back above
    /// their threshold, so the low-stock warning fires once per episode.
    low_warned: Arc<Mutex<HashSet<u64>>>,
}

impl InventoryLedger {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            low_warned: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    // ========== Ingredient CRUD ==========

    pub fn create_ingredient(&self, data: IngredientCreate) -> CoreResult<Ingredient> {
        validate_required_text(&data.name, "ingredient name", MAX_NAME_LEN)?;
        validate_required_text(&data.unit, "unit", MAX_SHORT_TEXT_LEN)?;
        money::validate_stock_value(data.stock, "stock")?;
        money::validate_stock_value(data.low_stock_threshold, "low stock threshold")?;

        let txn = self.store.begin_write()?;
        let ingredient = {
            let id = self.store.next_ingredient_id(&txn)?;
            let ingredient = Ingredient {
                id,
                name: data.name,
                unit: data.unit,
                stock: data.stock,
                low_stock_threshold: data.low_stock_threshold,
            };
            self.store.put_ingredient(&txn, &ingredient)?;
            ingredient
        };
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(ingredient_id = ingredient.id, name = %ingredient.name, "ingredient created");
        Ok(ingredient)
    }

    /// Delete an ingredient, cascading into recipe entries that
    /// reference it.
    pub fn delete_ingredient(&self, id: u64) -> CoreResult<()> {
        let txn = self.store.begin_write()?;
        {
            if !self.store.delete_ingredient(&txn, id)? {
                return Err(CoreError::not_found(format!("ingredient {id}")));
            }
            self.store.remove_recipe_entries_for_ingredient(&txn, id)?;
        }
        txn.commit().map_err(StorageError::from)?;

        self.low_warned.lock().remove(&id);
        tracing::info!(ingredient_id = id, "ingredient deleted");
        Ok(())
    }

    pub fn get_ingredient(&self, id: u64) -> CoreResult<Ingredient> {
        self.store
            .get_ingredient(id)?
            .ok_or_else(|| CoreError::not_found(format!("ingredient {id}")))
    }

    pub fn list_ingredients(&self) -> CoreResult<Vec<Ingredient>> {
        Ok(self.store.list_ingredients()?)
    }

    /// Ingredients at or below their restock threshold.
    pub fn low_stock(&self) -> CoreResult<Vec<Ingredient>> {
        let mut ingredients = self.store.list_ingredients()?;
        ingredients.retain(|i| i.is_low());
        Ok(ingredients)
    }

    // ========== Sufficiency & Deduction ==========

    /// Read-only sufficiency check: does current stock cover `quantity`
    /// servings of the dish? Reports every short ingredient, never just
    /// the first.
    pub fn check_sufficiency(&self, dish_id: u64, quantity: i32) -> CoreResult<()> {
        money::validate_quantity(quantity)?;
        // A write transaction gives the same snapshot a deduction would
        // see; it is dropped without commit.
        let txn = self.store.begin_write()?;
        self.check_sufficiency_txn(&txn, dish_id, quantity)?;
        Ok(())
    }

    /// Transaction-scoped sufficiency check used by `deduct` and by the
    /// order manager at submission time.
    pub(crate) fn check_sufficiency_txn(
        &self,
        txn: &WriteTransaction,
        dish_id: u64,
        quantity: i32,
    ) -> CoreResult<Vec<(Ingredient, Decimal)>> {
        let dish = self
            .store
            .get_dish_txn(txn, dish_id)?
            .ok_or_else(|| CoreError::not_found(format!("dish {dish_id}")))?;
        let recipe = self.store.recipe_for_dish_txn(txn, dish_id)?;
        if recipe.is_empty() {
            return Err(CoreError::UnconfiguredRecipe(dish.name));
        }

        let mut shortfalls = Vec::new();
        let mut plan = Vec::with_capacity(recipe.len());
        for entry in &recipe {
            let ingredient = self
                .store
                .get_ingredient_txn(txn, entry.ingredient_id)?
                .ok_or_else(|| {
                    CoreError::not_found(format!("ingredient {}", entry.ingredient_id))
                })?;
            let required = money::required_stock(entry.quantity, quantity);
            if money::to_decimal(ingredient.stock) < required {
                shortfalls.push(StockShortfall {
                    ingredient_id: ingredient.id,
                    name: ingredient.name.clone(),
                    required: money::stock_to_f64(required),
                    available: ingredient.stock,
                    unit: ingredient.unit.clone(),
                });
            } else {
                plan.push((ingredient, required));
            }
        }

        if !shortfalls.is_empty() {
            return Err(CoreError::InsufficientStock(shortfalls));
        }
        Ok(plan)
    }

    /// Atomically deduct the recipe demand for `quantity` servings of a
    /// dish: re-validates sufficiency, decrements every ingredient, and
    /// appends one Outbound log entry per ingredient, all or nothing.
    pub fn deduct(&self, dish_id: u64, quantity: i32, actor: &str, reason: &str) -> CoreResult<()> {
        money::validate_quantity(quantity)?;
        let txn = self.store.begin_write()?;
        self.deduct_txn(&txn, dish_id, quantity, actor, reason)?;
        txn.commit().map_err(StorageError::from)?;
        Ok(())
    }

    /// Transaction-scoped deduction so callers can commit the stock
    /// change together with their own writes.
    pub(crate) fn deduct_txn(
        &self,
        txn: &WriteTransaction,
        dish_id: u64,
        quantity: i32,
        actor: &str,
        reason: &str,
    ) -> CoreResult<()> {
        let plan = self.check_sufficiency_txn(txn, dish_id, quantity)?;
        let now = chrono::Utc::now().timestamp_millis();

        for (mut ingredient, required) in plan {
            let old_stock = ingredient.stock;
            ingredient.stock = money::stock_to_f64(money::to_decimal(old_stock) - required);
            self.store.put_ingredient(txn, &ingredient)?;

            let log_id = self.store.next_log_id(txn)?;
            self.store.append_log(
                txn,
                &InventoryLogEntry {
                    id: log_id,
                    ingredient_id: ingredient.id,
                    change_kind: StockChangeKind::Outbound,
                    quantity: money::stock_to_f64(required),
                    old_stock,
                    new_stock: ingredient.stock,
                    reason: reason.to_string(),
                    created_by: actor.to_string(),
                    created_at: now,
                },
            )?;
            self.note_stock_level(&ingredient);
        }

        tracing::debug!(dish_id, quantity, "stock deducted");
        Ok(())
    }

    // ========== Manual Stock Changes ==========

    /// Set an ingredient's stock to an absolute value (stocktake
    /// correction). Negative targets are rejected; the change is logged
    /// as an Adjustment.
    pub fn adjust_stock(
        &self,
        ingredient_id: u64,
        new_value: f64,
        actor: &str,
        reason: &str,
    ) -> CoreResult<Ingredient> {
        if !new_value.is_finite() || new_value < 0.0 {
            return Err(CoreError::validation(format!(
                "stock cannot be negative, got {new_value}"
            )));
        }
        validate_required_text(actor, "actor", MAX_SHORT_TEXT_LEN)?;
        validate_required_text(reason, "reason", MAX_NOTE_LEN)?;

        let txn = self.store.begin_write()?;
        let ingredient = {
            let mut ingredient = self
                .store
                .get_ingredient_txn(&txn, ingredient_id)?
                .ok_or_else(|| CoreError::not_found(format!("ingredient {ingredient_id}")))?;
            let old_stock = ingredient.stock;
            ingredient.stock = new_value;
            self.store.put_ingredient(&txn, &ingredient)?;

            let log_id = self.store.next_log_id(&txn)?;
            self.store.append_log(
                &txn,
                &InventoryLogEntry {
                    id: log_id,
                    ingredient_id,
                    change_kind: StockChangeKind::Adjustment,
                    quantity: money::stock_to_f64(
                        (money::to_decimal(new_value) - money::to_decimal(old_stock)).abs(),
                    ),
                    old_stock,
                    new_stock: new_value,
                    reason: reason.to_string(),
                    created_by: actor.to_string(),
                    created_at: chrono::Utc::now().timestamp_millis(),
                },
            )?;
            ingredient
        };
        txn.commit().map_err(StorageError::from)?;

        self.note_stock_level(&ingredient);
        tracing::info!(ingredient_id, new_value, "stock adjusted");
        Ok(ingredient)
    }

    /// Receive a delivery: add `delta` to stock and log it Inbound.
    pub fn receive_stock(
        &self,
        ingredient_id: u64,
        delta: f64,
        actor: &str,
        reason: &str,
    ) -> CoreResult<Ingredient> {
        if !delta.is_finite() || delta <= 0.0 {
            return Err(CoreError::validation(format!(
                "inbound quantity must be positive, got {delta}"
            )));
        }

        let txn = self.store.begin_write()?;
        let ingredient = {
            let mut ingredient = self
                .store
                .get_ingredient_txn(&txn, ingredient_id)?
                .ok_or_else(|| CoreError::not_found(format!("ingredient {ingredient_id}")))?;
            let old_stock = ingredient.stock;
            ingredient.stock =
                money::stock_to_f64(money::to_decimal(old_stock) + money::to_decimal(delta));
            self.store.put_ingredient(&txn, &ingredient)?;

            let log_id = self.store.next_log_id(&txn)?;
            self.store.append_log(
                &txn,
                &InventoryLogEntry {
                    id: log_id,
                    ingredient_id,
                    change_kind: StockChangeKind::Inbound,
                    quantity: delta,
                    old_stock,
                    new_stock: ingredient.stock,
                    reason: reason.to_string(),
                    created_by: actor.to_string(),
                    created_at: chrono::Utc::now().timestamp_millis(),
                },
            )?;
            ingredient
        };
        txn.commit().map_err(StorageError::from)?;

        self.note_stock_level(&ingredient);
        tracing::info!(ingredient_id, delta, "stock received");
        Ok(ingredient)
    }

    /// Audit log, newest first, optionally filtered to one ingredient.
    pub fn log_entries(&self, ingredient_id: Option<u64>) -> CoreResult<Vec<InventoryLogEntry>> {
        Ok(self.store.list_log_entries(ingredient_id)?)
    }

    /// Warn once per low-stock episode; reset once stock recovers.
    fn note_stock_level(&self, ingredient: &Ingredient) {
        let mut warned = self.low_warned.lock();
        if ingredient.is_low() {
            if warned.insert(ingredient.id) {
                tracing::warn!(
                    ingredient_id = ingredient.id,
                    name = %ingredient.name,
                    stock = ingredient.stock,
                    threshold = ingredient.low_stock_threshold,
                    "ingredient needs restocking"
                );
            }
        } else {
            warned.remove(&ingredient.id);
        }
    }
}
