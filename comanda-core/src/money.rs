//! Money and stock arithmetic using rust_decimal for precision
//!
//! All calculations run on `Decimal` internally and convert back to
//! `f64` for storage/serialization: money rounded to 2 decimal places,
//! stock quantities to 3.

use rust_decimal::prelude::*;
use shared::error::{CoreError, CoreResult};
use shared::order::LineItem;

/// Rounding for monetary values (2 decimal places, half-up)
const MONEY_PLACES: u32 = 2;

/// Rounding for stock quantities (kg, bags, ...)
const STOCK_PLACES: u32 = 3;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Maximum allowed dish price
pub const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line item
pub const MAX_QUANTITY: i32 = 9999;
/// Maximum allowed payment amount
pub const MAX_PAYMENT_AMOUNT: f64 = 1_000_000.0;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(MONEY_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Convert a stock Decimal back to f64, rounded to 3 decimal places
#[inline]
pub fn stock_to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(STOCK_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Frozen subtotal of one line: `unit_price * quantity`
pub fn line_subtotal(unit_price: f64, quantity: i32) -> f64 {
    to_f64(to_decimal(unit_price) * Decimal::from(quantity))
}

/// Recompute an order total as the sum of its items' frozen subtotals
pub fn order_total(items: &[LineItem]) -> f64 {
    let total: Decimal = items.iter().map(|i| to_decimal(i.subtotal)).sum();
    to_f64(total)
}

/// Ingredient demand for `quantity` servings of a dish
pub fn required_stock(per_unit: f64, quantity: i32) -> Decimal {
    to_decimal(per_unit) * Decimal::from(quantity)
}

/// Check if payment covers the required total (0.01 tolerance)
pub fn is_payment_sufficient(received: f64, required: f64) -> bool {
    to_decimal(received) >= to_decimal(required) - MONEY_TOLERANCE
}

/// Change due for a cash payment; caller has already checked sufficiency
pub fn change_due(received: f64, required: f64) -> f64 {
    to_f64((to_decimal(received) - to_decimal(required)).max(Decimal::ZERO))
}

/// Compare two monetary values for equality (within 0.01 tolerance)
pub fn money_eq(a: f64, b: f64) -> bool {
    (to_decimal(a) - to_decimal(b)).abs() < MONEY_TOLERANCE
}

#[inline]
fn require_finite(value: f64, field: &str) -> CoreResult<()> {
    if !value.is_finite() {
        return Err(CoreError::validation(format!(
            "{} must be a finite number, got {}",
            field, value
        )));
    }
    Ok(())
}

/// Validate a dish price
pub fn validate_price(price: f64) -> CoreResult<()> {
    require_finite(price, "price")?;
    if price < 0.0 {
        return Err(CoreError::validation(format!(
            "price must be non-negative, got {}",
            price
        )));
    }
    if price > MAX_PRICE {
        return Err(CoreError::validation(format!(
            "price exceeds maximum allowed ({}), got {}",
            MAX_PRICE, price
        )));
    }
    Ok(())
}

/// Validate a line-item quantity
pub fn validate_quantity(quantity: i32) -> CoreResult<()> {
    if quantity <= 0 {
        return Err(CoreError::validation(format!(
            "quantity must be positive, got {}",
            quantity
        )));
    }
    if quantity > MAX_QUANTITY {
        return Err(CoreError::validation(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, quantity
        )));
    }
    Ok(())
}

/// Validate a payment amount
pub fn validate_payment_amount(amount: f64) -> CoreResult<()> {
    require_finite(amount, "payment amount")?;
    if amount < 0.0 {
        return Err(CoreError::validation(format!(
            "payment amount must be non-negative, got {}",
            amount
        )));
    }
    if amount > MAX_PAYMENT_AMOUNT {
        return Err(CoreError::validation(format!(
            "payment amount exceeds maximum allowed ({}), got {}",
            MAX_PAYMENT_AMOUNT, amount
        )));
    }
    Ok(())
}

/// Validate a stock quantity (initial stock, threshold, inbound delta)
pub fn validate_stock_value(value: f64, field: &str) -> CoreResult<()> {
    require_finite(value, field)?;
    if value < 0.0 {
        return Err(CoreError::validation(format!(
            "{} must be non-negative, got {}",
            field, value
        )));
    }
    Ok(())
}
