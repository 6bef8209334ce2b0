//! Checkout command handler
//!
//! Settles every active order of a table in one transaction: all
//! orders are stamped Paid with checkout metadata, the table goes back
//! to Free, and a settlement record is appended for receipt rendering.
//! Cash must cover the total; electronic methods settle at exactly the
//! total with zero change.

use crate::money;
use crate::orders::context::TxnContext;
use rust_decimal::Decimal;
use shared::error::{CoreError, CoreResult};
use shared::models::TableStatus;
use shared::order::{CheckoutInfo, OrderStatus, PaymentMethod, Settlement, SettlementLine};

/// Checkout action
#[derive(Debug, Clone)]
pub struct CheckoutAction {
    pub table_id: u64,
    pub payment_method: PaymentMethod,
    /// Tendered amount; required for cash, ignored for electronic
    /// methods which settle at exactly the total
    pub received_amount: Option<f64>,
}

impl CheckoutAction {
    pub fn execute(&self, ctx: &TxnContext<'_>) -> CoreResult<Settlement> {
        let mut table = ctx.load_table(self.table_id)?;

        let order_ids = ctx
            .store()
            .active_orders_for_table_txn(ctx.txn(), self.table_id)?;
        if order_ids.is_empty() {
            return Err(CoreError::NoActiveOrders(self.table_id));
        }

        let mut orders = Vec::with_capacity(order_ids.len());
        for order_id in &order_ids {
            orders.push(ctx.load_order(*order_id)?);
        }

        let total: Decimal = orders
            .iter()
            .map(|o| money::to_decimal(o.total_amount))
            .sum();
        let total = money::to_f64(total);
        if total <= 0.0 {
            return Err(CoreError::ZeroBalance);
        }

        let (received, change) = if self.payment_method.is_cash() {
            let received = self.received_amount.ok_or_else(|| {
                CoreError::validation("received amount is required for cash payment")
            })?;
            money::validate_payment_amount(received)?;
            if !money::is_payment_sufficient(received, total) {
                return Err(CoreError::InsufficientPayment {
                    required: total,
                    received,
                });
            }
            (received, money::change_due(received, total))
        } else {
            // Full payment assumed on operator confirmation
            (total, 0.0)
        };

        let settled_at = chrono::Utc::now().timestamp_millis();
        let checkout = CheckoutInfo {
            time: settled_at,
            payment_method: self.payment_method,
            received_amount: received,
            change_amount: change,
        };

        let mut lines = Vec::new();
        for order in &mut orders {
            for item in &order.items {
                ctx.store().remove_line_item_index(ctx.txn(), item.id)?;
                lines.push(SettlementLine {
                    order_id: order.id,
                    dish_name: item.dish_name.clone(),
                    unit_price: item.unit_price,
                    quantity: item.quantity,
                    subtotal: item.subtotal,
                });
            }
            order.status = OrderStatus::Paid;
            order.checkout = Some(checkout);
            ctx.store_order(order)?;
            ctx.store().remove_active_order(ctx.txn(), order.id)?;
        }

        table.status = TableStatus::Free;
        ctx.store_table(&table)?;

        let settlement_id = ctx.store().next_settlement_id(ctx.txn())?;
        let settlement = Settlement {
            id: settlement_id,
            table_id: table.id,
            table_number: table.number.clone(),
            order_ids,
            lines,
            total_amount: total,
            payment_method: self.payment_method,
            received_amount: received,
            change_amount: change,
            settled_at,
        };
        ctx.store().put_settlement(ctx.txn(), &settlement)?;

        tracing::info!(
            table_id = table.id,
            orders = settlement.order_ids.len(),
            total,
            method = ?self.payment_method,
            "table settled"
        );
        Ok(settlement)
    }
}
