use super::*;

/// The canonical shortfall scenario: a dish needs 0.3 kg of chicken but
/// only 0.1 kg remains by the time the kitchen starts. The start fails
/// with the exact shortfall, the item stays Pending, stock is unchanged.
#[test]
fn preparation_shortfall_reports_missing_chicken() {
    let core = create_test_core();
    let menu = seed_menu(&core);
    let table_id = create_table(&core, "T1", 4);

    let order = core.orders.create_order(table_id, "Operator").unwrap();
    let item = core.orders.add_line_item(order.id, menu.kung_pao, 1).unwrap();
    core.orders.submit_order(order.id).unwrap();

    // Stock drains between submission and preparation
    core.inventory
        .adjust_stock(menu.chicken, 0.1, "Operator", "stocktake correction")
        .unwrap();

    let err = core
        .orders
        .start_preparation(item.id, "Kitchen")
        .unwrap_err();
    match err {
        CoreError::InsufficientStock(shortfalls) => {
            assert_eq!(shortfalls.len(), 1);
            assert_eq!(shortfalls[0].name, "Chicken");
            assert_eq!(shortfalls[0].required, 0.3);
            assert_eq!(shortfalls[0].available, 0.1);
            assert!((shortfalls[0].missing() - 0.2).abs() < 1e-9);
        }
        other => panic!("expected InsufficientStock, got {other:?}"),
    }

    // Item stayed Pending, no stock moved, no Outbound log appeared
    let item_after = core.orders.get_line_item(item.id).unwrap();
    assert_eq!(item_after.status, ItemStatus::Pending);
    assert_eq!(core.inventory.get_ingredient(menu.chicken).unwrap().stock, 0.1);
    assert_eq!(core.inventory.get_ingredient(menu.green_pepper).unwrap().stock, 20.0);
    let outbound = core
        .inventory
        .log_entries(None)
        .unwrap()
        .into_iter()
        .filter(|e| e.change_kind == shared::models::StockChangeKind::Outbound)
        .count();
    assert_eq!(outbound, 0);
}

#[test]
fn submission_is_all_or_nothing_across_dishes() {
    let core = create_test_core();
    let menu = seed_menu(&core);
    let table_id = create_table(&core, "T1", 4);

    let order = core.orders.create_order(table_id, "Operator").unwrap();
    core.orders.add_line_item(order.id, menu.kung_pao, 1).unwrap();
    core.orders.add_line_item(order.id, menu.mapo_tofu, 1).unwrap();

    // Drain tofu so only Mapo Tofu is short
    core.inventory
        .adjust_stock(menu.tofu, 0.1, "Operator", "spoilage")
        .unwrap();

    let err = core.orders.submit_order(order.id).unwrap_err();
    match err {
        CoreError::InsufficientStock(shortfalls) => {
            assert_eq!(shortfalls.len(), 1);
            assert_eq!(shortfalls[0].name, "Tofu");
        }
        other => panic!("expected InsufficientStock, got {other:?}"),
    }

    // Nothing changed: order still Placed, both items Pending
    let stored = core.orders.get_order(order.id).unwrap();
    assert_eq!(stored.status, OrderStatus::Placed);
    assert!(stored.items.iter().all(|i| i.status == ItemStatus::Pending));
}

#[test]
fn table_deletion_is_blocked_by_live_orders() {
    let core = create_test_core();
    let menu = seed_menu(&core);
    let table_id = create_table(&core, "T1", 4);

    let order = core.orders.create_order(table_id, "Operator").unwrap();
    core.orders.add_line_item(order.id, menu.kung_pao, 1).unwrap();

    assert!(matches!(
        core.tables.delete(table_id),
        Err(CoreError::HasActiveDependents(_))
    ));

    core.orders
        .checkout(table_id, PaymentMethod::Cash, Some(38.0))
        .unwrap();
    // Paid orders no longer block deletion
    core.tables.delete(table_id).unwrap();
}

#[test]
fn manual_status_edits_are_blocked_while_occupied() {
    let core = create_test_core();
    let _menu = seed_menu(&core);
    let table_id = create_table(&core, "T1", 4);
    core.orders.create_order(table_id, "Operator").unwrap();

    assert!(matches!(
        core.tables.set_status(table_id, TableStatus::Free),
        Err(CoreError::StateConflict(_))
    ));
}

#[test]
fn failed_cash_checkout_touches_nothing_across_orders() {
    let core = create_test_core();
    let menu = seed_menu(&core);
    let table_id = create_table(&core, "T1", 6);

    let first = core.orders.create_order(table_id, "Operator").unwrap();
    core.orders.add_line_item(first.id, menu.kung_pao, 1).unwrap();
    let second = core.orders.create_order(table_id, "Operator").unwrap();
    core.orders.add_line_item(second.id, menu.yu_shiang, 1).unwrap();

    let err = core
        .orders
        .checkout(table_id, PaymentMethod::Cash, Some(60.0))
        .unwrap_err();
    match err {
        CoreError::InsufficientPayment { required, received } => {
            assert_eq!(required, 70.0);
            assert_eq!(received, 60.0);
        }
        other => panic!("expected InsufficientPayment, got {other:?}"),
    }

    for order_id in [first.id, second.id] {
        let order = core.orders.get_order(order_id).unwrap();
        assert!(order.status.is_active());
        assert!(order.checkout.is_none());
    }
    assert_eq!(
        core.tables.get(table_id).unwrap().status,
        TableStatus::Occupied
    );
}

#[test]
fn order_cannot_serve_while_any_item_is_unfinished() {
    let core = create_test_core();
    let menu = seed_menu(&core);
    let table_id = create_table(&core, "T1", 4);

    let order = core.orders.create_order(table_id, "Operator").unwrap();
    let a = core.orders.add_line_item(order.id, menu.kung_pao, 1).unwrap();
    let b = core.orders.add_line_item(order.id, menu.mapo_tofu, 1).unwrap();
    core.orders.submit_order(order.id).unwrap();

    core.orders.start_preparation(a.id, "Kitchen").unwrap();
    core.orders.start_preparation(b.id, "Kitchen").unwrap();
    core.orders.complete_item(a.id).unwrap();

    // One item still InProgress: the order must not be Served
    let mid = core.orders.get_order(order.id).unwrap();
    assert_eq!(mid.status, OrderStatus::InProgress);

    core.orders.complete_item(b.id).unwrap();
    assert_eq!(core.orders.get_order(order.id).unwrap().status, OrderStatus::Served);
}

#[test]
fn submission_requires_pending_intent() {
    let core = create_test_core();
    let menu = seed_menu(&core);
    let table_id = create_table(&core, "T1", 4);

    // No items at all
    let empty = core.orders.create_order(table_id, "Operator").unwrap();
    assert!(matches!(
        core.orders.submit_order(empty.id),
        Err(CoreError::StateConflict(_))
    ));

    core.orders.add_line_item(empty.id, menu.kung_pao, 1).unwrap();
    core.orders.submit_order(empty.id).unwrap();
}

#[test]
fn checkout_on_unknown_table_is_not_found() {
    let core = create_test_core();
    assert!(matches!(
        core.orders.checkout(404, PaymentMethod::Cash, Some(10.0)),
        Err(CoreError::NotFound(_))
    ));
}
