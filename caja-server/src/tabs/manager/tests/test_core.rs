use super::*;

#[test]
fn test_open_tab() {
    let manager = create_test_manager();

    let response = manager.execute_command(open_table_cmd("T1"));

    assert!(response.success);
    let tab_id = response.tab_id.unwrap();

    let snapshot = manager.get_snapshot(TENANT, &tab_id).unwrap().unwrap();
    assert_eq!(snapshot.status, TabStatus::Open);
    assert_eq!(snapshot.folio, 1);
    assert_eq!(snapshot.shift_id, "shift-1");
    assert_eq!(snapshot.tables[0].table_id, "T1");
    assert_eq!(snapshot.status_history.len(), 1);
}

#[test]
fn test_idempotency() {
    let manager = create_test_manager();
    let open_cmd = open_table_cmd("T1");

    let response1 = manager.execute_command(open_cmd.clone());
    assert!(response1.success);

    // Execute the same command again
    let response2 = manager.execute_command(open_cmd);
    assert!(response2.success);
    assert_eq!(response2.tab_id, None); // Duplicate returns no tab_id

    // Still only one tab, one folio consumed
    let tabs = manager.get_active_tabs(TENANT).unwrap();
    assert_eq!(tabs.len(), 1);
    assert_eq!(manager.storage().current_folio(TENANT).unwrap(), 1);
}

#[test]
fn test_add_order_recomputes_totals() {
    let manager = create_test_manager();
    let tab_id = open_tab(&manager, "T1");

    let response = manager.execute_command(add_order_cmd(
        &tab_id,
        vec![order_item("pA", 2), order_item("cafe", 1)],
    ));
    assert!(response.success);

    let snapshot = manager.get_snapshot(TENANT, &tab_id).unwrap().unwrap();
    assert_eq!(snapshot.orders.len(), 1);
    assert_eq!(snapshot.orders[0].items.len(), 2);
    assert_eq!(snapshot.subtotal, 102.5);
    assert_eq!(snapshot.total, 102.5);
    // Captured price, not a live catalog reference
    assert_eq!(snapshot.orders[0].items[0].unit_price, 50.0);
}

#[test]
fn test_price_captured_at_order_time() {
    let manager = create_test_manager();
    let tab_id = open_tab(&manager, "T1");

    manager.execute_command(add_order_cmd(&tab_id, vec![order_item("pA", 1)]));

    // Catalog price changes after the order
    manager.catalog.upsert(shared::models::ProductUpsert {
        product_id: "pA".to_string(),
        name: "Item A".to_string(),
        price: 99.0,
        category_name: Some("Platos".to_string()),
        is_active: true,
    });
    manager.execute_command(add_order_cmd(&tab_id, vec![order_item("pA", 1)]));

    let snapshot = manager.get_snapshot(TENANT, &tab_id).unwrap().unwrap();
    assert_eq!(snapshot.orders[0].items[0].unit_price, 50.0);
    assert_eq!(snapshot.orders[1].items[0].unit_price, 99.0);
    assert_eq!(snapshot.subtotal, 149.0);
}

#[test]
fn test_item_status_progression() {
    let manager = create_test_manager();
    let tab_id = open_tab(&manager, "T1");
    manager.execute_command(add_order_cmd(&tab_id, vec![order_item("cafe", 1)]));

    for status in [ItemStatus::Preparing, ItemStatus::Ready, ItemStatus::Served] {
        let response = manager.execute_command(cmd(TabCommandPayload::UpdateItemStatus {
            tab_id: tab_id.clone(),
            order_idx: 0,
            item_idx: 0,
            status,
        }));
        assert!(response.success, "transition to {:?} failed", status);
    }

    let snapshot = manager.get_snapshot(TENANT, &tab_id).unwrap().unwrap();
    let item = snapshot.item_at(0, 0).unwrap();
    assert_eq!(item.status, ItemStatus::Served);
    assert_eq!(item.status_log.len(), 3);
}

#[test]
fn test_cancelled_item_leaves_subtotal() {
    let manager = create_test_manager();
    let tab_id = open_tab(&manager, "T1");
    manager.execute_command(add_order_cmd(
        &tab_id,
        vec![order_item("pA", 1), order_item("pB", 1)],
    ));

    let response = manager.execute_command(cmd(TabCommandPayload::UpdateItemStatus {
        tab_id: tab_id.clone(),
        order_idx: 0,
        item_idx: 1,
        status: ItemStatus::Cancelled,
    }));
    assert!(response.success);

    let snapshot = manager.get_snapshot(TENANT, &tab_id).unwrap().unwrap();
    assert_eq!(snapshot.subtotal, 50.0);
    assert_eq!(snapshot.total, 50.0);
}

#[test]
fn test_close_then_pay() {
    let manager = create_test_manager();
    let tab_id = open_tab(&manager, "T1");
    manager.execute_command(add_order_cmd(&tab_id, vec![order_item("pB", 1)]));

    let response = manager.execute_command(cmd(TabCommandPayload::CloseTab {
        tab_id: tab_id.clone(),
    }));
    assert!(response.success);

    let snapshot = manager.get_snapshot(TENANT, &tab_id).unwrap().unwrap();
    assert_eq!(snapshot.status, TabStatus::ClosedPending);

    // Ordering is rejected once the check is out
    let response = manager.execute_command(add_order_cmd(&tab_id, vec![order_item("cafe", 1)]));
    assert!(!response.success);
    assert_eq!(
        response.error.unwrap().code,
        CommandErrorCode::TabNotOpen
    );

    let response = manager.execute_command(cmd(TabCommandPayload::PayTab {
        tab_id: tab_id.clone(),
        tender: single("EFECTIVO"),
    }));
    assert!(response.success);

    let snapshot = manager.get_snapshot(TENANT, &tab_id).unwrap().unwrap();
    assert_eq!(snapshot.status, TabStatus::Paid);
    assert_eq!(snapshot.sale_ids.len(), 1);
}

#[test]
fn test_pay_persists_sale_and_releases_table() {
    let manager = create_test_manager();
    let tab_id = open_tab(&manager, "T4");
    manager.execute_command(add_order_cmd(&tab_id, vec![order_item("pA", 1)]));

    let response = manager.execute_command(cmd(TabCommandPayload::PayTab {
        tab_id: tab_id.clone(),
        tender: single("EFECTIVO"),
    }));
    assert!(response.success);

    let snapshot = manager.get_snapshot(TENANT, &tab_id).unwrap().unwrap();
    let sale_id = &snapshot.sale_ids[0];
    let sale = manager.storage().get_sale(sale_id).unwrap().unwrap();
    assert_eq!(sale.total, 50.0);
    assert_eq!(sale.tab_id, tab_id);
    assert_eq!(sale.folio, snapshot.folio);

    // Table is free again
    assert!(manager.get_active_tabs(TENANT).unwrap().is_empty());
    let response = manager.execute_command(open_table_cmd("T4"));
    assert!(response.success);
}

#[test]
fn test_cancel_releases_table_and_records_reason() {
    let manager = create_test_manager();
    let tab_id = open_tab(&manager, "T2");

    let response = manager.execute_command(cmd(TabCommandPayload::CancelTab {
        tab_id: tab_id.clone(),
        reason: Some("guests left".to_string()),
    }));
    assert!(response.success);

    let snapshot = manager.get_snapshot(TENANT, &tab_id).unwrap().unwrap();
    assert_eq!(snapshot.status, TabStatus::Cancelled);
    assert_eq!(
        snapshot.status_history.last().unwrap().reason.as_deref(),
        Some("guests left")
    );

    // Table is free for the next party
    assert!(manager.execute_command(open_table_cmd("T2")).success);
}

#[test]
fn test_event_stream_is_the_audit_trail() {
    let manager = create_test_manager();
    let tab_id = open_tab(&manager, "T1");
    manager.execute_command(add_order_cmd(&tab_id, vec![order_item("pB", 1)]));
    manager.execute_command(cmd(TabCommandPayload::PayTab {
        tab_id: tab_id.clone(),
        tender: single("TARJETA"),
    }));

    let events = manager.get_events(TENANT, &tab_id).unwrap();
    let types: Vec<_> = events.iter().map(|e| e.event_type.clone()).collect();
    assert_eq!(
        types,
        vec![
            shared::tab::TabEventType::TabOpened,
            shared::tab::TabEventType::OrderAdded,
            shared::tab::TabEventType::TabClosed,
            shared::tab::TabEventType::TabPaid,
        ]
    );
    // Sequences strictly increase
    assert!(events.windows(2).all(|w| w[0].sequence < w[1].sequence));
}
