use super::*;
use crate::tabs::reducer;

/// 2×A ($50) + 1×B ($30), 10% discount → $117.00 paid in cash
#[test]
fn test_discounted_tab_paid_cash() {
    let manager = create_test_manager();
    let tab_id = open_discounted_tab(&manager, "T4");

    let response = manager.execute_command(cmd(TabCommandPayload::PayTab {
        tab_id: tab_id.clone(),
        tender: single("EFECTIVO"),
    }));
    assert!(response.success);

    let snapshot = manager.get_snapshot(TENANT, &tab_id).unwrap().unwrap();
    let sale = manager
        .storage()
        .get_sale(&snapshot.sale_ids[0])
        .unwrap()
        .unwrap();
    assert_eq!(sale.total, 117.0);
    assert_eq!(sale.discount, 13.0);
    assert_eq!(sale.payments.len(), 1);
    assert_eq!(sale.payments[0].method, "EFECTIVO");
    assert_eq!(sale.payments[0].amount, 117.0);
}

/// Mixed payment $70 cash + $47 card covers $117 exactly; $70 + $40 does not
#[test]
fn test_mixed_payment_conservation() {
    let manager = create_test_manager();
    let tab_id = open_discounted_tab(&manager, "T4");

    let response = manager.execute_command(cmd(TabCommandPayload::PayTab {
        tab_id: tab_id.clone(),
        tender: mixed(&[("EFECTIVO", 70.0), ("TARJETA", 40.0)]),
    }));
    assert!(!response.success);
    assert_eq!(
        response.error.unwrap().code,
        CommandErrorCode::MixedPaymentMismatch
    );

    let response = manager.execute_command(cmd(TabCommandPayload::PayTab {
        tab_id: tab_id.clone(),
        tender: mixed(&[("EFECTIVO", 70.0), ("TARJETA", 47.0)]),
    }));
    assert!(response.success);

    let snapshot = manager.get_snapshot(TENANT, &tab_id).unwrap().unwrap();
    let sale = manager
        .storage()
        .get_sale(&snapshot.sale_ids[0])
        .unwrap()
        .unwrap();
    assert_eq!(sale.payment_type, PaymentType::Mixed);
    let component_sum: f64 = sale.payments.iter().map(|p| p.amount).sum();
    assert_eq!(component_sum, sale.total);
}

/// Full split lifecycle: configure, pay both groups, tab completes
#[test]
fn test_split_settlement_lifecycle() {
    let manager = create_test_manager();
    let tab_id = open_discounted_tab(&manager, "T4");

    // Group 0: 2×A (90 after discount share), group 1: 1×B (27)
    let response = manager.execute_command(cmd(TabCommandPayload::ConfigureSplit {
        tab_id: tab_id.clone(),
        groups: vec![
            SettlementGroupInput {
                claims: vec![ItemClaim {
                    order_idx: 0,
                    item_idx: 0,
                    quantity: 2,
                }],
                subtotal: 100.0,
                tip: 0.0,
                total: 90.0,
            },
            SettlementGroupInput {
                claims: vec![ItemClaim {
                    order_idx: 0,
                    item_idx: 1,
                    quantity: 1,
                }],
                subtotal: 30.0,
                tip: 0.0,
                total: 27.0,
            },
        ],
    }));
    assert!(response.success, "{:?}", response.error);

    let snapshot = manager.get_snapshot(TENANT, &tab_id).unwrap().unwrap();
    assert_eq!(snapshot.status, TabStatus::SplitPending);
    assert!(snapshot.is_split);

    // Whole-tab payment is now locked out
    let response = manager.execute_command(cmd(TabCommandPayload::PayTab {
        tab_id: tab_id.clone(),
        tender: single("EFECTIVO"),
    }));
    assert!(!response.success);
    assert_eq!(response.error.unwrap().code, CommandErrorCode::TabIsSplit);

    // First payer settles with card
    let response = manager.execute_command(cmd(TabCommandPayload::PaySettlement {
        tab_id: tab_id.clone(),
        group_index: 0,
        tender: single("TARJETA"),
    }));
    assert!(response.success);

    let snapshot = manager.get_snapshot(TENANT, &tab_id).unwrap().unwrap();
    assert_eq!(snapshot.status, TabStatus::SplitPending);
    assert_eq!(
        snapshot.settlements[0].status,
        SettlementStatus::Paid
    );

    // Second payer settles mixed; tab completes and the table frees up
    let response = manager.execute_command(cmd(TabCommandPayload::PaySettlement {
        tab_id: tab_id.clone(),
        group_index: 1,
        tender: mixed(&[("EFECTIVO", 20.0), ("TARJETA", 7.0)]),
    }));
    assert!(response.success);

    let snapshot = manager.get_snapshot(TENANT, &tab_id).unwrap().unwrap();
    assert_eq!(snapshot.status, TabStatus::Paid);
    assert_eq!(snapshot.sale_ids.len(), 2);

    // One sale per settlement, conserving the tab total
    let total: f64 = snapshot
        .sale_ids
        .iter()
        .map(|id| manager.storage().get_sale(id).unwrap().unwrap().total)
        .sum();
    assert_eq!(total, 117.0);

    assert!(manager.execute_command(open_table_cmd("T4")).success);
}

/// A split that does not cover the tab exactly is rejected with the rule
#[test]
fn test_split_must_cover_tab_exactly_once() {
    let manager = create_test_manager();
    let tab_id = open_discounted_tab(&manager, "T4");

    // $117 not fully covered: group totals sum to 100
    let response = manager.execute_command(cmd(TabCommandPayload::ConfigureSplit {
        tab_id: tab_id.clone(),
        groups: vec![
            SettlementGroupInput {
                claims: vec![ItemClaim {
                    order_idx: 0,
                    item_idx: 0,
                    quantity: 2,
                }],
                subtotal: 100.0,
                tip: 0.0,
                total: 73.0,
            },
            SettlementGroupInput {
                claims: vec![ItemClaim {
                    order_idx: 0,
                    item_idx: 1,
                    quantity: 1,
                }],
                subtotal: 30.0,
                tip: 0.0,
                total: 27.0,
            },
        ],
    }));
    assert!(!response.success);
    assert_eq!(
        response.error.unwrap().code,
        CommandErrorCode::SplitTotalMismatch
    );

    // Failed configuration leaves the tab unchanged
    let snapshot = manager.get_snapshot(TENANT, &tab_id).unwrap().unwrap();
    assert_eq!(snapshot.status, TabStatus::Open);
    assert!(!snapshot.is_split);
    assert!(snapshot.settlements.is_empty());
}

/// Tips: percentage against subtotal, paid out through the sale record
#[test]
fn test_tip_flow() {
    let manager = create_test_manager();
    let tab_id = open_tab(&manager, "T1");
    manager.execute_command(add_order_cmd(&tab_id, vec![order_item("pA", 2)]));

    let response = manager.execute_command(cmd(TabCommandPayload::ApplyTip {
        tab_id: tab_id.clone(),
        kind: TipKind::Percentage,
        value: 10.0,
    }));
    assert!(response.success);

    let snapshot = manager.get_snapshot(TENANT, &tab_id).unwrap().unwrap();
    assert_eq!(snapshot.tip.amount, 10.0);
    assert_eq!(snapshot.total, 110.0);

    manager.execute_command(cmd(TabCommandPayload::PayTab {
        tab_id: tab_id.clone(),
        tender: single("TARJETA"),
    }));
    let snapshot = manager.get_snapshot(TENANT, &tab_id).unwrap().unwrap();
    let sale = manager
        .storage()
        .get_sale(&snapshot.sale_ids[0])
        .unwrap()
        .unwrap();
    assert_eq!(sale.tip, 10.0);
    assert_eq!(sale.total, 110.0);
}

/// Replaying the event stream reproduces the live snapshot exactly
#[test]
fn test_replay_matches_live_snapshot() {
    let manager = create_test_manager();
    let tab_id = open_discounted_tab(&manager, "T4");
    manager.execute_command(cmd(TabCommandPayload::UpdateItemStatus {
        tab_id: tab_id.clone(),
        order_idx: 0,
        item_idx: 0,
        status: ItemStatus::Preparing,
    }));
    manager.execute_command(cmd(TabCommandPayload::PayTab {
        tab_id: tab_id.clone(),
        tender: single("EFECTIVO"),
    }));

    assert!(reducer::verify_snapshot(manager.storage(), &tab_id).unwrap());

    let stored = manager.get_snapshot(TENANT, &tab_id).unwrap().unwrap();
    let replayed = reducer::rebuild_snapshot(manager.storage(), &tab_id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.total, replayed.total);
    assert_eq!(stored.status, replayed.status);
    assert_eq!(stored.state_checksum, replayed.state_checksum);
}
