//! Manager-level flow tests against an in-memory database

use std::sync::Arc;

use super::*;
use crate::catalog::CatalogService;
use crate::tabs::storage::TabStorage;
use shared::models::{ProductUpsert, Shift, ShiftStatus};
use shared::tab::types::*;
use shared::tab::{TabCommand, TabCommandPayload, TabStatus};

mod test_core;
mod test_flows;

const TENANT: &str = "tenant-1";
const STORE: &str = "store-1";

fn seed_catalog(catalog: &CatalogService) {
    for (id, name, price, category) in [
        ("pA", "Item A", 50.0, "Platos"),
        ("pB", "Item B", 30.0, "Bebidas"),
        ("cafe", "Café solo", 2.5, "Bebidas"),
    ] {
        catalog.upsert(ProductUpsert {
            product_id: id.to_string(),
            name: name.to_string(),
            price,
            category_name: Some(category.to_string()),
            is_active: true,
        });
    }
}

fn open_shift(storage: &TabStorage) {
    let now = shared::util::now_millis();
    storage
        .try_open_shift(&Shift {
            shift_id: "shift-1".to_string(),
            tenant_id: TENANT.to_string(),
            store_id: STORE.to_string(),
            operator_id: "op-1".to_string(),
            operator_name: "Ana".to_string(),
            status: ShiftStatus::Open,
            opened_at: now,
            closed_at: None,
            starting_cash: 100.0,
            expected_cash: None,
            actual_cash: None,
            cash_variance: None,
            note: None,
            created_at: now,
            updated_at: now,
        })
        .unwrap();
}

fn create_test_manager() -> TabsManager {
    let storage = TabStorage::open_in_memory().unwrap();
    open_shift(&storage);
    let catalog = Arc::new(CatalogService::new());
    seed_catalog(&catalog);
    TabsManager::new(storage, catalog, chrono_tz::Europe::Madrid)
}

fn mesa(id: &str) -> TableRef {
    TableRef {
        table_id: id.to_string(),
        table_name: format!("Mesa {id}"),
    }
}

fn cmd(payload: TabCommandPayload) -> TabCommand {
    TabCommand::new(TENANT, "op-1", "Ana", payload)
}

fn open_table_cmd(table: &str) -> TabCommand {
    cmd(TabCommandPayload::OpenTab {
        store_id: STORE.to_string(),
        tables: vec![mesa(table)],
        server_id: "emp-1".to_string(),
        server_name: "Luis".to_string(),
        guest_count: 2,
        note: None,
    })
}

fn order_item(product_id: &str, quantity: i32) -> OrderItemInput {
    OrderItemInput {
        product_id: product_id.to_string(),
        quantity,
        note: None,
    }
}

fn add_order_cmd(tab_id: &str, items: Vec<OrderItemInput>) -> TabCommand {
    cmd(TabCommandPayload::AddOrder {
        tab_id: tab_id.to_string(),
        items,
    })
}

fn single(method: &str) -> Tender {
    Tender::Single {
        method: method.to_string(),
    }
}

fn mixed(parts: &[(&str, f64)]) -> Tender {
    Tender::Mixed {
        parts: parts
            .iter()
            .map(|(method, amount)| PaymentPart {
                method: method.to_string(),
                amount: *amount,
            })
            .collect(),
    }
}

/// Open a tab on the given table and return its ID
fn open_tab(manager: &TabsManager, table: &str) -> String {
    let response = manager.execute_command(open_table_cmd(table));
    assert!(response.success, "open failed: {:?}", response.error);
    response.tab_id.unwrap()
}

/// Open a tab with 2×A + 1×B and a 10% discount → total 117.00
fn open_discounted_tab(manager: &TabsManager, table: &str) -> String {
    let tab_id = open_tab(manager, table);
    let response = manager.execute_command(add_order_cmd(
        &tab_id,
        vec![order_item("pA", 2), order_item("pB", 1)],
    ));
    assert!(response.success);
    let response = manager.execute_command(cmd(TabCommandPayload::ApplyDiscount {
        tab_id: tab_id.clone(),
        kind: AdjustmentKind::Percentage,
        value: 10.0,
    }));
    assert!(response.success);

    let snapshot = manager.get_snapshot(TENANT, &tab_id).unwrap().unwrap();
    assert_eq!(snapshot.subtotal, 130.0);
    assert_eq!(snapshot.total, 117.0);
    tab_id
}
