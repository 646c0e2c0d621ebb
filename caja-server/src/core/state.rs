//! Server state - shared handles to every service
//!
//! `ServerState` is cheap to clone: everything inside is either `Copy`,
//! an `Arc`, or a storage handle that itself wraps an `Arc<Database>`.

use std::sync::Arc;

use crate::catalog::CatalogService;
use crate::core::Config;
use crate::expenses::ExpenseService;
use crate::shifts::ShiftService;
use crate::tabs::{reducer, TabStorage, TabsManager};

/// Shared server state
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub storage: TabStorage,
    pub manager: Arc<TabsManager>,
    pub catalog: Arc<CatalogService>,
    pub shifts: ShiftService,
    pub expenses: ExpenseService,
}

impl ServerState {
    /// Open the database and wire up the services
    pub fn initialize(config: &Config) -> anyhow::Result<Self> {
        let storage = TabStorage::open(config.db_path())?;
        verify_active_tabs(&storage);
        Ok(Self::with_storage(config.clone(), storage))
    }

    /// Build state around an existing storage handle (tests use the
    /// in-memory backend here)
    pub fn with_storage(config: Config, storage: TabStorage) -> Self {
        let catalog = Arc::new(CatalogService::new());
        let manager = Arc::new(TabsManager::new(
            storage.clone(),
            catalog.clone(),
            config.timezone,
        ));
        let shifts = ShiftService::new(storage.clone(), config.cash_method.clone(), config.tax_rate);
        let expenses = ExpenseService::new(storage.clone());

        Self {
            config,
            storage,
            manager,
            catalog,
            shifts,
            expenses,
        }
    }
}

/// Startup integrity pass: replay every active tab's event stream and
/// compare against the stored snapshot. Drift means the stored snapshot
/// diverged from the authoritative events (e.g. a crash mid-upgrade); the
/// replayed state wins and is written back.
fn verify_active_tabs(storage: &TabStorage) {
    let active = match storage.get_active_tab_ids() {
        Ok(ids) => ids,
        Err(e) => {
            tracing::error!(error = %e, "Failed to enumerate active tabs at startup");
            return;
        }
    };

    let mut repaired = 0usize;
    for tab_id in &active {
        match reducer::verify_snapshot(storage, tab_id) {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(tab_id = %tab_id, "Snapshot drift detected, rebuilding from events");
                if let Err(e) = repair_snapshot(storage, tab_id) {
                    tracing::error!(tab_id = %tab_id, error = %e, "Snapshot rebuild failed");
                } else {
                    repaired += 1;
                }
            }
            Err(e) => {
                tracing::error!(tab_id = %tab_id, error = %e, "Snapshot verification failed");
            }
        }
    }

    if repaired > 0 {
        tracing::info!(active = active.len(), repaired, "Startup snapshot verification done");
    } else {
        tracing::debug!(active = active.len(), "Startup snapshot verification done");
    }
}

fn repair_snapshot(
    storage: &TabStorage,
    tab_id: &str,
) -> Result<(), crate::tabs::storage::StorageError> {
    if let Some(snapshot) = reducer::rebuild_snapshot(storage, tab_id)? {
        let txn = storage.begin_write()?;
        storage.store_snapshot(&txn, &snapshot)?;
        txn.commit()?;
    }
    Ok(())
}
