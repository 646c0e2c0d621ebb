//! Event replay - snapshot recomputation from the event stream
//!
//! The appliers are pure, so replaying a tab's events from scratch must
//! land on the exact state the live path produced. Used for crash
//! recovery and drift verification.

use shared::tab::{TabEvent, TabSnapshot};

use super::appliers::EventAction;
use super::storage::{StorageResult, TabStorage};
use super::traits::EventApplier;

/// Fold an event stream into a fresh snapshot
pub fn replay(tab_id: &str, events: &[TabEvent]) -> TabSnapshot {
    let mut ordered: Vec<&TabEvent> = events.iter().collect();
    ordered.sort_by_key(|e| e.sequence);

    let mut snapshot = TabSnapshot::new(tab_id.to_string());
    for event in ordered {
        EventAction::from(event).apply(&mut snapshot, event);
    }
    snapshot
}

/// Rebuild a snapshot from storage by replaying its events
pub fn rebuild_snapshot(storage: &TabStorage, tab_id: &str) -> StorageResult<Option<TabSnapshot>> {
    let events = storage.get_events_for_tab(tab_id)?;
    if events.is_empty() {
        return Ok(None);
    }
    Ok(Some(replay(tab_id, &events)))
}

/// Compare the stored snapshot against a full replay.
/// Returns true when both agree (no drift).
pub fn verify_snapshot(storage: &TabStorage, tab_id: &str) -> StorageResult<bool> {
    let stored = storage.get_snapshot(tab_id)?;
    let replayed = rebuild_snapshot(storage, tab_id)?;

    match (stored, replayed) {
        (Some(stored), Some(replayed)) => {
            let ok = stored.last_sequence == replayed.last_sequence
                && stored.state_checksum == replayed.state_checksum;
            if !ok {
                tracing::error!(
                    tab_id = %tab_id,
                    stored_seq = stored.last_sequence,
                    replayed_seq = replayed.last_sequence,
                    "Snapshot drift detected"
                );
            }
            Ok(ok)
        }
        (None, None) => Ok(true),
        _ => Ok(false),
    }
}
