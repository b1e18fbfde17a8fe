//! Per-note detail population.
//!
//! A missing or expired detail record schedules a background fetch for that
//! note only. Fetches for the same note are deduplicated with an in-flight
//! set; fetches for different notes run independently.

use std::collections::HashSet;
use std::sync::Arc;

use notedesk_client::Session;
use parking_lot::Mutex;
use tracing::{Instrument, debug, info_span, warn};

use super::refresher::with_timeout;
use super::slots::DetailRecord;
use super::store::CacheStore;

/// Metric label for detail fetches.
pub const DETAIL_LABEL: &str = "detail";

/// What a call to [`DetailLoader::schedule`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOutcome {
    /// A fetch for the note was spawned.
    Scheduled,
    /// A fetch for the note is already in flight.
    AlreadyLoading,
    /// No authenticated session.
    NoSession,
}

/// Removes a note from the in-flight set when the fetch ends, however it ends.
struct InflightGuard {
    inflight: Arc<Mutex<HashSet<String>>>,
    note_id: String,
}

impl Drop for InflightGuard {
    fn drop(&mut self) {
        self.inflight.lock().remove(&self.note_id);
    }
}

/// Spawns detail fetches and writes their results to the store.
#[derive(Clone)]
pub struct DetailLoader {
    store: Arc<CacheStore>,
    session: Arc<Session>,
    inflight: Arc<Mutex<HashSet<String>>>,
}

impl DetailLoader {
    pub fn new(store: Arc<CacheStore>, session: Arc<Session>) -> Self {
        Self {
            store,
            session,
            inflight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Schedules a fetch of `note_id` unless one is already running.
    pub fn schedule(&self, note_id: &str) -> ScheduleOutcome {
        // Generation before session: a login in between discards the write.
        let generation = self.store.generation();
        let Some(active) = self.session.authenticated() else {
            return ScheduleOutcome::NoSession;
        };

        if !self.inflight.lock().insert(note_id.to_string()) {
            return ScheduleOutcome::AlreadyLoading;
        }
        let guard = InflightGuard {
            inflight: Arc::clone(&self.inflight),
            note_id: note_id.to_string(),
        };

        let store = Arc::clone(&self.store);
        let timeout = store.config().upstream_timeout;
        let note_id = note_id.to_string();
        let span = info_span!("detail_fetch", note_id = %note_id);

        tokio::spawn(
            async move {
                let _guard = guard;
                let fetched =
                    with_timeout(timeout, active.source().fetch_item_detail(&note_id)).await;

                match fetched {
                    Ok(detail) => {
                        let record = DetailRecord::from(detail);
                        if matches!(record, DetailRecord::Missing) {
                            debug!("Note not found upstream");
                        }
                        store.put_detail(&note_id, record, generation);
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to fetch note detail");
                        store.metrics().record_refresh_failure(DETAIL_LABEL);
                    }
                }
            }
            .instrument(span),
        );

        ScheduleOutcome::Scheduled
    }

    /// Returns true if a fetch for `note_id` is in flight.
    pub fn is_loading(&self, note_id: &str) -> bool {
        self.inflight.lock().contains(note_id)
    }

    /// Returns the number of fetches in flight.
    pub fn inflight_count(&self) -> usize {
        self.inflight.lock().len()
    }
}
