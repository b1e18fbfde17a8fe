//! The read path handlers use.
//!
//! Serves from the store when it can and hands everything else to the
//! background workers. Nothing here waits on the network.

use std::sync::Arc;
use std::time::Duration;

use notedesk_client::Session;
use thiserror::Error;
use tracing::debug;

use super::detail::{DETAIL_LABEL, DetailLoader};
use super::refresher::{Refresher, TriggerOutcome};
use super::slots::{DetailRecord, Stamped};
use super::store::{CacheConfig, CacheStore, ClearReport, SlotPayload};
use crate::metrics::CacheMetrics;

/// Errors surfaced by the cache read path.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Not logged in")]
    NotAuthenticated,
}

/// Result of a cache read.
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    /// The cached payload, fresh or stale. `None` if nothing was ever cached.
    pub payload: Option<Arc<T>>,
    /// True when nothing is cached yet and a load has been scheduled.
    pub is_loading: bool,
    /// True when the payload is past its TTL.
    pub is_stale: bool,
    /// Age of the payload.
    pub age: Option<Duration>,
}

impl<T> Fetched<T> {
    fn loading() -> Self {
        Self {
            payload: None,
            is_loading: true,
            is_stale: false,
            age: None,
        }
    }

    fn from_stamped(stamped: &Stamped<T>, is_stale: bool) -> Self {
        Self {
            payload: Some(Arc::clone(stamped.payload())),
            is_loading: false,
            is_stale,
            age: Some(stamped.age()),
        }
    }
}

impl<T: Default + Clone> Fetched<T> {
    /// Returns the payload, or an empty one while loading.
    pub fn payload_or_default(&self) -> T {
        self.payload.as_deref().cloned().unwrap_or_default()
    }
}

/// Cache store, refresher and detail loader behind one handle.
pub struct CacheService {
    store: Arc<CacheStore>,
    session: Arc<Session>,
    refresher: Refresher,
    details: DetailLoader,
}

impl CacheService {
    /// Builds the service and starts the refresh worker.
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(config: CacheConfig, session: Arc<Session>) -> Self {
        Self::with_metrics(config, session, CacheMetrics::new())
    }

    /// Same as [`CacheService::new`], recording into `metrics`.
    pub fn with_metrics(config: CacheConfig, session: Arc<Session>, metrics: CacheMetrics) -> Self {
        let store = Arc::new(CacheStore::with_metrics(config, metrics));
        let refresher = Refresher::start(Arc::clone(&store), Arc::clone(&session));
        let details = DetailLoader::new(Arc::clone(&store), Arc::clone(&session));

        Self {
            store,
            session,
            refresher,
            details,
        }
    }

    /// Reads a singleton slot.
    ///
    /// Fresh payloads are returned as-is, with a background refresh once they
    /// are half-way through their TTL. Stale or absent payloads trigger a
    /// refresh; the stale payload is still returned.
    pub fn fetch<P: SlotPayload>(&self) -> Result<Fetched<P>, CacheError> {
        self.require_session()?;

        let slot = P::SLOT;
        let metrics = self.store.metrics();

        match self.store.get::<P>() {
            Some(stamped) if stamped.is_fresh() => {
                metrics.record_hit(slot.as_str());
                if stamped.is_half_expired() {
                    debug!(slot = %slot, "Slot past half TTL, refreshing in background");
                    self.trigger_refresh();
                }
                Ok(Fetched::from_stamped(&stamped, false))
            }
            Some(stamped) => {
                metrics.record_stale(slot.as_str());
                self.trigger_refresh();
                Ok(Fetched::from_stamped(&stamped, true))
            }
            None => {
                metrics.record_miss(slot.as_str());
                self.trigger_refresh();
                Ok(Fetched::loading())
            }
        }
    }

    /// Reads the detail record of one note.
    ///
    /// A stale or missing record schedules a fetch for that note only.
    pub fn fetch_detail(&self, note_id: &str) -> Result<Fetched<DetailRecord>, CacheError> {
        self.require_session()?;

        let metrics = self.store.metrics();

        match self.store.get_detail(note_id) {
            Some(stamped) if stamped.is_fresh() => {
                metrics.record_hit(DETAIL_LABEL);
                Ok(Fetched::from_stamped(&stamped, false))
            }
            Some(stamped) => {
                metrics.record_stale(DETAIL_LABEL);
                self.details.schedule(note_id);
                Ok(Fetched::from_stamped(&stamped, true))
            }
            None => {
                metrics.record_miss(DETAIL_LABEL);
                self.details.schedule(note_id);
                Ok(Fetched::loading())
            }
        }
    }

    /// Requests a background refresh of the singleton slots.
    pub fn trigger_refresh(&self) -> TriggerOutcome {
        self.refresher.trigger()
    }

    /// Empties the cache. Safe to call at any time, any number of times.
    pub fn clear_all(&self) -> ClearReport {
        self.store.clear_all()
    }

    pub fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }

    pub fn refresher(&self) -> &Refresher {
        &self.refresher
    }

    pub fn details(&self) -> &DetailLoader {
        &self.details
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    fn require_session(&self) -> Result<(), CacheError> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(CacheError::NotAuthenticated)
        }
    }
}
