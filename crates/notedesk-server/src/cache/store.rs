//! TTL cache store.
//!
//! Two singleton slots plus a per-note detail mapping. Every entry is an
//! `Arc<Stamped<T>>` replaced in one step, so readers never see a payload
//! paired with another write's timestamp.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use notedesk_core::{FollowerPage, NoteSummary};
use parking_lot::RwLock;
use tracing::debug;

use super::slots::{CacheSlot, DetailRecord, Stamped};
use crate::metrics::CacheMetrics;

/// TTLs and upstream timeout for the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// TTL of the content list (default: 300s).
    pub content_list_ttl: Duration,
    /// TTL of the follower list (default: 600s).
    pub follower_list_ttl: Duration,
    /// TTL of each detail record (default: 1800s).
    pub detail_ttl: Duration,
    /// Timeout applied to every upstream call made on behalf of the cache.
    pub upstream_timeout: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            content_list_ttl: Duration::from_secs(300),
            follower_list_ttl: Duration::from_secs(600),
            detail_ttl: Duration::from_secs(1800),
            upstream_timeout: Duration::from_secs(10),
        }
    }
}

impl CacheConfig {
    /// Returns the default TTL of `slot`.
    pub fn ttl(&self, slot: CacheSlot) -> Duration {
        match slot {
            CacheSlot::ContentList => self.content_list_ttl,
            CacheSlot::FollowerList => self.follower_list_ttl,
        }
    }
}

/// One singleton slot.
#[derive(Debug)]
pub struct Slot<T> {
    cell: RwLock<Option<Arc<Stamped<T>>>>,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            cell: RwLock::new(None),
        }
    }
}

impl<T> Slot<T> {
    fn snapshot(&self) -> Option<Arc<Stamped<T>>> {
        self.cell.read().clone()
    }

    fn set(&self, value: Stamped<T>) {
        *self.cell.write() = Some(Arc::new(value));
    }

    fn take(&self) -> bool {
        self.cell.write().take().is_some()
    }
}

/// A payload type that lives in one of the singleton slots.
pub trait SlotPayload: Default + Send + Sync + Sized + 'static {
    /// The slot holding this payload.
    const SLOT: CacheSlot;

    /// Returns this payload's slot in `store`.
    fn slot(store: &CacheStore) -> &Slot<Self>;
}

impl SlotPayload for Vec<NoteSummary> {
    const SLOT: CacheSlot = CacheSlot::ContentList;

    fn slot(store: &CacheStore) -> &Slot<Self> {
        &store.content_list
    }
}

impl SlotPayload for FollowerPage {
    const SLOT: CacheSlot = CacheSlot::FollowerList;

    fn slot(store: &CacheStore) -> &Slot<Self> {
        &store.follower_list
    }
}

/// What [`CacheStore::clear_all`] removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearReport {
    pub slots: usize,
    pub details: usize,
}

/// The cache store.
///
/// Writes carry the generation they were started under. `clear_all` bumps the
/// generation, so a refresh that began before a clear cannot repopulate the
/// cache with data from the previous session.
pub struct CacheStore {
    config: CacheConfig,
    content_list: Slot<Vec<NoteSummary>>,
    follower_list: Slot<FollowerPage>,
    details: Cache<String, Arc<Stamped<DetailRecord>>>,
    generation: RwLock<u64>,
    metrics: CacheMetrics,
}

impl CacheStore {
    /// Creates an empty store.
    pub fn new(config: CacheConfig) -> Self {
        Self::with_metrics(config, CacheMetrics::new())
    }

    /// Creates an empty store recording into `metrics`.
    pub fn with_metrics(config: CacheConfig, metrics: CacheMetrics) -> Self {
        Self {
            config,
            content_list: Slot::default(),
            follower_list: Slot::default(),
            // Unbounded, no expiry: staleness is judged on read.
            details: Cache::builder().build(),
            generation: RwLock::new(0),
            metrics,
        }
    }

    /// Returns the store configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Returns the metrics recorder.
    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    /// Returns the current generation.
    pub fn generation(&self) -> u64 {
        *self.generation.read()
    }

    /// Returns a snapshot of the slot holding `P`.
    pub fn get<P: SlotPayload>(&self) -> Option<Arc<Stamped<P>>> {
        P::slot(self).snapshot()
    }

    /// Writes `payload` with the slot's default TTL.
    pub fn put<P: SlotPayload>(&self, payload: P) {
        self.put_with_ttl(payload, self.config.ttl(P::SLOT));
    }

    /// Writes `payload` with an explicit TTL.
    pub fn put_with_ttl<P: SlotPayload>(&self, payload: P, ttl: Duration) {
        let _generation = self.generation.read();
        P::slot(self).set(Stamped::new(payload, ttl));
    }

    /// Writes `payload` only if no clear happened since `generation` was read.
    ///
    /// Returns false if the write was discarded.
    pub fn put_if_current<P: SlotPayload>(&self, payload: P, generation: u64) -> bool {
        let current = self.generation.read();
        if *current != generation {
            debug!(slot = %P::SLOT, "Discarding write from before cache clear");
            return false;
        }
        P::slot(self).set(Stamped::new(payload, self.config.ttl(P::SLOT)));
        true
    }

    /// Returns true if `slot` was never populated or is at least half-way
    /// through its TTL.
    pub fn needs_refresh(&self, slot: CacheSlot) -> bool {
        match slot {
            CacheSlot::ContentList => half_expired(&self.content_list),
            CacheSlot::FollowerList => half_expired(&self.follower_list),
        }
    }

    /// Returns a snapshot of the detail record for `note_id`.
    pub fn get_detail(&self, note_id: &str) -> Option<Arc<Stamped<DetailRecord>>> {
        self.details.get(note_id)
    }

    /// Writes a detail record if no clear happened since `generation`.
    pub fn put_detail(&self, note_id: &str, record: DetailRecord, generation: u64) -> bool {
        let current = self.generation.read();
        if *current != generation {
            debug!(note_id = %note_id, "Discarding detail from before cache clear");
            return false;
        }
        self.details.insert(
            note_id.to_string(),
            Arc::new(Stamped::new(record, self.config.detail_ttl)),
        );
        self.metrics.update_detail_entries(self.details.entry_count());
        true
    }

    /// Returns the number of detail records held, fresh or not.
    pub fn detail_count(&self) -> usize {
        self.details.iter().count()
    }

    /// Empties every slot and the detail mapping.
    pub fn clear_all(&self) -> ClearReport {
        let mut generation = self.generation.write();
        *generation += 1;

        let slots = [self.content_list.take(), self.follower_list.take()]
            .into_iter()
            .filter(|cleared| *cleared)
            .count();
        let details = self.detail_count();
        self.details.invalidate_all();
        self.details.run_pending_tasks();

        self.metrics.record_clear();
        self.metrics.update_detail_entries(0);
        ClearReport { slots, details }
    }
}

fn half_expired<T>(slot: &Slot<T>) -> bool {
    slot.snapshot().is_none_or(|stamped| stamped.is_half_expired())
}
