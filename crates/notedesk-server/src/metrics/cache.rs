//! Cache metrics recording.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use metrics::{counter, gauge, histogram};

/// Describes the cache metrics. Call once at startup.
pub fn register_cache_metrics() {
    metrics::describe_counter!(
        "notedesk_cache_hits_total",
        "Reads served from a fresh cache entry"
    );
    metrics::describe_counter!(
        "notedesk_cache_misses_total",
        "Reads that found no cache entry"
    );
    metrics::describe_counter!(
        "notedesk_cache_stale_total",
        "Reads served from an expired cache entry"
    );
    metrics::describe_counter!(
        "notedesk_cache_refresh_runs_total",
        "Background refresh runs by outcome"
    );
    metrics::describe_counter!(
        "notedesk_cache_refresh_failures_total",
        "Upstream failures during background refresh, per slot"
    );
    metrics::describe_histogram!(
        "notedesk_cache_refresh_duration_seconds",
        "Duration of background refresh runs"
    );
    metrics::describe_gauge!(
        "notedesk_cache_detail_entries",
        "Number of cached detail records"
    );
    metrics::describe_counter!("notedesk_cache_clears_total", "Full cache clears");
}

/// Cache metrics recorder.
///
/// Forwards to the `metrics` facade and keeps local counters so hit rate can
/// be logged and asserted on without a recorder installed.
#[derive(Debug, Clone, Default)]
pub struct CacheMetrics {
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    stale: Arc<AtomicU64>,
    refresh_failures: Arc<AtomicU64>,
}

impl CacheMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh read.
    pub fn record_hit(&self, slot: &'static str) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        counter!("notedesk_cache_hits_total", "slot" => slot).increment(1);
    }

    /// Nothing cached.
    pub fn record_miss(&self, slot: &'static str) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        counter!("notedesk_cache_misses_total", "slot" => slot).increment(1);
    }

    /// Expired entry served.
    pub fn record_stale(&self, slot: &'static str) {
        self.stale.fetch_add(1, Ordering::Relaxed);
        counter!("notedesk_cache_stale_total", "slot" => slot).increment(1);
    }

    pub fn record_refresh_run(&self, outcome: &'static str, duration: Duration) {
        counter!("notedesk_cache_refresh_runs_total", "outcome" => outcome).increment(1);
        histogram!("notedesk_cache_refresh_duration_seconds").record(duration.as_secs_f64());
    }

    pub fn record_refresh_failure(&self, slot: &'static str) {
        self.refresh_failures.fetch_add(1, Ordering::Relaxed);
        counter!("notedesk_cache_refresh_failures_total", "slot" => slot).increment(1);
    }

    pub fn update_detail_entries(&self, count: u64) {
        gauge!("notedesk_cache_detail_entries").set(count as f64);
    }

    pub fn record_clear(&self) {
        counter!("notedesk_cache_clears_total").increment(1);
    }

    /// Share of reads served fresh.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits() as f64;
        let total = hits + self.misses() as f64 + self.stale() as f64;
        if total == 0.0 { 0.0 } else { hits / total }
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn stale(&self) -> u64 {
        self.stale.load(Ordering::Relaxed)
    }

    pub fn refresh_failures(&self) -> u64 {
        self.refresh_failures.load(Ordering::Relaxed)
    }
}
