//! In-memory TTL cache with single-flight background refresh.
//!
//! - [`CacheStore`]: the content-list and follower-list slots plus the
//!   per-note detail mapping.
//! - [`Refresher`]: one worker that repopulates stale slots, at most one run
//!   at a time.
//! - [`DetailLoader`]: per-note background fetches.
//! - [`CacheService`]: the non-blocking read path handlers call.

pub mod detail;
pub mod refresher;
pub mod service;
pub mod slots;
pub mod store;

pub use detail::{DetailLoader, ScheduleOutcome};
pub use refresher::{RefreshReport, Refresher, TriggerOutcome};
pub use service::{CacheError, CacheService, Fetched};
pub use slots::{CacheSlot, DetailRecord, Stamped};
pub use store::{CacheConfig, CacheStore, ClearReport, SlotPayload};
