//! Metrics for the NoteDesk console.

pub mod cache;
pub mod http;
pub mod setup;

pub use cache::CacheMetrics;
pub use setup::{detached_handle, init_metrics};
