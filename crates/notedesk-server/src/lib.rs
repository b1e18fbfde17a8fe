//! NoteDesk Server - JSON web console for a notes-platform account
//!
//! The heart of the crate is [`cache`]: an in-memory TTL cache that fronts
//! the account's content list, follower list and per-note details, with a
//! single-flight background refresher so page requests never wait on the
//! platform.

pub mod auth;
pub mod cache;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod server;
pub mod settings;
pub mod state;

pub use cache::{CacheConfig, CacheService, CacheSlot, Fetched};
pub use error::AppError;
pub use server::{create_router_with_state, run_server_with_state};
pub use settings::Settings;
pub use state::AppState;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
