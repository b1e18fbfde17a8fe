//! Session handle and persistence.

mod state;
mod store;

pub use state::{ActiveSession, Session};
pub use store::{SessionRecord, SessionStore};
