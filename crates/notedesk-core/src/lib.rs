//! NoteDesk Core - Domain types
//!
//! This crate provides the foundational types shared by the NoteDesk
//! platform client and the console server: note summaries and details,
//! follower records, account info and publish requests.

pub mod account;
pub mod error;
pub mod follower;
pub mod note;
pub mod publish;
pub mod types;

pub use account::SelfInfo;
pub use error::{DeskError, Result};
pub use follower::{FollowStatus, FollowerPage, FollowerRecord};
pub use note::{Comment, InteractStats, NoteDetail, NoteSummary};
pub use publish::{AtUser, PublishRequest, PublishedNote, Topic};
pub use types::{NoteId, UserId};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
