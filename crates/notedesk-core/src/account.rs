//! Logged-in account information.

use serde::{Deserialize, Serialize};

/// Profile of the account the session cookie belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfInfo {
    pub user_id: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub avatar: String,
}

impl SelfInfo {
    /// Returns the user id, or `None` when the platform sent an empty one.
    pub fn user_id(&self) -> Option<&str> {
        let id = self.user_id.trim();
        (!id.is_empty()).then_some(id)
    }
}
