//! Follower records.

use serde::{Deserialize, Serialize};

/// Relationship between a follower and the logged-in account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowStatus {
    /// Unknown or no longer following.
    #[default]
    None,
    /// Follows the account.
    Fan,
    /// Follows the account and is followed back.
    Mutual,
}

impl FollowStatus {
    /// Maps the platform `fstatus` field.
    ///
    /// ```
    /// use notedesk_core::FollowStatus;
    ///
    /// assert_eq!(FollowStatus::from_platform("fans"), FollowStatus::Fan);
    /// assert_eq!(FollowStatus::from_platform("both"), FollowStatus::Mutual);
    /// assert_eq!(FollowStatus::from_platform("none"), FollowStatus::None);
    /// ```
    pub fn from_platform(fstatus: &str) -> Self {
        match fstatus {
            "fans" => Self::Fan,
            "both" => Self::Mutual,
            _ => Self::None,
        }
    }
}

/// One account that followed the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowerRecord {
    pub user_id: String,
    pub nickname: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub follow_status: FollowStatus,
    /// When the follow happened, epoch seconds.
    #[serde(default)]
    pub followed_at: Option<i64>,
}

/// A page of followers as returned by the notification feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowerPage {
    pub followers: Vec<FollowerRecord>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub cursor: String,
}

impl FollowerPage {
    /// Number of followers on this page.
    pub fn len(&self) -> usize {
        self.followers.len()
    }

    /// Returns true if the page holds no followers.
    pub fn is_empty(&self) -> bool {
        self.followers.is_empty()
    }

    /// Followers that are followed back.
    pub fn mutuals(&self) -> impl Iterator<Item = &FollowerRecord> {
        self.followers
            .iter()
            .filter(|f| f.follow_status == FollowStatus::Mutual)
    }
}
