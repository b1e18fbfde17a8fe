//! Cache slot identifiers and stamped values.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use notedesk_core::NoteDetail;
use tokio::time::Instant;

/// The fixed, singleton slots of the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheSlot {
    /// Notes posted by the logged-in account.
    ContentList,
    /// First page of the account's followers.
    FollowerList,
}

impl CacheSlot {
    /// Every slot, in refresh order.
    pub const ALL: [CacheSlot; 2] = [CacheSlot::ContentList, CacheSlot::FollowerList];

    /// Returns the slot name used in logs and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheSlot::ContentList => "content_list",
            CacheSlot::FollowerList => "follower_list",
        }
    }
}

impl fmt::Display for CacheSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A payload together with when it was written and how long it stays fresh.
///
/// Always replaced as a whole; readers hold an `Arc` snapshot, so the three
/// fields they see always belong to the same write.
#[derive(Debug)]
pub struct Stamped<T> {
    payload: Arc<T>,
    refreshed_at: Instant,
    ttl: Duration,
}

impl<T> Stamped<T> {
    /// Stamps `payload` with the current time.
    pub fn new(payload: T, ttl: Duration) -> Self {
        Self {
            payload: Arc::new(payload),
            refreshed_at: Instant::now(),
            ttl,
        }
    }

    /// Returns the payload.
    pub fn payload(&self) -> &Arc<T> {
        &self.payload
    }

    /// Returns when the payload was written.
    pub fn refreshed_at(&self) -> Instant {
        self.refreshed_at
    }

    /// Returns the time-to-live the payload was written with.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the time since the payload was written.
    pub fn age(&self) -> Duration {
        self.refreshed_at.elapsed()
    }

    /// `age < ttl`.
    pub fn is_fresh(&self) -> bool {
        self.age() < self.ttl
    }

    /// `age >= ttl / 2`: old enough to refresh proactively.
    pub fn is_half_expired(&self) -> bool {
        self.age() >= self.ttl / 2
    }
}

/// A cached detail lookup.
///
/// The platform answering "no such note" is cached too, so a deleted note
/// does not cost an upstream call on every page view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailRecord {
    Found(NoteDetail),
    Missing,
}

impl DetailRecord {
    /// Returns the detail, if the note exists.
    pub fn as_found(&self) -> Option<&NoteDetail> {
        match self {
            DetailRecord::Found(detail) => Some(detail),
            DetailRecord::Missing => None,
        }
    }
}

impl From<Option<NoteDetail>> for DetailRecord {
    fn from(detail: Option<NoteDetail>) -> Self {
        detail.map_or(DetailRecord::Missing, DetailRecord::Found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_stamped_freshness() {
        let stamped = Stamped::new(vec![1, 2, 3], Duration::from_secs(300));

        tokio::time::advance(Duration::from_secs(149)).await;
        assert!(stamped.is_fresh());
        assert!(!stamped.is_half_expired());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(stamped.is_fresh());
        assert!(stamped.is_half_expired());

        tokio::time::advance(Duration::from_secs(150)).await;
        assert!(!stamped.is_fresh());
        assert_eq!(stamped.age(), Duration::from_secs(300));
    }

    #[test]
    fn test_slot_names() {
        assert_eq!(CacheSlot::ContentList.to_string(), "content_list");
        assert_eq!(CacheSlot::FollowerList.as_str(), "follower_list");
    }

    #[test]
    fn test_detail_record_from_option() {
        let found = DetailRecord::from(Some(NoteDetail::new("n1", "Title")));
        assert_eq!(found.as_found().map(|d| d.note_id.as_str()), Some("n1"));

        assert_eq!(DetailRecord::from(None), DetailRecord::Missing);
    }
}
