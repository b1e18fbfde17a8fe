//! Note summaries, details and comments.

use serde::{Deserialize, Serialize};

/// One entry of the account's own note list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteSummary {
    pub note_id: String,
    pub title: String,
    #[serde(default)]
    pub desc: String,
    /// Cover image URL, empty when the platform sent none.
    #[serde(default)]
    pub cover: String,
    #[serde(default)]
    pub likes: u64,
    /// Publish time as reported upstream (epoch millis or empty).
    #[serde(default)]
    pub time: Option<i64>,
}

impl NoteSummary {
    /// Returns true if the summary carries a cover image.
    pub fn has_cover(&self) -> bool {
        !self.cover.is_empty()
    }
}

/// Interaction counters of a note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractStats {
    pub likes: u64,
    pub comments: u64,
    pub collects: u64,
    pub shares: u64,
}

/// A comment on a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub comment_id: String,
    pub content: String,
    pub user_id: String,
    pub nickname: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub time: Option<i64>,
    /// Number of replies below this comment.
    #[serde(default)]
    pub sub_comments: u64,
}

/// Full detail record of a single note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDetail {
    pub note_id: String,
    pub title: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub stats: InteractStats,
    #[serde(default)]
    pub time: Option<i64>,
    /// Image URLs, one per note image.
    #[serde(default)]
    pub images: Vec<String>,
    /// First page of comments.
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl NoteDetail {
    /// Creates a detail with only id and title set.
    pub fn new(note_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            note_id: note_id.into(),
            title: title.into(),
            desc: String::new(),
            stats: InteractStats::default(),
            time: None,
            images: Vec::new(),
            comments: Vec::new(),
        }
    }

    /// Returns the first image, used as the cover in listings.
    pub fn cover(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_cover_is_first_image() {
        let mut detail = NoteDetail::new("n1", "Title");
        assert!(detail.cover().is_none());

        detail.images = vec!["https://img/1".into(), "https://img/2".into()];
        assert_eq!(detail.cover(), Some("https://img/1"));
    }

    #[test]
    fn test_summary_deserializes_with_defaults() {
        let summary: NoteSummary =
            serde_json::from_str(r#"{"note_id":"n1","title":"Hello"}"#).unwrap();

        assert_eq!(summary.likes, 0);
        assert!(!summary.has_cover());
        assert!(summary.time.is_none());
    }
}
