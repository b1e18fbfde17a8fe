//! Publish requests for image notes.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{DeskError, Result};

/// Maximum number of images the platform accepts on one note.
pub const MAX_IMAGES: usize = 18;

/// A topic (hashtag) attached to a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default = "topic_type")]
    pub kind: String,
}

fn topic_type() -> String {
    "topic".to_string()
}

/// A user mentioned in the note body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtUser {
    pub user_id: String,
    pub nickname: String,
    #[serde(default)]
    pub name: String,
}

/// An image note ready to be published.
///
/// # Example
///
/// ```
/// use notedesk_core::PublishRequest;
///
/// let request = PublishRequest::new("Title", "Body", vec!["uploads/a.jpg".into()]);
/// assert!(request.validate().is_ok());
///
/// let empty = PublishRequest::new("Title", "Body", vec![]);
/// assert!(empty.validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishRequest {
    pub title: String,
    pub desc: String,
    pub image_paths: Vec<PathBuf>,
    #[serde(default)]
    pub topics: Vec<Topic>,
    #[serde(default)]
    pub ats: Vec<AtUser>,
    #[serde(default)]
    pub is_private: bool,
    /// Scheduled publish time, `YYYY-MM-DD HH:MM:SS`.
    #[serde(default)]
    pub post_time: Option<String>,
}

impl PublishRequest {
    /// Creates a public request without topics or mentions.
    pub fn new(title: impl Into<String>, desc: impl Into<String>, image_paths: Vec<PathBuf>) -> Self {
        Self {
            title: title.into(),
            desc: desc.into(),
            image_paths,
            topics: Vec::new(),
            ats: Vec::new(),
            is_private: false,
            post_time: None,
        }
    }

    /// Marks the note as private.
    pub fn private(mut self, is_private: bool) -> Self {
        self.is_private = is_private;
        self
    }

    /// Checks the request before any upload starts.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(DeskError::validation_error("title", "cannot be empty"));
        }
        if self.desc.trim().is_empty() {
            return Err(DeskError::validation_error("desc", "cannot be empty"));
        }
        if self.image_paths.is_empty() {
            return Err(DeskError::validation_error(
                "images",
                "at least one image is required",
            ));
        }
        if self.image_paths.len() > MAX_IMAGES {
            return Err(DeskError::validation_error(
                "images",
                format!("at most {MAX_IMAGES} images are allowed"),
            ));
        }
        Ok(())
    }
}

/// Result of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedNote {
    pub note_id: String,
}
