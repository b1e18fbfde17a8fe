//! Session persistence.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use notedesk_core::{DeskError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// What gets written to disk at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub cookie: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl SessionRecord {
    /// Creates a record for `cookie`.
    pub fn new(cookie: impl Into<String>, user_id: Option<String>) -> Self {
        Self {
            cookie: cookie.into(),
            user_id,
        }
    }
}

/// JSON file holding the last login's cookie.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Creates a store backed by `path`. Nothing is read until [`load`](Self::load).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the saved session.
    ///
    /// Returns `Ok(None)` if the file does not exist or holds a blank cookie.
    pub async fn load(&self) -> Result<Option<SessionRecord>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No saved session");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let record: SessionRecord = serde_json::from_str(&content).map_err(|e| {
            DeskError::internal(format!(
                "malformed session file {}: {e}",
                self.path.display()
            ))
        })?;

        if record.cookie.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(record))
    }

    /// Writes `record`, replacing any previous file.
    pub async fn save(&self, record: &SessionRecord) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(record)
            .map_err(|e| DeskError::internal(format!("failed to encode session: {e}")))?;
        tokio::fs::write(&self.path, json).await?;

        info!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    /// Removes the saved session. Returns true if a file was removed.
    pub async fn clear(&self) -> Result<bool> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                info!(path = %self.path.display(), "Session file removed");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
