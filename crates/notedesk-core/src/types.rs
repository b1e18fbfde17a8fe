//! Identifier newtypes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{DeskError, Result};

const MAX_ID_LEN: usize = 64;

/// Identifier of a note on the platform.
///
/// Note ids travel in URL paths and in upstream query strings, so only
/// ASCII alphanumerics, `-` and `_` are accepted.
///
/// # Example
///
/// ```
/// use notedesk_core::NoteId;
///
/// let id = NoteId::parse("64f1c2aa000000001f03b2c1").unwrap();
/// assert_eq!(id.as_str(), "64f1c2aa000000001f03b2c1");
/// assert!(NoteId::parse("../etc").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Validates and wraps a note id.
    pub fn parse(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        validate_id(&raw).map_err(|reason| DeskError::invalid_note_id(&raw, reason))?;
        Ok(Self(raw))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the id, returning the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NoteId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identifier of a platform account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Validates and wraps a user id.
    pub fn parse(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        validate_id(&raw).map_err(|reason| DeskError::invalid_user_id(&raw, reason))?;
        Ok(Self(raw))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn validate_id(raw: &str) -> std::result::Result<(), &'static str> {
    if raw.is_empty() {
        return Err("cannot be empty");
    }
    if raw.len() > MAX_ID_LEN {
        return Err("too long");
    }
    if !raw
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err("only ASCII letters, digits, '-' and '_' are allowed");
    }
    Ok(())
}
