//! Error types for NoteDesk.
//!
//! Domain-level failures: invalid identifiers, rejected publish requests and
//! local I/O. Network failures against the platform live in the client crate
//! as `UpstreamError`.
//!
//! # Example
//!
//! ```
//! use notedesk_core::{DeskError, Result};
//!
//! fn title_of(raw: &str) -> Result<String> {
//!     if raw.trim().is_empty() {
//!         return Err(DeskError::validation_error("title", "cannot be empty"));
//!     }
//!     Ok(raw.trim().to_string())
//! }
//!
//! assert!(title_of("  ").is_err());
//! ```

use std::io;
use thiserror::Error;

/// Main error type for NoteDesk domain operations.
#[derive(Debug, Error)]
pub enum DeskError {
    /// A note identifier is malformed.
    #[error("Invalid note id '{id}': {reason}")]
    InvalidNoteId {
        /// The rejected identifier
        id: String,
        /// Why it was rejected
        reason: String,
    },

    /// A user identifier is malformed.
    #[error("Invalid user id '{id}': {reason}")]
    InvalidUserId {
        /// The rejected identifier
        id: String,
        /// Why it was rejected
        reason: String,
    },

    /// A field failed validation.
    #[error("Validation error for field '{field}': {message}")]
    ValidationError {
        /// Field that failed validation
        field: String,
        /// Description of the validation failure
        message: String,
    },

    /// I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DeskError {
    /// Creates an InvalidNoteId error.
    pub fn invalid_note_id(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidNoteId {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Creates an InvalidUserId error.
    pub fn invalid_user_id(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUserId {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Creates a ValidationError.
    pub fn validation_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an Internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if the error was caused by caller input.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidNoteId { .. } | Self::InvalidUserId { .. } | Self::ValidationError { .. }
        )
    }

    /// Returns true if this is an I/O error.
    pub fn is_io_error(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

/// Type alias for Results with DeskError.
pub type Result<T> = std::result::Result<T, DeskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_note_id_display() {
        let error = DeskError::invalid_note_id("a/b", "contains '/'");
        let msg = error.to_string();

        assert!(msg.contains("a/b"));
        assert!(msg.contains("contains '/'"));
    }

    #[test]
    fn test_validation_error_is_client_error() {
        let error = DeskError::validation_error("title", "cannot be empty");

        assert!(error.is_client_error());
        assert!(!DeskError::internal("boom").is_client_error());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: DeskError = io_error.into();

        assert!(error.is_io_error());
        assert!(!error.is_client_error());
    }

    #[test]
    fn test_result_with_question_mark() {
        fn inner() -> Result<()> {
            Err(DeskError::internal("test"))
        }

        fn outer() -> Result<String> {
            inner()?;
            Ok("success".into())
        }

        assert!(outer().is_err());
    }
}
