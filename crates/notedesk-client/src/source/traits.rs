//! Note source trait definition.

use std::sync::Arc;

use async_trait::async_trait;
use notedesk_core::{FollowerPage, NoteDetail, NoteSummary, PublishRequest, PublishedNote, SelfInfo};

use crate::error::UpstreamError;

/// A source of account data on the notes platform.
///
/// This trait is the seam between the console's cache layer and the network.
/// The cache only ever talks to a `NoteSource`, so tests can swap in an
/// in-memory implementation.
///
/// # Implementors
///
/// - `XhsClient` - cookie-authenticated HTTP client
///
/// # Example
///
/// ```ignore
/// use notedesk_client::{NoteSource, UpstreamError};
///
/// struct Fixed;
///
/// #[async_trait]
/// impl NoteSource for Fixed {
///     async fn fetch_content_list(&self, _user_id: &str) -> Result<Vec<NoteSummary>, UpstreamError> {
///         Ok(vec![])
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait NoteSource: Send + Sync {
    /// Fetches the profile of the logged-in account.
    async fn self_info(&self) -> Result<SelfInfo, UpstreamError>;

    /// Fetches the notes posted by `user_id`, newest first.
    ///
    /// # Errors
    ///
    /// - `UpstreamError::SessionExpired` if the cookie was rejected
    /// - `UpstreamError::Http` / `Status` on network failures
    async fn fetch_content_list(&self, user_id: &str) -> Result<Vec<NoteSummary>, UpstreamError>;

    /// Fetches the first page of accounts that followed the logged-in user.
    async fn fetch_follower_list(&self) -> Result<FollowerPage, UpstreamError>;

    /// Fetches the detail record of one note.
    ///
    /// Returns `Ok(None)` when the platform has no such note (deleted,
    /// private, or the id is unknown).
    async fn fetch_item_detail(&self, note_id: &str) -> Result<Option<NoteDetail>, UpstreamError>;

    /// Publishes an image note.
    ///
    /// The default implementation reports the operation as unsupported.
    async fn publish_image_note(
        &self,
        request: &PublishRequest,
    ) -> Result<PublishedNote, UpstreamError> {
        let _ = request;
        Err(UpstreamError::Unsupported(self.name()))
    }

    /// Returns whether this source holds usable credentials.
    fn is_authenticated(&self) -> bool;

    /// Returns the name of this source, for logging.
    fn name(&self) -> &'static str;
}

/// Builds a [`NoteSource`] from a session cookie.
///
/// The console uses this at login so it never needs to know which concrete
/// client it is talking to.
pub trait SourceFactory: Send + Sync {
    /// Creates a source bound to `cookie`. Must not perform network I/O.
    fn connect(&self, cookie: &str) -> Result<Arc<dyn NoteSource>, UpstreamError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockSource {
        notes: Vec<NoteSummary>,
    }

    #[async_trait]
    impl NoteSource for MockSource {
        async fn self_info(&self) -> Result<SelfInfo, UpstreamError> {
            Ok(SelfInfo {
                user_id: "u1".to_string(),
                nickname: "mock".to_string(),
                avatar: String::new(),
            })
        }

        async fn fetch_content_list(
            &self,
            _user_id: &str,
        ) -> Result<Vec<NoteSummary>, UpstreamError> {
            Ok(self.notes.clone())
        }

        async fn fetch_follower_list(&self) -> Result<FollowerPage, UpstreamError> {
            Ok(FollowerPage::default())
        }

        async fn fetch_item_detail(
            &self,
            note_id: &str,
        ) -> Result<Option<NoteDetail>, UpstreamError> {
            Ok((note_id == "known").then(|| NoteDetail::new(note_id, "Known")))
        }

        fn is_authenticated(&self) -> bool {
            true
        }

        fn name(&self) -> &'static str {
            "mock"
        }
    }

    #[tokio::test]
    async fn test_mock_source() {
        let source = MockSource { notes: vec![] };

        assert!(source.fetch_content_list("u1").await.unwrap().is_empty());
        assert!(source.fetch_item_detail("known").await.unwrap().is_some());
        assert!(source.fetch_item_detail("other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_default_publish_is_unsupported() {
        let source = MockSource { notes: vec![] };
        let request = PublishRequest::new("t", "d", vec!["a.jpg".into()]);

        let err = source.publish_image_note(&request).await.unwrap_err();
        assert!(matches!(err, UpstreamError::Unsupported("mock")));
    }
}
