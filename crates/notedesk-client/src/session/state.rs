//! Logged-in session handle.

use std::sync::Arc;

use notedesk_core::SelfInfo;
use parking_lot::RwLock;

use crate::source::NoteSource;

/// An authenticated session: the source bound to the cookie plus the
/// account identity, when known.
#[derive(Clone)]
pub struct ActiveSession {
    source: Arc<dyn NoteSource>,
    user_id: Option<String>,
    nickname: Option<String>,
}

impl ActiveSession {
    /// Creates a session with no known identity.
    pub fn new(source: Arc<dyn NoteSource>) -> Self {
        Self {
            source,
            user_id: None,
            nickname: None,
        }
    }

    /// Sets the account identity. Blank values are treated as unknown.
    pub fn with_identity(mut self, user_id: Option<String>, nickname: Option<String>) -> Self {
        self.user_id = user_id.filter(|id| !id.trim().is_empty());
        self.nickname = nickname.filter(|n| !n.trim().is_empty());
        self
    }

    /// Returns the source bound to this session.
    pub fn source(&self) -> &Arc<dyn NoteSource> {
        &self.source
    }

    /// Returns the account's user id.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Returns the account's nickname.
    pub fn nickname(&self) -> Option<&str> {
        self.nickname.as_deref()
    }

    /// Returns true if the bound source holds credentials.
    pub fn is_authenticated(&self) -> bool {
        self.source.is_authenticated()
    }
}

impl std::fmt::Debug for ActiveSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveSession")
            .field("source", &self.source.name())
            .field("user_id", &self.user_id)
            .field("nickname", &self.nickname)
            .finish()
    }
}

/// Shared handle to the current session.
///
/// Readers take a snapshot; login and logout swap the whole value, so a
/// reader never sees a source from one login paired with the identity of
/// another.
#[derive(Debug, Default)]
pub struct Session {
    active: RwLock<Option<Arc<ActiveSession>>>,
}

impl Session {
    /// Creates a handle with no session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the current session.
    pub fn current(&self) -> Option<Arc<ActiveSession>> {
        self.active.read().clone()
    }

    /// Returns the current session if it holds credentials.
    pub fn authenticated(&self) -> Option<Arc<ActiveSession>> {
        self.current().filter(|s| s.is_authenticated())
    }

    /// Returns true if an authenticated session is present.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated().is_some()
    }

    /// Replaces the current session.
    pub fn replace(&self, session: ActiveSession) {
        *self.active.write() = Some(Arc::new(session));
    }

    /// Clears the session. Returns true if one was present.
    pub fn clear(&self) -> bool {
        self.active.write().take().is_some()
    }

    /// Records the identity resolved through `source`.
    ///
    /// Ignored if the session was replaced or cleared since `source` was
    /// read, so a slow lookup cannot attach an identity to a newer login.
    pub fn remember_identity(&self, source: &Arc<dyn NoteSource>, info: &SelfInfo) -> bool {
        let mut active = self.active.write();
        let Some(current) = active.as_ref() else {
            return false;
        };
        if !Arc::ptr_eq(current.source(), source) {
            return false;
        }

        let updated = ActiveSession::clone(current).with_identity(
            info.user_id().map(str::to_string),
            Some(info.nickname.clone()),
        );
        *active = Some(Arc::new(updated));
        true
    }
}
