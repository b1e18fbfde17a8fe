//! xsec token memo.

use std::collections::HashMap;

use parking_lot::RwLock;
use uuid::Uuid;

/// Length of a generated xsec token.
pub const TOKEN_LEN: usize = 64;

/// Remembers the xsec token the platform handed out for each note.
///
/// Detail and comment requests are accepted more reliably when they carry the
/// token that came with the note in a list response.
#[derive(Debug, Default)]
pub struct XsecTokens {
    tokens: RwLock<HashMap<String, String>>,
}

impl XsecTokens {
    /// Creates an empty memo.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the token for `note_id`. Blank tokens are ignored.
    pub fn remember(&self, note_id: impl Into<String>, token: impl Into<String>) {
        let token = token.into();
        if token.is_empty() {
            return;
        }
        self.tokens.write().insert(note_id.into(), token);
    }

    /// Returns the token for `note_id`, if one was seen.
    pub fn get(&self, note_id: &str) -> Option<String> {
        self.tokens.read().get(note_id).cloned()
    }

    /// Returns the remembered token or a freshly generated one.
    ///
    /// Generated tokens are not stored.
    pub fn get_or_generate(&self, note_id: &str) -> String {
        self.get(note_id).unwrap_or_else(generate_token)
    }

    /// Returns the number of remembered tokens.
    pub fn len(&self) -> usize {
        self.tokens.read().len()
    }

    /// Returns true if no token has been remembered.
    pub fn is_empty(&self) -> bool {
        self.tokens.read().is_empty()
    }
}

/// Generates a random 64 character alphanumeric token.
pub fn generate_token() -> String {
    let mut token = String::with_capacity(TOKEN_LEN);
    token.push_str(&Uuid::new_v4().simple().to_string());
    token.push_str(&Uuid::new_v4().simple().to_string());
    token
}
