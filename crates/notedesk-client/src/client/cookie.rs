//! Cookie string parsing.

use std::collections::HashMap;

/// A parsed `Cookie` header value.
///
/// The raw string is what gets sent upstream; the parsed pairs are only used
/// to pull out the values the signer needs.
///
/// ```
/// use notedesk_client::CookieJar;
///
/// let jar = CookieJar::parse("a1=abc; web_session=xyz; other=1");
/// assert_eq!(jar.a1(), "abc");
/// assert_eq!(jar.web_session(), "xyz");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    raw: String,
    pairs: HashMap<String, String>,
}

impl CookieJar {
    /// Parses `name=value` pairs separated by `;`.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim().to_string();
        let pairs = raw
            .split(';')
            .filter_map(|part| part.split_once('='))
            .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
            .filter(|(name, _)| !name.is_empty())
            .collect();

        Self { raw, pairs }
    }

    /// Returns the cookie string as given.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns true if the cookie string is blank.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the value of cookie `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs.get(name).map(String::as_str)
    }

    /// Returns the `a1` device cookie, or an empty string.
    pub fn a1(&self) -> &str {
        self.get("a1").unwrap_or_default()
    }

    /// Returns the `web_session` cookie, or an empty string.
    pub fn web_session(&self) -> &str {
        self.get("web_session").unwrap_or_default()
    }
}
