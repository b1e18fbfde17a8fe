//! Response bodies shared by several handlers.

use serde::Serialize;

use crate::cache::Fetched;

/// Body of every cache-backed read.
///
/// `loading` is true only when nothing was cached yet; the client should poll
/// again shortly. `stale` marks a payload served past its TTL while a refresh
/// runs in the background.
#[derive(Debug, Clone, Serialize)]
pub struct CachedResponse<T> {
    pub data: T,
    pub loading: bool,
    pub stale: bool,
    pub age_secs: Option<u64>,
}

impl<T> CachedResponse<T> {
    /// Builds a response from a cache read, with `data` already extracted.
    pub fn new<P>(fetched: &Fetched<P>, data: T) -> Self {
        Self {
            data,
            loading: fetched.is_loading,
            stale: fetched.is_stale,
            age_secs: fetched.age.map(|age| age.as_secs()),
        }
    }
}

impl<T: Default + Clone> From<Fetched<T>> for CachedResponse<T> {
    fn from(fetched: Fetched<T>) -> Self {
        let data = fetched.payload_or_default();
        Self::new(&fetched, data)
    }
}

/// Body of `GET /api/session`, `POST /login` and `POST /logout`.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    pub user_id: Option<String>,
    pub nickname: Option<String>,
}

impl SessionResponse {
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            user_id: None,
            nickname: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_cached_response_from_fetched() {
        let fetched = Fetched {
            payload: Some(Arc::new(vec![1, 2, 3])),
            is_loading: false,
            is_stale: true,
            age: Some(Duration::from_millis(4_500)),
        };

        let body = serde_json::to_value(CachedResponse::from(fetched)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"data": [1, 2, 3], "loading": false, "stale": true, "age_secs": 4})
        );
    }

    #[test]
    fn test_loading_serializes_empty_data() {
        let fetched = Fetched::<Vec<u32>> {
            payload: None,
            is_loading: true,
            is_stale: false,
            age: None,
        };

        let body = serde_json::to_value(CachedResponse::from(fetched)).unwrap();
        assert_eq!(body["data"], serde_json::json!([]));
        assert_eq!(body["loading"], true);
        assert!(body["age_secs"].is_null());
    }
}
