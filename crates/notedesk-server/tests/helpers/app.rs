//! A fully wired console backed by [`FakeSource`].

use std::sync::Arc;
use std::time::Duration;

use notedesk_client::{ActiveSession, ImageFetcher, Session, SessionStore};
use notedesk_server::cache::{CacheConfig, CacheService};
use notedesk_server::metrics::detached_handle;
use notedesk_server::{AppState, create_router_with_state};
use tempfile::TempDir;

use super::client::TestClient;
use super::fake_source::{FakeFactory, FakeSource};

pub const BODY_LIMIT: usize = 1024 * 1024;

pub struct TestApp {
    pub client: TestClient,
    pub state: AppState,
    pub source: Arc<FakeSource>,
    pub factory: Arc<FakeFactory>,
    pub dir: TempDir,
}

impl TestApp {
    /// Builds an app with no session.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let source = FakeSource::new();
        let factory = FakeFactory::new(Arc::clone(&source));

        let cache = CacheService::new(CacheConfig::default(), Arc::new(Session::new()));
        let images = ImageFetcher::new(
            "notedesk-tests",
            "https://www.example.com",
            Duration::from_secs(1),
        )
        .unwrap();

        let state = AppState::new(
            Arc::new(cache),
            SessionStore::new(dir.path().join("config.json")),
            factory.clone(),
            images,
            dir.path().join("uploads"),
        );
        let client = TestClient::new(create_router_with_state(
            state.clone(),
            detached_handle(),
            BODY_LIMIT,
        ));

        Self {
            client,
            state,
            source,
            factory,
            dir,
        }
    }

    /// Builds an app with an active session for user `u-1`.
    pub fn logged_in() -> Self {
        let app = Self::new();
        app.state.session().replace(
            ActiveSession::new(app.source.clone()).with_identity(Some("u-1".to_string()), None),
        );
        app
    }

    pub fn session_file(&self) -> std::path::PathBuf {
        self.dir.path().join("config.json")
    }
}

/// Polls `check` every millisecond of tokio time until it holds.
pub async fn wait_for(mut check: impl FnMut() -> bool) {
    for _ in 0..100_000 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("condition not met in time");
}

/// Waits until the refresher finished `runs` runs.
pub async fn wait_for_runs(cache: &CacheService, runs: u64) {
    wait_for(|| cache.refresher().completed_runs() >= runs).await;
}
