//! Application state.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use notedesk_client::{
    ImageFetcher, Session, SessionStore, SourceFactory, UpstreamError, XhsClientFactory,
};

use crate::cache::CacheService;
use crate::metrics::CacheMetrics;
use crate::settings::Settings;

/// State shared by every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    cache: Arc<CacheService>,
    session_store: Arc<SessionStore>,
    factory: Arc<dyn SourceFactory>,
    images: Arc<ImageFetcher>,
    upload_dir: PathBuf,
}

impl AppState {
    pub fn new(
        cache: Arc<CacheService>,
        session_store: SessionStore,
        factory: Arc<dyn SourceFactory>,
        images: ImageFetcher,
        upload_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            cache,
            session_store: Arc::new(session_store),
            factory,
            images: Arc::new(images),
            upload_dir: upload_dir.into(),
        }
    }

    /// Builds the production state. Starts the refresh worker, so it must be
    /// called inside a tokio runtime.
    pub fn from_settings(settings: &Settings) -> Result<Self, UpstreamError> {
        let upstream = &settings.upstream;
        let factory = XhsClientFactory::new(upstream.clone())?;
        let images = ImageFetcher::new(
            upstream.user_agent(),
            upstream.web_origin(),
            upstream.request_timeout(),
        )?;

        let cache = CacheService::with_metrics(
            settings.cache.to_cache_config(),
            Arc::new(Session::new()),
            CacheMetrics::new(),
        );

        Ok(Self::new(
            Arc::new(cache),
            SessionStore::new(&settings.session.file),
            Arc::new(factory),
            images,
            &settings.upload.dir,
        ))
    }

    pub fn cache(&self) -> &CacheService {
        &self.cache
    }

    /// The session handle, shared with the cache.
    pub fn session(&self) -> &Arc<Session> {
        self.cache.session()
    }

    pub fn session_store(&self) -> &SessionStore {
        &self.session_store
    }

    pub fn factory(&self) -> &dyn SourceFactory {
        self.factory.as_ref()
    }

    pub fn images(&self) -> &ImageFetcher {
        &self.images
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }
}
