//! Factory producing platform clients at login.

use std::sync::Arc;

use super::config::ClientConfig;
use super::http::{XhsClient, build_http_client};
use super::sign::{NoSigner, RequestSigner, SignServer};
use crate::error::UpstreamError;
use crate::source::{NoteSource, SourceFactory};

/// Builds [`XhsClient`]s that share one connection pool and signer.
#[derive(Clone)]
pub struct XhsClientFactory {
    config: ClientConfig,
    http: reqwest::Client,
    signer: Arc<dyn RequestSigner>,
}

impl XhsClientFactory {
    /// Creates a factory. A configured sign endpoint selects [`SignServer`],
    /// otherwise requests go out unsigned.
    pub fn new(config: ClientConfig) -> Result<Self, UpstreamError> {
        config.validate()?;
        let http = build_http_client(&config)?;

        let signer: Arc<dyn RequestSigner> = match config.sign_endpoint() {
            Some(endpoint) => Arc::new(SignServer::new(
                http.clone(),
                endpoint,
                config.sign_attempts(),
            )),
            None => Arc::new(NoSigner),
        };

        Ok(Self {
            config,
            http,
            signer,
        })
    }

    /// Replaces the signer.
    pub fn with_signer(mut self, signer: Arc<dyn RequestSigner>) -> Self {
        self.signer = signer;
        self
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl SourceFactory for XhsClientFactory {
    fn connect(&self, cookie: &str) -> Result<Arc<dyn NoteSource>, UpstreamError> {
        let client = XhsClient::with_http_client(
            self.http.clone(),
            self.config.clone(),
            cookie,
            Arc::clone(&self.signer),
        )?;
        Ok(Arc::new(client))
    }
}

impl std::fmt::Debug for XhsClientFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XhsClientFactory")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
