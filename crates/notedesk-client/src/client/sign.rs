//! Request signing.
//!
//! The platform rejects unsigned calls to most web endpoints. Signatures are
//! produced outside this crate (a headless browser, a sidecar service), so
//! signing is a trait and the client only knows how to attach the result.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::UpstreamError;

/// Headers produced by a signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedHeaders {
    #[serde(rename = "x-s")]
    pub x_s: String,
    #[serde(rename = "x-t")]
    pub x_t: String,
}

/// Produces signature headers for a platform request.
#[async_trait]
pub trait RequestSigner: Send + Sync {
    /// Signs `uri` (path plus query) and the optional JSON body.
    ///
    /// Returns `Ok(None)` when the request should go out unsigned.
    async fn sign(
        &self,
        uri: &str,
        data: Option<&Value>,
        a1: &str,
        web_session: &str,
    ) -> Result<Option<SignedHeaders>, UpstreamError>;
}

/// Signer that never signs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSigner;

#[async_trait]
impl RequestSigner for NoSigner {
    async fn sign(
        &self,
        _uri: &str,
        _data: Option<&Value>,
        _a1: &str,
        _web_session: &str,
    ) -> Result<Option<SignedHeaders>, UpstreamError> {
        Ok(None)
    }
}

#[derive(Serialize)]
struct SignPayload<'a> {
    uri: &'a str,
    data: Option<&'a Value>,
    a1: &'a str,
    web_session: &'a str,
}

/// Signer backed by an HTTP signing service.
///
/// POSTs `{uri, data, a1, web_session}` and expects `{"x-s": .., "x-t": ..}`
/// back. Transient failures are retried after a fixed delay; a 4xx answer
/// ends the call at once.
#[derive(Debug, Clone)]
pub struct SignServer {
    http: reqwest::Client,
    endpoint: String,
    attempts: u32,
    retry_delay: Duration,
}

impl SignServer {
    /// Creates a signer for `endpoint` with the given attempt budget.
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>, attempts: u32) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            attempts: attempts.max(1),
            retry_delay: Duration::from_secs(1),
        }
    }

    /// Overrides the delay between attempts.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Returns the signing endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn attempt(&self, payload: &SignPayload<'_>) -> Result<SignedHeaders, UpstreamError> {
        let response = self.http.post(&self.endpoint).json(payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let headers: SignedHeaders = response
            .json()
            .await
            .map_err(|e| UpstreamError::sign(format!("malformed sign response: {e}")))?;

        if headers.x_s.is_empty() {
            return Err(UpstreamError::sign("sign service returned an empty x-s"));
        }

        Ok(headers)
    }
}

#[async_trait]
impl RequestSigner for SignServer {
    async fn sign(
        &self,
        uri: &str,
        data: Option<&Value>,
        a1: &str,
        web_session: &str,
    ) -> Result<Option<SignedHeaders>, UpstreamError> {
        let payload = SignPayload {
            uri,
            data,
            a1,
            web_session,
        };

        let mut last_error = None;
        for attempt in 1..=self.attempts {
            match self.attempt(&payload).await {
                Ok(headers) => {
                    debug!(uri = %uri, attempt, "Request signed");
                    return Ok(Some(headers));
                }
                Err(e) if !e.is_transient() => {
                    warn!(uri = %uri, attempt, error = %e, "Signing failed, not retrying");
                    return Err(UpstreamError::sign(format!(
                        "sign service call failed: {e}"
                    )));
                }
                Err(e) => {
                    warn!(uri = %uri, attempt, error = %e, "Signing failed, retrying");
                    last_error = Some(e);
                    if attempt < self.attempts {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }

        Err(UpstreamError::sign(format!(
            "gave up after {} attempts: {}",
            self.attempts,
            last_error.map(|e| e.to_string()).unwrap_or_default()
        )))
    }
}
