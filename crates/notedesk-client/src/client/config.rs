//! Platform client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::UpstreamError;

/// Configuration for the platform client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the JSON API.
    #[serde(default = "default_api_host")]
    api_host: String,

    /// Web origin sent as `Origin` / `Referer`.
    #[serde(default = "default_web_origin")]
    web_origin: String,

    /// Creator site, used as referer when publishing.
    #[serde(default = "default_creator_origin")]
    creator_origin: String,

    /// Browser user agent sent with every request.
    #[serde(default = "default_user_agent")]
    user_agent: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,

    /// Signing service endpoint (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sign_endpoint: Option<String>,

    /// Attempts made against the signing service before giving up.
    #[serde(default = "default_sign_attempts")]
    sign_attempts: u32,

    /// Page size for list endpoints.
    #[serde(default = "default_page_size")]
    page_size: u32,
}

fn default_api_host() -> String {
    "https://edith.xiaohongshu.com".to_string()
}

fn default_web_origin() -> String {
    "https://www.xiaohongshu.com".to_string()
}

fn default_creator_origin() -> String {
    "https://creator.xiaohongshu.com".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.114 Safari/537.36"
        .to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_sign_attempts() -> u32 {
    5
}

fn default_page_size() -> u32 {
    20
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_host: default_api_host(),
            web_origin: default_web_origin(),
            creator_origin: default_creator_origin(),
            user_agent: default_user_agent(),
            request_timeout_secs: default_request_timeout_secs(),
            sign_endpoint: None,
            sign_attempts: default_sign_attempts(),
            page_size: default_page_size(),
        }
    }
}

impl ClientConfig {
    /// Creates a new builder for ClientConfig.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Returns the API base URL, without trailing slash.
    pub fn api_host(&self) -> &str {
        self.api_host.trim_end_matches('/')
    }

    /// Returns the web origin, without trailing slash.
    pub fn web_origin(&self) -> &str {
        self.web_origin.trim_end_matches('/')
    }

    /// Returns the creator site origin, without trailing slash.
    pub fn creator_origin(&self) -> &str {
        self.creator_origin.trim_end_matches('/')
    }

    /// Returns the user agent.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Returns the per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Returns the signing service endpoint.
    pub fn sign_endpoint(&self) -> Option<&str> {
        self.sign_endpoint.as_deref()
    }

    /// Returns the number of signing attempts.
    pub fn sign_attempts(&self) -> u32 {
        self.sign_attempts
    }

    /// Returns the list page size.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), UpstreamError> {
        for (name, value) in [
            ("api_host", &self.api_host),
            ("web_origin", &self.web_origin),
            ("creator_origin", &self.creator_origin),
        ] {
            if !(value.starts_with("https://") || value.starts_with("http://")) {
                return Err(UpstreamError::InvalidConfig(format!(
                    "{name} must be an http(s) URL, got '{value}'"
                )));
            }
        }

        if self.request_timeout_secs == 0 {
            return Err(UpstreamError::InvalidConfig(
                "request timeout must be > 0".to_string(),
            ));
        }

        if self.sign_attempts == 0 {
            return Err(UpstreamError::InvalidConfig(
                "sign attempts must be > 0".to_string(),
            ));
        }

        if self.page_size == 0 {
            return Err(UpstreamError::InvalidConfig(
                "page size must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for ClientConfig.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    api_host: Option<String>,
    web_origin: Option<String>,
    creator_origin: Option<String>,
    user_agent: Option<String>,
    request_timeout_secs: Option<u64>,
    sign_endpoint: Option<String>,
    sign_attempts: Option<u32>,
    page_size: Option<u32>,
}

impl ClientConfigBuilder {
    /// Sets the API base URL.
    pub fn api_host(mut self, host: impl Into<String>) -> Self {
        self.api_host = Some(host.into());
        self
    }

    /// Sets the web origin.
    pub fn web_origin(mut self, origin: impl Into<String>) -> Self {
        self.web_origin = Some(origin.into());
        self
    }

    /// Sets the creator site origin.
    pub fn creator_origin(mut self, origin: impl Into<String>) -> Self {
        self.creator_origin = Some(origin.into());
        self
    }

    /// Sets the user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Sets the per-request timeout in seconds.
    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = Some(secs);
        self
    }

    /// Sets the signing service endpoint.
    pub fn sign_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.sign_endpoint = Some(endpoint.into());
        self
    }

    /// Sets the number of signing attempts.
    pub fn sign_attempts(mut self, attempts: u32) -> Self {
        self.sign_attempts = Some(attempts);
        self
    }

    /// Sets the list page size.
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> Result<ClientConfig, UpstreamError> {
        let config = ClientConfig {
            api_host: self.api_host.unwrap_or_else(default_api_host),
            web_origin: self.web_origin.unwrap_or_else(default_web_origin),
            creator_origin: self.creator_origin.unwrap_or_else(default_creator_origin),
            user_agent: self.user_agent.unwrap_or_else(default_user_agent),
            request_timeout_secs: self
                .request_timeout_secs
                .unwrap_or_else(default_request_timeout_secs),
            sign_endpoint: self.sign_endpoint.filter(|s| !s.trim().is_empty()),
            sign_attempts: self.sign_attempts.unwrap_or_else(default_sign_attempts),
            page_size: self.page_size.unwrap_or_else(default_page_size),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = ClientConfig::builder().build().unwrap();

        assert_eq!(config.api_host(), "https://edith.xiaohongshu.com");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.sign_attempts(), 5);
        assert_eq!(config.page_size(), 20);
        assert!(config.sign_endpoint().is_none());
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = ClientConfig::builder()
            .api_host("http://127.0.0.1:9000/")
            .build()
            .unwrap();

        assert_eq!(config.api_host(), "http://127.0.0.1:9000");
    }

    #[test]
    fn test_blank_sign_endpoint_ignored() {
        let config = ClientConfig::builder().sign_endpoint("  ").build().unwrap();
        assert!(config.sign_endpoint().is_none());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(ClientConfig::builder().api_host("edith").build().is_err());
        assert!(ClientConfig::builder().request_timeout_secs(0).build().is_err());
        assert!(ClientConfig::builder().sign_attempts(0).build().is_err());
        assert!(ClientConfig::builder().page_size(0).build().is_err());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"sign_endpoint":"http://localhost:5005/sign"}"#).unwrap();

        assert_eq!(config.sign_endpoint(), Some("http://localhost:5005/sign"));
        assert_eq!(config.web_origin(), "https://www.xiaohongshu.com");
    }
}
