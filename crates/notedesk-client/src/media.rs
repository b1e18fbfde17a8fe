//! Remote image fetching for the console's image proxy.
//!
//! Platform CDNs refuse hotlinked requests, so the console fetches images
//! server-side with browser-like headers.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, ORIGIN, REFERER};
use tracing::debug;

use crate::error::UpstreamError;

/// Content type reported when the upstream omits one.
pub const DEFAULT_IMAGE_TYPE: &str = "image/jpeg";

/// A downloaded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Fetches remote images with browser headers.
#[derive(Debug, Clone)]
pub struct ImageFetcher {
    http: reqwest::Client,
}

impl ImageFetcher {
    /// Creates a fetcher.
    pub fn new(
        user_agent: &str,
        web_origin: &str,
        timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("image/avif,image/webp,image/apng,image/*,*/*;q=0.8"),
        );
        let origin = HeaderValue::from_str(web_origin)
            .map_err(|_| UpstreamError::InvalidConfig(format!("invalid origin '{web_origin}'")))?;
        let referer = HeaderValue::from_str(&format!("{web_origin}/"))
            .map_err(|_| UpstreamError::InvalidConfig(format!("invalid origin '{web_origin}'")))?;
        headers.insert(ORIGIN, origin);
        headers.insert(REFERER, referer);

        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { http })
    }

    /// Downloads `url`.
    ///
    /// # Errors
    ///
    /// - `UpstreamError::InvalidUrl` if `url` is not http(s)
    /// - `UpstreamError::Status` if the upstream answered non-200
    /// - `UpstreamError::Http` on transport failure or timeout
    pub async fn fetch(&self, url: &str) -> Result<FetchedImage, UpstreamError> {
        let parsed = validate_url(url)?;

        let response = self.http.get(parsed).send().await?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            debug!(url = %url, status = status.as_u16(), "Image upstream refused");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body: String::new(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_IMAGE_TYPE)
            .to_string();
        let bytes = response.bytes().await?.to_vec();

        debug!(url = %url, size = bytes.len(), content_type = %content_type, "Image fetched");
        Ok(FetchedImage {
            content_type,
            bytes,
        })
    }
}

/// Accepts only absolute http(s) URLs.
pub fn validate_url(url: &str) -> Result<reqwest::Url, UpstreamError> {
    let parsed = reqwest::Url::parse(url.trim())
        .map_err(|e| UpstreamError::InvalidUrl(format!("{url}: {e}")))?;

    if matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some() {
        Ok(parsed)
    } else {
        Err(UpstreamError::InvalidUrl(format!(
            "unsupported url '{url}'"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://sns-img.example.com/a.jpg").is_ok());
        assert!(validate_url("http://127.0.0.1:8080/a.jpg").is_ok());
        assert!(validate_url("file:///etc/passwd").is_err());
        assert!(validate_url("ftp://host/a.jpg").is_err());
        assert!(validate_url("not a url").is_err());
        assert!(validate_url("").is_err());
    }

    #[test]
    fn test_fetcher_rejects_bad_origin() {
        let result = ImageFetcher::new("ua", "bad\norigin", Duration::from_secs(10));
        assert!(matches!(result, Err(UpstreamError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_fetch_rejects_non_http_before_network() {
        let fetcher =
            ImageFetcher::new("ua", "https://www.xiaohongshu.com", Duration::from_secs(1)).unwrap();

        let err = fetcher.fetch("javascript:alert(1)").await.unwrap_err();
        assert!(matches!(err, UpstreamError::InvalidUrl(_)));
    }
}
