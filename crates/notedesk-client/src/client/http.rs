//! Cookie-authenticated HTTP client for the notes platform.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use notedesk_core::{
    FollowerPage, NoteDetail, NoteSummary, PublishRequest, PublishedNote, SelfInfo,
};
use reqwest::header::{CONTENT_TYPE, COOKIE, HeaderMap, HeaderValue, ORIGIN, REFERER};
use reqwest::{Method, Url};
use serde_json::{Value, json};
use tracing::{debug, instrument, warn};

use super::config::ClientConfig;
use super::cookie::CookieJar;
use super::sign::RequestSigner;
use super::tokens::{XsecTokens, generate_token};
use crate::error::UpstreamError;
use crate::parse;
use crate::source::NoteSource;

const SELF_INFO_PATH: &str = "/api/sns/web/v2/user/me";
const USER_POSTED_PATH: &str = "/api/sns/web/v1/user_posted";
const CONNECTIONS_PATH: &str = "/api/sns/web/v1/you/connections";
const FEED_PATH: &str = "/api/sns/web/v1/feed";
const COMMENTS_PATH: &str = "/api/sns/web/v2/comment/page";
const UPLOAD_PERMIT_PATH: &str = "/api/media/v1/upload/web/permit";
const CREATE_NOTE_PATH: &str = "/web_api/sns/v2/note";

/// Scheduled publish times are wall-clock times in the platform's zone (UTC+8).
const PLATFORM_UTC_OFFSET_SECS: i64 = 8 * 3600;

/// HTTP client bound to one cookie session.
///
/// Implements [`NoteSource`] on top of the platform's web API.
pub struct XhsClient {
    config: ClientConfig,
    http: reqwest::Client,
    cookie: CookieJar,
    signer: Arc<dyn RequestSigner>,
    tokens: Arc<XsecTokens>,
}

impl XhsClient {
    /// Creates a client with its own connection pool.
    pub fn new(
        config: ClientConfig,
        cookie: &str,
        signer: Arc<dyn RequestSigner>,
    ) -> Result<Self, UpstreamError> {
        let http = build_http_client(&config)?;
        Self::with_http_client(http, config, cookie, signer)
    }

    /// Creates a client that shares an existing connection pool.
    pub fn with_http_client(
        http: reqwest::Client,
        config: ClientConfig,
        cookie: &str,
        signer: Arc<dyn RequestSigner>,
    ) -> Result<Self, UpstreamError> {
        let cookie = CookieJar::parse(cookie);
        if cookie.is_empty() {
            return Err(UpstreamError::NotAuthenticated);
        }
        HeaderValue::from_str(cookie.raw())
            .map_err(|_| UpstreamError::InvalidConfig("cookie contains invalid characters".into()))?;

        Ok(Self {
            config,
            http,
            cookie,
            signer,
            tokens: Arc::new(XsecTokens::new()),
        })
    }

    /// Returns the parsed cookie.
    pub fn cookie(&self) -> &CookieJar {
        &self.cookie
    }

    /// Returns the xsec token memo.
    pub fn tokens(&self) -> &XsecTokens {
        &self.tokens
    }

    fn api_url(&self, path: &str, params: &[(&str, String)]) -> Result<Url, UpstreamError> {
        let mut url = Url::parse(&format!("{}{}", self.config.api_host(), path))
            .map_err(|e| UpstreamError::InvalidUrl(e.to_string()))?;
        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    async fn headers(
        &self,
        url: &Url,
        body: Option<&Value>,
        referer: &str,
    ) -> Result<HeaderMap, UpstreamError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(self.cookie.raw())
                .map_err(|_| UpstreamError::InvalidConfig("invalid cookie".into()))?,
        );
        if let Ok(origin) = HeaderValue::from_str(self.config.web_origin()) {
            headers.insert(ORIGIN, origin);
        }
        if let Ok(referer) = HeaderValue::from_str(&format!("{referer}/")) {
            headers.insert(REFERER, referer);
        }

        let uri = signed_uri(url);
        let signed = self
            .signer
            .sign(&uri, body, self.cookie.a1(), self.cookie.web_session())
            .await?;
        if let Some(signed) = signed {
            for (name, value) in [("x-s", signed.x_s), ("x-t", signed.x_t)] {
                let value = HeaderValue::from_str(&value)
                    .map_err(|_| UpstreamError::sign(format!("invalid {name} header")))?;
                headers.insert(name, value);
            }
        }

        Ok(headers)
    }

    async fn get(&self, path: &str, params: &[(&str, String)]) -> Result<Value, UpstreamError> {
        let url = self.api_url(path, params)?;
        let headers = self.headers(&url, None, self.config.web_origin()).await?;

        debug!(path = %path, "GET");
        let response = self.http.get(url).headers(headers).send().await?;
        decode_response(response).await
    }

    async fn post(&self, path: &str, body: &Value, referer: &str) -> Result<Value, UpstreamError> {
        let url = self.api_url(path, &[])?;
        let mut headers = self.headers(&url, Some(body), referer).await?;
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json;charset=UTF-8"),
        );

        debug!(path = %path, "POST");
        let response = self
            .http
            .request(Method::POST, url)
            .headers(headers)
            .json(body)
            .send()
            .await?;
        decode_response(response).await
    }

    async fn fetch_comments(
        &self,
        note_id: &str,
        xsec_token: &str,
    ) -> Result<Vec<notedesk_core::Comment>, UpstreamError> {
        let params = [
            ("note_id", note_id.to_string()),
            ("cursor", String::new()),
            ("top_comment_id", String::new()),
            ("image_formats", "jpg,webp,avif".to_string()),
            ("xsec_token", xsec_token.to_string()),
        ];
        let data = self.get(COMMENTS_PATH, &params).await?;
        Ok(parse::parse_comments(&data))
    }

    /// Uploads one image and returns its platform file id.
    async fn upload_image(&self, path: &Path) -> Result<(String, &'static str), UpstreamError> {
        let params = [
            ("biz_name", "spectrum".to_string()),
            ("scene", "image".to_string()),
            ("file_count", "1".to_string()),
            ("version", "1".to_string()),
            ("source", "web".to_string()),
        ];
        let data = self.get(UPLOAD_PERMIT_PATH, &params).await?;

        let permit = data
            .get("uploadTempPermits")
            .and_then(Value::as_array)
            .and_then(|permits| permits.first())
            .ok_or_else(|| UpstreamError::decode("upload permit missing"))?;
        let file_id = permit
            .get("fileIds")
            .and_then(Value::as_array)
            .and_then(|ids| ids.first())
            .map(parse::text)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| UpstreamError::decode("upload permit has no file id"))?;
        let token = parse::field(permit, "token");
        let upload_addr = parse::field(permit, "uploadAddr");
        if upload_addr.is_empty() {
            return Err(UpstreamError::decode("upload permit has no upload address"));
        }

        let bytes = tokio::fs::read(path).await?;
        let mime = image_mime(path);
        let url = format!("https://{upload_addr}/{file_id}");

        let response = self
            .http
            .put(&url)
            .header("X-Cos-Security-Token", token)
            .header(CONTENT_TYPE, mime)
            .body(bytes)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(file = %path.display(), file_id = %file_id, "Image uploaded");
        Ok((file_id, mime))
    }
}

impl std::fmt::Debug for XhsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XhsClient")
            .field("api_host", &self.config.api_host())
            .field("has_a1", &!self.cookie.a1().is_empty())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl NoteSource for XhsClient {
    #[instrument(skip_all)]
    async fn self_info(&self) -> Result<SelfInfo, UpstreamError> {
        let data = self.get(SELF_INFO_PATH, &[]).await?;
        Ok(parse::parse_self_info(&data))
    }

    #[instrument(skip(self))]
    async fn fetch_content_list(&self, user_id: &str) -> Result<Vec<NoteSummary>, UpstreamError> {
        let params = [
            ("num", self.config.page_size().to_string()),
            ("cursor", String::new()),
            ("user_id", user_id.to_string()),
            ("image_scenes", "FD_WM_WEBP".to_string()),
            ("xsec_source", "pc_profile".to_string()),
            ("xsec_token", generate_token()),
        ];
        let data = self.get(USER_POSTED_PATH, &params).await?;
        let parsed = parse::parse_user_notes(&data);

        for (note_id, token) in parsed.tokens {
            self.tokens.remember(note_id, token);
        }

        debug!(count = parsed.notes.len(), "Content list fetched");
        Ok(parsed.notes)
    }

    #[instrument(skip_all)]
    async fn fetch_follower_list(&self) -> Result<FollowerPage, UpstreamError> {
        let params = [
            ("num", self.config.page_size().to_string()),
            ("cursor", String::new()),
        ];
        let data = self.get(CONNECTIONS_PATH, &params).await?;
        let page = parse::parse_followers(&data);

        debug!(count = page.len(), has_more = page.has_more, "Follower list fetched");
        Ok(page)
    }

    #[instrument(skip(self))]
    async fn fetch_item_detail(&self, note_id: &str) -> Result<Option<NoteDetail>, UpstreamError> {
        let xsec_token = self.tokens.get_or_generate(note_id);
        let body = json!({
            "source_note_id": note_id,
            "image_formats": ["jpg", "webp", "avif"],
            "extra": {"need_body_topic": "1"},
            "xsec_source": "pc_search",
            "xsec_token": xsec_token,
        });

        let data = self.post(FEED_PATH, &body, self.config.web_origin()).await?;
        let Some(card) = parse::parse_feed(&data) else {
            debug!("Feed returned no note card");
            return Ok(None);
        };

        let card_token = parse::field(card, "xsec_token");
        let xsec_token = if card_token.is_empty() {
            xsec_token
        } else {
            self.tokens.remember(note_id, card_token.clone());
            card_token
        };

        let mut detail = parse::parse_note_card(note_id, card);
        match self.fetch_comments(note_id, &xsec_token).await {
            Ok(comments) => detail.comments = comments,
            Err(e) => warn!(error = %e, "Failed to fetch comments, continuing without"),
        }

        Ok(Some(detail))
    }

    #[instrument(skip_all, fields(images = request.image_paths.len()))]
    async fn publish_image_note(
        &self,
        request: &PublishRequest,
    ) -> Result<PublishedNote, UpstreamError> {
        let mut images = Vec::with_capacity(request.image_paths.len());
        for path in &request.image_paths {
            let (file_id, mime) = self.upload_image(path).await?;
            images.push(json!({
                "file_id": file_id,
                "metadata": {"source": -1},
                "stickers": {"version": 2, "floating": []},
                "extra_info_json": json!({"mimeType": mime}).to_string(),
            }));
        }

        let mut binds = json!({
            "version": 1,
            "noteId": 0,
            "noteOrderBind": {},
            "notePostTiming": {},
            "noteCollectionBind": {"id": ""},
        });
        if let Some(post_time) = request.post_time.as_deref() {
            let millis = schedule_millis(post_time).ok_or_else(|| {
                UpstreamError::InvalidConfig(format!("invalid post time '{post_time}'"))
            })?;
            binds["notePostTiming"] = json!({"postTime": millis.to_string()});
        }

        let body = json!({
            "common": {
                "type": "normal",
                "title": request.title,
                "note_id": "",
                "desc": request.desc,
                "source": r#"{"type":"web","ids":"","extraInfo":"{\"subType\":\"official\"}"}"#,
                "business_binds": binds.to_string(),
                "ats": request.ats,
                "hash_tag": request.topics,
                "post_loc": {},
                "privacy_info": {"op_type": 1, "type": u8::from(request.is_private)},
            },
            "image_info": {"images": images},
            "video_info": null,
        });

        let data = self
            .post(CREATE_NOTE_PATH, &body, self.config.creator_origin())
            .await?;
        let note_id = [parse::field(&data, "id"), parse::field(&data, "note_id")]
            .into_iter()
            .find(|id| !id.is_empty())
            .ok_or_else(|| UpstreamError::decode("publish response has no note id"))?;

        debug!(note_id = %note_id, "Note published");
        Ok(PublishedNote { note_id })
    }

    fn is_authenticated(&self) -> bool {
        !self.cookie.is_empty()
    }

    fn name(&self) -> &'static str {
        "xhs"
    }
}

/// Builds the shared reqwest client used for platform calls.
pub fn build_http_client(config: &ClientConfig) -> Result<reqwest::Client, UpstreamError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        reqwest::header::ACCEPT,
        HeaderValue::from_static("application/json, text/plain, */*"),
    );

    reqwest::Client::builder()
        .user_agent(config.user_agent())
        .default_headers(headers)
        .timeout(config.request_timeout())
        .build()
        .map_err(UpstreamError::from)
}

async fn decode_response(response: reqwest::Response) -> Result<Value, UpstreamError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(UpstreamError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let body: Value = response
        .json()
        .await
        .map_err(|e| UpstreamError::decode(format!("invalid JSON body: {e}")))?;
    parse::unwrap_envelope(body)
}

/// Path plus query, the form the signer expects.
fn signed_uri(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

fn image_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    }
}

/// Converts `YYYY-MM-DD HH:MM:SS` (platform local time) to epoch milliseconds.
fn schedule_millis(raw: &str) -> Option<i64> {
    let (date, time) = raw.trim().split_once(' ')?;

    let mut date_parts = date.splitn(3, '-').map(|p| p.parse::<i64>().ok());
    let (year, month, day) = (date_parts.next()??, date_parts.next()??, date_parts.next()??);

    let mut time_parts = time.splitn(3, ':').map(|p| p.parse::<i64>().ok());
    let (hour, minute, second) = (time_parts.next()??, time_parts.next()??, time_parts.next()??);

    if !(1..=12).contains(&month)
        || !(1..=31).contains(&day)
        || !(0..24).contains(&hour)
        || !(0..60).contains(&minute)
        || !(0..60).contains(&second)
    {
        return None;
    }

    let days = days_from_civil(year, month, day);
    let local_secs = days * 86_400 + hour * 3600 + minute * 60 + second;
    Some((local_secs - PLATFORM_UTC_OFFSET_SECS) * 1000)
}

/// Days since 1970-01-01 for a proleptic Gregorian date.
fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let year = if month <= 2 { year - 1 } else { year };
    let era = year.div_euclid(400);
    let yoe = year - era * 400;
    let mp = (month + 9) % 12;
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}
