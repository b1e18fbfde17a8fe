//! Error types for platform calls.

/// Platform response code meaning the cookie session is no longer valid.
pub const SESSION_EXPIRED_CODE: i64 = -100;

/// Errors that can occur when talking to the notes platform.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// No cookie session is available.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The platform rejected the cookie session.
    #[error("session expired, log in again")]
    SessionExpired,

    /// Transport-level failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The platform answered with a non-success HTTP status.
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// The platform answered `success: false`.
    #[error("platform error {code}: {message}")]
    Api { code: i64, message: String },

    /// Request signing failed.
    #[error("signing failed: {0}")]
    Sign(String),

    /// A timeout occurred while waiting for the platform.
    #[error("operation timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// The response did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// A URL was rejected before any request was made.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// An I/O error occurred (reading upload files).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid client configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The source does not implement the operation.
    #[error("operation not supported by {0}")]
    Unsupported(&'static str),
}

impl UpstreamError {
    /// Creates a new decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Creates a new signing error.
    pub fn sign(msg: impl Into<String>) -> Self {
        Self::Sign(msg.into())
    }

    /// Maps a `success: false` envelope to an error.
    pub fn from_api(code: i64, message: impl Into<String>) -> Self {
        if code == SESSION_EXPIRED_CODE {
            Self::SessionExpired
        } else {
            Self::Api {
                code,
                message: message.into(),
            }
        }
    }

    /// Returns true if this is a transient error that might succeed on retry.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Sign(_) => true,
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns true if the user has to log in again.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::NotAuthenticated | Self::SessionExpired)
    }
}
