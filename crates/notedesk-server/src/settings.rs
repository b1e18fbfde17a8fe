//! Console settings.
//!
//! Loaded from an optional TOML file, then overridden by environment
//! variables of the form `NOTEDESK_<SECTION>__<KEY>`, for example
//! `NOTEDESK_SERVER__PORT=8080` or `NOTEDESK_CACHE__DETAIL_TTL_SECS=600`.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use notedesk_client::ClientConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cache::CacheConfig;

/// File read when no path is given. Missing is fine.
pub const DEFAULT_SETTINGS_FILE: &str = "notedesk.toml";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "NOTEDESK";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid setting '{field}': {message}")]
    Invalid { field: &'static str, message: String },
}

impl SettingsError {
    fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    /// Platform client settings.
    #[serde(default)]
    pub upstream: ClientConfig,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub upload: UploadSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5002,
        }
    }
}

/// Cache TTLs and the upstream timeout, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub content_list_ttl_secs: u64,
    pub follower_list_ttl_secs: u64,
    pub detail_ttl_secs: u64,
    pub upstream_timeout_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            content_list_ttl_secs: 300,
            follower_list_ttl_secs: 600,
            detail_ttl_secs: 1800,
            upstream_timeout_secs: 10,
        }
    }
}

impl CacheSettings {
    pub fn to_cache_config(&self) -> CacheConfig {
        CacheConfig {
            content_list_ttl: Duration::from_secs(self.content_list_ttl_secs),
            follower_list_ttl: Duration::from_secs(self.follower_list_ttl_secs),
            detail_ttl: Duration::from_secs(self.detail_ttl_secs),
            upstream_timeout: Duration::from_secs(self.upstream_timeout_secs),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Where the login cookie is persisted.
    pub file: PathBuf,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            file: PathBuf::from("config.json"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    pub dir: PathBuf,
    /// Request body limit, also applied to uploads.
    pub max_body_bytes: usize,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("uploads"),
            max_body_bytes: 100 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter used when `RUST_LOG` is not set.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Loads settings from `path` (or [`DEFAULT_SETTINGS_FILE`]) and the
    /// process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        Self::load_with_env(path, environment())
    }

    /// Loads settings with an explicit environment source.
    pub fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self, SettingsError> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_SETTINGS_FILE));

        let settings: Settings = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(env)
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.server.port == 0 {
            return Err(SettingsError::invalid("server.port", "must be > 0"));
        }
        self.server
            .host
            .parse::<IpAddr>()
            .map_err(|e| SettingsError::invalid("server.host", e.to_string()))?;

        let cache = &self.cache;
        for (field, value) in [
            ("cache.content_list_ttl_secs", cache.content_list_ttl_secs),
            ("cache.follower_list_ttl_secs", cache.follower_list_ttl_secs),
            ("cache.detail_ttl_secs", cache.detail_ttl_secs),
            ("cache.upstream_timeout_secs", cache.upstream_timeout_secs),
        ] {
            if value == 0 {
                return Err(SettingsError::invalid(field, "must be > 0"));
            }
        }

        if self.upload.max_body_bytes == 0 {
            return Err(SettingsError::invalid("upload.max_body_bytes", "must be > 0"));
        }
        if self.session.file.as_os_str().is_empty() {
            return Err(SettingsError::invalid("session.file", "must not be empty"));
        }

        self.upstream
            .validate()
            .map_err(|e| SettingsError::invalid("upstream", e.to_string()))?;

        Ok(())
    }

    /// Returns the listen address.
    pub fn listen_addr(&self) -> Result<SocketAddr, SettingsError> {
        let ip = self
            .server
            .host
            .parse::<IpAddr>()
            .map_err(|e| SettingsError::invalid("server.host", e.to_string()))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn env_from(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        environment().source(Some(map))
    }

    fn missing_file() -> PathBuf {
        PathBuf::from("/nonexistent/notedesk.toml")
    }

    #[test]
    fn test_defaults() {
        let settings =
            Settings::load_with_env(Some(missing_file().as_path()), env_from(&[])).unwrap();

        assert_eq!(settings.server.port, 5002);
        assert_eq!(settings.cache.content_list_ttl_secs, 300);
        assert_eq!(settings.cache.follower_list_ttl_secs, 600);
        assert_eq!(settings.cache.detail_ttl_secs, 1800);
        assert_eq!(settings.session.file, PathBuf::from("config.json"));
        assert_eq!(settings.upload.max_body_bytes, 100 * 1024 * 1024);
        assert_eq!(settings.cache.to_cache_config(), CacheConfig::default());
    }

    #[test]
    fn test_file_then_env() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 8080\n\n[cache]\ndetail_ttl_secs = 60\n\n[upstream]\nsign_endpoint = \"http://127.0.0.1:5005/sign\""
        )
        .unwrap();

        let settings = Settings::load_with_env(
            Some(file.path()),
            env_from(&[("NOTEDESK_SERVER__PORT", "9090")]),
        )
        .unwrap();

        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.cache.detail_ttl_secs, 60);
        assert_eq!(settings.cache.content_list_ttl_secs, 300);
        assert_eq!(
            settings.upstream.sign_endpoint(),
            Some("http://127.0.0.1:5005/sign")
        );
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let err = Settings::load_with_env(
            Some(missing_file().as_path()),
            env_from(&[("NOTEDESK_CACHE__CONTENT_LIST_TTL_SECS", "0")]),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "cache.content_list_ttl_secs",
                ..
            }
        ));
    }

    #[test]
    fn test_listen_addr() {
        let settings = Settings::default();
        assert_eq!(settings.listen_addr().unwrap().to_string(), "0.0.0.0:5002");
    }
}
