//! Runtime configuration from `METAVIEW_*` environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_CATALOG_URL: &str = "https://www.commerce.gov/sites/default/files/data.json";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// Settings for the HTTP source loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: String,
    pub default_url: String,
    pub max_body_bytes: usize,
    pub static_dir: Option<PathBuf>,
    pub source: SourceConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            default_url: DEFAULT_CATALOG_URL.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            static_dir: None,
            source: SourceConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Build from an arbitrary variable lookup; unset or blank variables keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let timeout_secs = parse_var(get("METAVIEW_TIMEOUT_SECS"), "METAVIEW_TIMEOUT_SECS")?
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let max_body_bytes =
            parse_var(get("METAVIEW_MAX_BODY_BYTES"), "METAVIEW_MAX_BODY_BYTES")?
                .unwrap_or(defaults.max_body_bytes);

        Ok(Self {
            bind_addr: get("METAVIEW_BIND").unwrap_or(defaults.bind_addr),
            default_url: get("METAVIEW_DEFAULT_URL").unwrap_or(defaults.default_url),
            max_body_bytes,
            static_dir: get("METAVIEW_STATIC_DIR").map(PathBuf::from),
            source: SourceConfig {
                user_agent: get("METAVIEW_USER_AGENT").unwrap_or(defaults.source.user_agent),
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

fn parse_var<T: FromStr>(raw: Option<String>, var: &'static str) -> Result<Option<T>, ConfigError> {
    raw.map(|value| {
        value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { var, value })
    })
    .transpose()
}
