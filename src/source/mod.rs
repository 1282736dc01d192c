//! Source loader: produces a parsed catalog from a URL or a local file.
//!
//! Load failures are reported here, before normalization ever runs.

use std::fs;
use std::path::{Path, PathBuf};

use reqwest::blocking::Client;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::SourceConfig;
use crate::error::LoadError;

/// Where a catalog comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Url(String),
    File(PathBuf),
}

impl CatalogSource {
    /// An existing file path is a file source; anything else is treated as a URL.
    pub fn detect(raw: &str) -> Self {
        let path = Path::new(raw);
        if path.is_file() {
            Self::File(path.to_path_buf())
        } else {
            Self::Url(raw.to_string())
        }
    }

    pub fn load(&self, config: &SourceConfig) -> Result<Value, LoadError> {
        match self {
            Self::Url(url) => fetch_catalog(url, config),
            Self::File(path) => read_catalog_file(path),
        }
    }
}

/// Prefix `https://` unless the string already names an http(s) scheme.
pub fn normalize_url(raw: &str) -> Result<String, LoadError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LoadError::EmptyUrl);
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("https://{trimmed}"))
    }
}

pub fn fetch_catalog(raw_url: &str, config: &SourceConfig) -> Result<Value, LoadError> {
    let url = normalize_url(raw_url)?;
    info!(url = %url, "fetching catalog");

    let client = Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout)
        .build()?;

    let response = client.get(&url).send()?;

    let status = response.status();
    if !status.is_success() {
        warn!(url = %url, status = status.as_u16(), "catalog request rejected");
        return Err(LoadError::Status {
            url,
            status: status.as_u16(),
        });
    }

    let body = response.bytes()?;
    parse_catalog(&body)
}

pub fn read_catalog_file(path: impl AsRef<Path>) -> Result<Value, LoadError> {
    let path = path.as_ref();
    info!(path = %path.display(), "reading catalog file");
    let raw = fs::read(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_catalog(&raw)
}

pub fn parse_catalog(bytes: &[u8]) -> Result<Value, LoadError> {
    Ok(serde_json::from_slice(bytes)?)
}
