use serde::Deserialize;

use crate::catalog::normalize_catalog;
use crate::config::SourceConfig;
use crate::error::{LoadError, ReportError};
use crate::report::view_json;
use crate::source::{fetch_catalog, parse_catalog};

#[derive(Debug, Clone, Deserialize)]
pub struct FetchRequest {
    pub url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Report(#[from] ReportError),
}

pub fn health_payload() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "service": "metaview-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Body is the catalog document itself (e.g. an uploaded data.json).
pub fn normalize_payload(body: &str) -> Result<String, ApiError> {
    let catalog = parse_catalog(body.as_bytes())
        .map_err(|err| ApiError::BadRequest(format!("Invalid catalog: {err}")))?;
    Ok(view_json(&normalize_catalog(&catalog))?)
}

/// Body is `{"url": "..."}`; the catalog is fetched and normalized.
pub fn fetch_payload(body: &str, config: &SourceConfig) -> Result<String, ApiError> {
    let request: FetchRequest = serde_json::from_str(body)
        .map_err(|err| ApiError::BadRequest(format!("Invalid request body: {err}")))?;
    if request.url.trim().is_empty() {
        return Err(ApiError::BadRequest("url must not be empty".to_string()));
    }
    let catalog = fetch_catalog(&request.url, config)?;
    Ok(view_json(&normalize_catalog(&catalog))?)
}
