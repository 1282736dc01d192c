use std::io;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("catalog URL is empty")]
    EmptyUrl,
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("'{url}' responded with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("unable to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {var}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("write failed: {0}")]
    Io(#[from] io::Error),
}
