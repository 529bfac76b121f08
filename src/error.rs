use thiserror::Error;

/// Why a data source produced no listings
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("invalid storage key '{0}': use only ASCII letters, digits, '_' and '-'")]
    InvalidKey(String),

    #[error("cached snapshot is not valid JSON: {0}")]
    CacheParse(#[source] serde_json::Error),

    #[error("bundled dataset is not valid JSON: {0}")]
    BundledParse(#[source] serde_json::Error),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("remote returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("remote payload is not a valid snapshot: {0}")]
    Payload(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LoadError>;
