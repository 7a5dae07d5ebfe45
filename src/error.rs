use thiserror::Error;

#[derive(Error, Debug)]
pub enum RiskError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{source_name} fetch failed and no cached copy exists at {path}")]
    CacheMiss {
        source_name: &'static str,
        path: String,
    },

    #[error("{source_name}: {message}")]
    Source {
        source_name: &'static str,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, RiskError>;
