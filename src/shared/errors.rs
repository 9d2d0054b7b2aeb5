use std::path::PathBuf;

use thiserror::Error;

/// Failure while talking to the status endpoint.
///
/// Never leaves the fetcher: every variant is folded into the sentinel
/// observation and only shows up in logs and metrics.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid JSON body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Unexpected response shape: {0}")]
    Shape(String),
}

impl FetchError {
    /// Short label used for log fields and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport(_) => "transport",
            FetchError::Status { .. } => "status",
            FetchError::Decode(_) => "decode",
            FetchError::Shape(_) => "shape",
        }
    }
}

/// Failure in the durable history store. Always fatal for the poll loop.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Corrupt history row {id}: {reason}")]
    Corrupt { id: i64, reason: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file {path}: {error}")]
    CouldNotRead {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("Invalid TOML in {path}: {error}")]
    InvalidToml {
        path: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),

    #[error("Failed to install metrics exporter: {0}")]
    Metrics(String),
}

impl MonitorError {
    /// Whether the poll loop must stop on this error.
    ///
    /// Only endpoint failures are transient; anything touching the local
    /// store or the process setup is not.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, MonitorError::Fetch(_))
    }
}

impl From<sea_orm::DbErr> for MonitorError {
    fn from(e: sea_orm::DbErr) -> Self {
        MonitorError::Store(StoreError::Database(e))
    }
}

pub type MonitorResult<T> = Result<T, MonitorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_are_fatal() {
        let err = MonitorError::from(sea_orm::DbErr::Custom("disk I/O error".into()));
        assert!(err.is_fatal());
        assert!(err.to_string().contains("disk I/O error"));
    }

    #[test]
    fn test_fetch_errors_are_transient() {
        let err = MonitorError::from(FetchError::Shape("missing entities".into()));
        assert!(!err.is_fatal());
        assert_eq!(
            FetchError::Status {
                status: 503,
                body: String::new()
            }
            .kind(),
            "status"
        );
    }
}
