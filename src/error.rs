use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Caller errors detected before any plan is computed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptimizeError {
    #[error("slider out of range: {0} (expected 0..=10)")]
    InvalidSlider(i32),
    #[error("product {0} appears more than once in the shopping list")]
    DuplicateProduct(String),
}

/// Errors surfaced by the request handler
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Optimize(#[from] OptimizeError),
    #[error("malformed shopping list payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io { source: io::Error, path: PathBuf },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        source: toml::de::Error,
        path: PathBuf,
    },
}

/// Failure to set up the routing client; lookups themselves never error
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
