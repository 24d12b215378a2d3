// src/errors.rs
use std::path::PathBuf;
use thiserror::Error;

/// Problems found while loading the configuration. All of them are fatal:
/// the monitor refuses to start rather than value a half-valid portfolio.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("position #{index} ({symbol}): {reason}")]
    InvalidPosition {
        index: usize,
        symbol: String,
        reason: String,
    },

    #[error("invalid schedule: {0}")]
    InvalidSchedule(String),
}

/// Failure to obtain a last price for one symbol. Never fatal for a cycle.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("request for {symbol} timed out")]
    Timeout { symbol: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{symbol}: HTTP {status}")]
    Status { symbol: String, status: u16 },

    #[error("{symbol}: malformed response: {detail}")]
    Malformed { symbol: String, detail: String },

    #[error("{0}: no quote in response")]
    NotFound(String),
}

impl QuoteError {
    pub fn from_request(symbol: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            QuoteError::Timeout {
                symbol: symbol.to_string(),
            }
        } else {
            QuoteError::Network(err)
        }
    }
}

/// Failure to persist or propagate a snapshot.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("git {step} failed: {detail}")]
    Git { step: &'static str, detail: String },
}
