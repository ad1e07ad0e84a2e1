//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.
//!
//! Malformed individual transactions are not errors: the aggregator recovers
//! from them record by record.

use thiserror::Error;

/// Errors that can occur while talking to a block-explorer API
#[derive(Error, Debug)]
pub enum ExplorerError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Invalid explorer response: {0}")]
    InvalidResponse(String),

    #[error("Explorer API error: {message} ({result})")]
    Api { message: String, result: String },
}

/// Errors that abort a whole aggregation call
#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Transaction input must be a JSON object keyed by chain, got {0}")]
    NotAMapping(&'static str),
}

/// Errors that can occur while writing or reading report files
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),

    #[error("Inconsistent report: {0}")]
    InconsistentReport(String),
}
