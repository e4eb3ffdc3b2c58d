//! Error types for HUSH
//!
//! This module defines all error types used throughout the backend,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for HUSH operations
///
/// Covers configuration loading, snapshot storage, and HTTP server
/// failures. Request parsing errors never reach this type; they are
/// rejected by the JSON extractor before a handler runs.
#[derive(Error, Debug)]
pub enum HushError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Snapshot storage errors (database operations)
    #[error("Storage error: {0}")]
    Storage(String),

    /// HTTP server errors (bind failures, task join failures)
    #[error("Server error: {0}")]
    Server(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for HUSH operations
///
/// Uses `anyhow::Error` so callers can attach context while keeping a
/// `HushError` as the root cause.
pub type Result<T> = anyhow::Result<T>;
