//! Error types for the Kudu client

use std::path::PathBuf;

use http::{Method, StatusCode};
use thiserror::Error;

/// Main error type for the Kudu client
#[derive(Error, Debug)]
pub enum KuduError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Zip error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("{method} failed: {} ({reason}){}", .status.as_u16(), url_suffix(.url))]
    RemoteRequestFailed {
        method: Method,
        status: StatusCode,
        reason: String,
        /// Absolute request URL, only captured for 404 responses
        url: Option<String>,
    },

    #[error("Deployment failed expected \"{expected}\" got \"{actual}\" (exit code {exit_code})")]
    ValidationMismatch {
        expected: String,
        actual: String,
        exit_code: i32,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl KuduError {
    /// Shorthand for [`KuduError::InvalidArgument`]
    pub fn invalid_argument(name: &str) -> Self {
        KuduError::InvalidArgument(format!("{name} must not be blank"))
    }
}

impl From<tokio::task::JoinError> for KuduError {
    fn from(err: tokio::task::JoinError) -> Self {
        KuduError::Internal(err.to_string())
    }
}

fn url_suffix(url: &Option<String>) -> String {
    url.as_deref()
        .map(|u| format!(" url: {u}"))
        .unwrap_or_default()
}

/// Fail with [`KuduError::InvalidArgument`] when `value` is empty or whitespace
pub(crate) fn ensure_not_blank(value: &str, name: &str) -> Result<(), KuduError> {
    if value.trim().is_empty() {
        return Err(KuduError::invalid_argument(name));
    }
    Ok(())
}
