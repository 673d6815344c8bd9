//! Error types and error handling for docmerge.
//!
//! Every client operation reports failure through [`DocMergeError`]. The
//! display text of each variant is the failure message shown to callers, so it
//! is kept stable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Error codes, one per failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// E001: Input was rejected before any request was sent
    #[serde(rename = "E001")]
    InvalidInput,

    /// E002: The merge service could not be reached
    #[serde(rename = "E002")]
    TransportError,

    /// E003: The merge service answered with a non-2xx status
    #[serde(rename = "E003")]
    UpstreamError,

    /// E004: The merged PDF could not be written locally
    #[serde(rename = "E004")]
    PersistError,

    /// E005: Configuration is invalid
    #[serde(rename = "E005")]
    ConfigInvalid,

    /// E006: Any other local failure
    #[serde(rename = "E006")]
    Internal,
}

impl ErrorCode {
    /// Returns the error code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidInput => "E001",
            ErrorCode::TransportError => "E002",
            ErrorCode::UpstreamError => "E003",
            ErrorCode::PersistError => "E004",
            ErrorCode::ConfigInvalid => "E005",
            ErrorCode::Internal => "E006",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// CLI exit codes.
pub mod exit_code {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// General error
    pub const GENERAL_ERROR: i32 = 1;
    /// Configuration error
    pub const CONFIG_ERROR: i32 = 2;
    /// Merge service unreachable
    pub const TRANSPORT_ERROR: i32 = 3;
    /// Merge service refused the request
    pub const UPSTREAM_ERROR: i32 = 4;
    /// Local write failed
    pub const PERSIST_ERROR: i32 = 5;
}

/// The main error type for docmerge.
#[derive(Debug, Error)]
pub enum DocMergeError {
    /// Input rejected before any network call.
    #[error("{message}")]
    Validation { message: String },

    /// Connection, DNS, timeout or body read failure.
    #[error("transport error: {detail}")]
    Transport {
        detail: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The merge service answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Writing the PDF to disk failed.
    #[error("Failed to save PDF to file")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is invalid or cannot be loaded.
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DocMergeError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            DocMergeError::Validation { .. } => ErrorCode::InvalidInput,
            DocMergeError::Transport { .. } => ErrorCode::TransportError,
            DocMergeError::Upstream { .. } => ErrorCode::UpstreamError,
            DocMergeError::Persist { .. } => ErrorCode::PersistError,
            DocMergeError::Config { .. } | DocMergeError::Yaml(_) => ErrorCode::ConfigInvalid,
            DocMergeError::Io(_) | DocMergeError::Json(_) => ErrorCode::Internal,
        }
    }

    /// Returns the CLI exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            DocMergeError::Config { .. } | DocMergeError::Yaml(_) => exit_code::CONFIG_ERROR,
            DocMergeError::Transport { .. } => exit_code::TRANSPORT_ERROR,
            DocMergeError::Upstream { .. } => exit_code::UPSTREAM_ERROR,
            DocMergeError::Persist { .. } => exit_code::PERSIST_ERROR,
            _ => exit_code::GENERAL_ERROR,
        }
    }

    /// Returns the HTTP status reported by the merge service, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            DocMergeError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        DocMergeError::Validation {
            message: message.into(),
        }
    }

    /// Creates a transport error from a reqwest failure.
    pub fn transport(source: reqwest::Error) -> Self {
        DocMergeError::Transport {
            detail: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates an upstream error.
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        DocMergeError::Upstream {
            status,
            message: message.into(),
        }
    }

    /// Creates a persist error for the given target path.
    pub fn persist(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DocMergeError::Persist {
            path: path.into(),
            source,
        }
    }

    /// Creates a configuration error with a message.
    pub fn config(message: impl Into<String>) -> Self {
        DocMergeError::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a configuration error with a message and source.
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        DocMergeError::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// JSON error body returned by the relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Always false.
    pub success: bool,

    /// Human-readable failure message.
    pub error: String,

    /// Error code (e.g., "E003").
    pub code: ErrorCode,

    /// HTTP status reported by the merge service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// Response timestamp.
    pub timestamp: DateTime<Utc>,
}

impl ErrorBody {
    /// Creates an error body from a DocMergeError.
    pub fn from_error(error: &DocMergeError) -> Self {
        Self {
            success: false,
            error: error.to_string(),
            code: error.code(),
            status: error.status(),
            timestamp: Utc::now(),
        }
    }
}

/// Result type alias for docmerge operations.
pub type Result<T> = std::result::Result<T, DocMergeError>;
