//! Merge service client configuration.

use serde::{Deserialize, Serialize};

use crate::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

/// Settings for the merge service client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Base URL of the merge service.
    pub base_url: String,

    /// Request timeout in seconds.
    pub timeout_seconds: u64,

    /// Extra header lines sent with every request (e.g., "Authorization: Bearer ...").
    pub headers: Vec<String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            headers: Vec::new(),
        }
    }
}
