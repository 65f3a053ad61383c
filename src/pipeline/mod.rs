//! Subjectless prompt pipeline and its error types.

pub mod types;
pub mod format;
pub mod sanitize;
pub mod fingerprint;
pub mod cache;
pub mod model_router; // Cost-mode driven model tier selection
pub mod template; // Free offline prompt assembly
pub mod prompt;
pub mod openai_types;
pub mod openai;
pub mod upstream; // Retry + one-time model downgrade around the provider call
pub mod orchestrator;

pub use types::*;
pub use format::*;
pub use sanitize::*;
pub use fingerprint::*;
pub use cache::*;
pub use model_router::*;
pub use template::*;
pub use prompt::*;
pub use openai_types::*;
pub use openai::*;
pub use upstream::*;
pub use orchestrator::*;

use thiserror::Error;

/// Fatal setup failures. Raised once at construction, never retried.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing credential: set the {0} environment variable")]
    MissingCredential(&'static str),

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

/// Failures of the provider call. Recovered locally by the controller
/// whenever a preset text exists.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("Model '{model}' is not available: {message}")]
    ModelUnavailable { model: String, message: String },

    #[error("Provider returned an error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}

impl UpstreamError {
    /// True when the failure means the requested model cannot be used
    /// (unknown model or access denied). Triggers the one-time downgrade.
    pub fn is_model_unavailable(&self) -> bool {
        if matches!(self, UpstreamError::ModelUnavailable { .. }) {
            return true;
        }
        message_signals_unavailable(&self.to_string())
    }
}

/// Message heuristic for providers that only report unavailability in text.
pub(crate) fn message_signals_unavailable(message: &str) -> bool {
    let msg = message.to_lowercase();
    (msg.contains("model") && msg.contains("not") && msg.contains("available"))
        || (msg.contains("access") && msg.contains("denied"))
}

/// Durable-tier failures. Never escape the cache layer: logged at debug
/// level and treated as a miss or a skipped write.
#[derive(Error, Debug)]
pub enum CacheIoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to persist cache file: {0}")]
    Persist(String),
}
