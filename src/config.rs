//! Runtime configuration: environment credentials, paths and logging.

use std::path::PathBuf;

use crate::pipeline::ConfigError;

/// Application-level constants
pub const APP_NAME: &str = "Subjectless";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version tag folded into every fingerprint. Bumping it invalidates all
/// previously cached prompts.
pub const NODE_VERSION: &str = "v1.6";

/// Environment variable holding the provider credential.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable overriding the provider endpoint.
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";

/// Environment variable overriding the durable cache directory.
pub const CACHE_DIR_ENV: &str = "SUBJECTLESS_CACHE_DIR";

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Per-request HTTP timeout for the provider call.
pub const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "subjectless=info,warn"
}

/// Read the provider credential. Absent or blank is a fatal configuration error.
pub fn api_key_from_env() -> Result<String, ConfigError> {
    parse_api_key(std::env::var(API_KEY_ENV).ok().as_deref())
}

/// Validate a raw credential value; blank counts as missing.
pub fn parse_api_key(raw: Option<&str>) -> Result<String, ConfigError> {
    match raw.map(str::trim) {
        Some(key) if !key.is_empty() => Ok(key.to_string()),
        _ => Err(ConfigError::MissingCredential(API_KEY_ENV)),
    }
}

/// Provider base URL, `OPENAI_BASE_URL` or the public endpoint.
pub fn base_url_from_env() -> String {
    std::env::var(BASE_URL_ENV)
        .ok()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

/// Get the durable prompt cache directory.
/// `SUBJECTLESS_CACHE_DIR` wins; otherwise the platform data directory.
pub fn cache_dir() -> PathBuf {
    resolve_cache_dir(std::env::var(CACHE_DIR_ENV).ok().as_deref())
}

/// Resolve the cache directory from an optional explicit override.
pub fn resolve_cache_dir(override_dir: Option<&str>) -> PathBuf {
    if let Some(dir) = override_dir.map(str::trim).filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    match dirs::data_dir() {
        Some(data) => data.join("subjectless").join("prompt_cache"),
        None => PathBuf::from(".subjectless").join("prompt_cache"),
    }
}
