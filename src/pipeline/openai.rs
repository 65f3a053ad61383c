//! OpenAI Responses client plus in-process clients for tests and offline runs.

use std::collections::VecDeque;
use std::sync::Mutex;

use super::openai_types::{ApiErrorBody, ProviderResponse, RawResponse, ResponseRequest};
use super::types::LlmClient;
use super::{message_signals_unavailable, ConfigError, UpstreamError};
use crate::config;

/// Blocking HTTP client for the OpenAI Responses endpoint.
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OpenAiClient {
    pub fn new(api_key: &str, base_url: &str, timeout_secs: u64) -> Result<Self, ConfigError> {
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingCredential(config::API_KEY_ENV));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.trim().to_string(),
            client,
            timeout_secs,
        })
    }

    /// Credential and base URL from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = config::api_key_from_env()?;
        Self::new(
            &api_key,
            &config::base_url_from_env(),
            config::REQUEST_TIMEOUT_SECS,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl LlmClient for OpenAiClient {
    fn create_response(&self, request: &ResponseRequest) -> Result<ProviderResponse, UpstreamError> {
        let url = format!("{}/responses", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    UpstreamError::Timeout(self.timeout_secs)
                } else {
                    UpstreamError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(classify_status(status.as_u16(), &request.model, &body));
        }

        let raw: RawResponse = response
            .json()
            .map_err(|e| UpstreamError::MalformedResponse(e.to_string()))?;

        Ok(raw.into())
    }
}

/// Map a non-2xx reply to an error. 403, and 404 mentioning the model, mean the
/// model cannot be used with this credential.
pub fn classify_status(status: u16, model: &str, body: &str) -> UpstreamError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.trim().to_string());

    let mentions_model = message.to_lowercase().contains("model");
    let unavailable = status == 403
        || (status == 404 && mentions_model)
        || message_signals_unavailable(&message);

    if unavailable {
        UpstreamError::ModelUnavailable {
            model: model.to_string(),
            message,
        }
    } else {
        UpstreamError::Api { status, message }
    }
}

/// Mock client that always answers with the same text.
pub struct MockLlmClient {
    response: String,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
        }
    }
}

impl LlmClient for MockLlmClient {
    fn create_response(&self, _request: &ResponseRequest) -> Result<ProviderResponse, UpstreamError> {
        Ok(ProviderResponse::Text(self.response.clone()))
    }
}

/// Mock client replaying a queue of outcomes and recording the model of each
/// call. An exhausted queue answers with `MalformedResponse`.
pub struct ScriptedLlmClient {
    outcomes: Mutex<VecDeque<Result<ProviderResponse, UpstreamError>>>,
    models: Mutex<Vec<String>>,
}

impl ScriptedLlmClient {
    pub fn new(outcomes: Vec<Result<ProviderResponse, UpstreamError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            models: Mutex::new(Vec::new()),
        }
    }

    /// Number of provider calls made so far.
    pub fn calls(&self) -> usize {
        self.models.lock().map(|m| m.len()).unwrap_or(0)
    }

    /// Model of every call, in order.
    pub fn models_called(&self) -> Vec<String> {
        self.models.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

impl LlmClient for ScriptedLlmClient {
    fn create_response(&self, request: &ResponseRequest) -> Result<ProviderResponse, UpstreamError> {
        if let Ok(mut models) = self.models.lock() {
            models.push(request.model.clone());
        }
        self.outcomes
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front())
            .unwrap_or_else(|| {
                Err(UpstreamError::MalformedResponse(
                    "No scripted response left".into(),
                ))
            })
    }
}

/// Shared handle so tests can inspect a client after handing it to a generator.
impl<T: LlmClient + ?Sized> LlmClient for std::sync::Arc<T> {
    fn create_response(&self, request: &ResponseRequest) -> Result<ProviderResponse, UpstreamError> {
        (**self).create_response(request)
    }
}
