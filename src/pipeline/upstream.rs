//! Live provider call with a fixed attempt schedule and a one-time model downgrade.

use std::time::Duration;

use super::model_router::AUTO_VISION_MODEL;
use super::openai_types::{InputContent, ResponseRequest};
use super::types::LlmClient;
use super::UpstreamError;

/// Attempt schedule for one live call.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Delay before each attempt; the length is the attempt count.
    pub delays: Vec<Duration>,
    /// Model switched to, once, when the requested one is unavailable.
    pub fallback_model: String,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            delays: vec![
                Duration::ZERO,
                Duration::from_millis(1000),
                Duration::from_millis(2500),
            ],
            fallback_model: AUTO_VISION_MODEL.to_string(),
        }
    }
}

impl RetryPolicy {
    /// Same attempt count as the default, without sleeping.
    pub fn immediate() -> Self {
        Self {
            delays: vec![Duration::ZERO; 3],
            ..Self::default()
        }
    }

    pub fn attempts(&self) -> usize {
        self.delays.len()
    }
}

/// Run the provider call under `policy` and return the extracted text.
///
/// Every failure is retried until the schedule is exhausted. The first failure
/// classified as "model unavailable" also switches to the fallback model for
/// the remaining attempts; this happens at most once per invocation. After
/// the last attempt the last error is returned.
pub fn invoke(
    client: &dyn LlmClient,
    policy: &RetryPolicy,
    model: &str,
    system: &str,
    user_content: &[InputContent],
    max_tokens: u32,
    temperature: f32,
) -> Result<String, UpstreamError> {
    let mut model = model.to_string();
    let mut downgraded = false;
    let mut last_error: Option<UpstreamError> = None;
    let total = policy.attempts();

    for (attempt, delay) in policy.delays.iter().enumerate() {
        if !delay.is_zero() {
            std::thread::sleep(*delay);
        }

        let request = ResponseRequest::new(&model, system, user_content, max_tokens, temperature);
        match client.create_response(&request) {
            Ok(response) => return Ok(response.extract_text()),
            Err(e) => {
                tracing::warn!(
                    attempt = attempt + 1,
                    total,
                    model = %model,
                    error = %e,
                    "Provider call failed"
                );
                if !downgraded && e.is_model_unavailable() {
                    tracing::warn!(
                        from = %model,
                        to = %policy.fallback_model,
                        "Model unavailable, switching to fallback model"
                    );
                    model = policy.fallback_model.clone();
                    downgraded = true;
                }
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| {
        UpstreamError::MalformedResponse("No attempts configured".into())
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{ProviderResponse, ScriptedLlmClient};

    fn unavailable(model: &str) -> UpstreamError {
        UpstreamError::ModelUnavailable {
            model: model.into(),
            message: "model not available".into(),
        }
    }

    fn run(client: &ScriptedLlmClient, model: &str) -> Result<String, UpstreamError> {
        invoke(
            client,
            &RetryPolicy::immediate(),
            model,
            "system",
            &[InputContent::text("brief")],
            350,
            0.0,
        )
    }

    #[test]
    fn default_schedule() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.delays,
            vec![Duration::ZERO, Duration::from_secs(1), Duration::from_millis(2500)]
        );
        assert_eq!(policy.fallback_model, "gpt-4o");
    }

    #[test]
    fn first_success_is_returned_trimmed() {
        let client = ScriptedLlmClient::new(vec![Ok(ProviderResponse::Text(" Canal at night. ".into()))]);
        assert_eq!(run(&client, "gpt-5-mini").unwrap(), "Canal at night.");
        assert_eq!(client.calls(), 1);
    }

    #[test]
    fn downgrade_happens_once_across_three_attempts() {
        let client = ScriptedLlmClient::new(vec![
            Err(unavailable("gpt-5-mini")),
            Err(unavailable("gpt-4o")),
            Err(UpstreamError::Timeout(120)),
        ]);
        let err = run(&client, "gpt-5-mini").unwrap_err();
        assert!(matches!(err, UpstreamError::Timeout(120)));
        assert_eq!(client.calls(), 3);
        assert_eq!(client.models_called(), vec!["gpt-5-mini", "gpt-4o", "gpt-4o"]);
    }

    #[test]
    fn success_after_downgrade() {
        let client = ScriptedLlmClient::new(vec![
            Err(unavailable("gpt-5-nano")),
            Ok(ProviderResponse::Text("Marble atrium.".into())),
        ]);
        assert_eq!(run(&client, "gpt-5-nano").unwrap(), "Marble atrium.");
        assert_eq!(client.models_called(), vec!["gpt-5-nano", "gpt-4o"]);
    }

    #[test]
    fn plain_failures_keep_the_model() {
        let client = ScriptedLlmClient::new(vec![
            Err(UpstreamError::Network("reset".into())),
            Err(UpstreamError::Api {
                status: 500,
                message: "boom".into(),
            }),
            Ok(ProviderResponse::Text("Glacier cave.".into())),
        ]);
        assert_eq!(run(&client, "gpt-5-mini").unwrap(), "Glacier cave.");
        assert_eq!(client.models_called(), vec!["gpt-5-mini"; 3]);
    }

    #[test]
    fn last_error_is_returned() {
        let client = ScriptedLlmClient::new(vec![
            Err(UpstreamError::Network("first".into())),
            Err(UpstreamError::Network("second".into())),
            Err(UpstreamError::Network("third".into())),
        ]);
        match run(&client, "gpt-5-mini").unwrap_err() {
            UpstreamError::Network(msg) => assert_eq!(msg, "third"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn empty_schedule_is_an_error() {
        let client = ScriptedLlmClient::new(vec![]);
        let policy = RetryPolicy {
            delays: vec![],
            ..RetryPolicy::default()
        };
        let result = invoke(&client, &policy, "m", "s", &[], 64, 0.0);
        assert!(result.is_err());
        assert_eq!(client.calls(), 0);
    }
}
