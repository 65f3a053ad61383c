//! Prompt controller: one request in, one subjectless prompt out.
//!
//! States: cache check → template attempt → live call → sanitize → cache write.
//! Provider failures degrade to the template, then to the raw preset text.

use std::sync::Arc;

use super::cache::{ttl_from_days, PromptCache};
use super::fingerprint::{fingerprint, FingerprintInput};
use super::model_router::select_model;
use super::openai::OpenAiClient;
use super::prompt::{build_system_message, build_user_content};
use super::sanitize::sanitize_subjects;
use super::template::generate_template;
use super::types::{GenerationRequest, LlmClient, TemplateMode};
use super::upstream::{invoke, RetryPolicy};
use super::{ConfigError, UpstreamError};
use crate::{config, vision};

/// Highest detail level the `Auto` template mode still answers offline.
pub const DEFAULT_AUTO_TEMPLATE_MAX_DETAIL: u8 = 3;

/// Produces one subjectless prompt per request:
/// cache → template → live call → sanitize → cache write,
/// degrading to the template or the raw preset when the provider fails.
pub struct PromptGenerator {
    llm: Box<dyn LlmClient + Send + Sync>,
    cache: Arc<PromptCache>,
    retry: RetryPolicy,
    auto_template_max_detail: u8,
}

impl PromptGenerator {
    pub fn new(llm: Box<dyn LlmClient + Send + Sync>, cache: Arc<PromptCache>) -> Self {
        Self {
            llm,
            cache,
            retry: RetryPolicy::default(),
            auto_template_max_detail: DEFAULT_AUTO_TEMPLATE_MAX_DETAIL,
        }
    }

    /// OpenAI client and cache directory from the environment.
    /// Fails when the credential is missing.
    pub fn from_env() -> Result<Self, ConfigError> {
        let client = OpenAiClient::from_env()?;
        let cache = Arc::new(PromptCache::new(config::cache_dir()));
        Ok(Self::new(Box::new(client), cache))
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_auto_template_max_detail(mut self, max_detail: u8) -> Self {
        self.auto_template_max_detail = max_detail;
        self
    }

    pub fn cache(&self) -> &Arc<PromptCache> {
        &self.cache
    }

    /// Generate a prompt. Fails only when the provider fails and there is no
    /// preset text to fall back on.
    pub fn generate(&self, request: &GenerationRequest) -> Result<String, UpstreamError> {
        let preset_text = request.preset_text();
        let detail = request.detail();
        let image_url = vision::encode_data_url(request.image.as_ref());
        let model = select_model(
            &request.model,
            &request.model_override,
            request.cost_mode,
            image_url.is_some(),
        );
        let vision_hash = vision::vision_hash(request.image.as_ref());
        let extra = format!(
            "tpl:{}|strip:{}",
            request.template_mode, request.strip_trailing_punctuation
        );
        let key = fingerprint(&FingerprintInput {
            model: &model,
            language: request.language.as_str(),
            preset_text: &preset_text,
            style_addon: &request.style_addon,
            props: &request.props,
            tone: &request.tone,
            detail_level: detail,
            vision_hash: &vision_hash,
            sanitizer: request.sanitizer_strength,
            extra: &extra,
        });

        let _span = tracing::info_span!("generate_prompt", key = %key.short(), model = %model).entered();

        // Cache check
        if request.use_cache {
            if let Some(hit) = self.cache.get(key.as_str(), ttl_from_days(request.ttl_days())) {
                return Ok(hit);
            }
            tracing::debug!("Cache miss");
        }

        // Template attempt
        if self.template_allowed(request, detail) {
            let template = generate_template(
                &request.preset,
                &request.preset_override,
                &request.style_addon,
                &request.props,
                &request.tone,
                request.language,
            );
            if let Some(prompt) = template.and_then(|t| self.finish(request, &t)) {
                tracing::debug!("Answered from template");
                self.store(request, key.as_str(), &prompt);
                return Ok(prompt);
            }
        }

        // Live call
        let system = build_system_message(request.language);
        let user_content = build_user_content(
            &preset_text,
            &request.style_addon,
            &request.props,
            &request.tone,
            detail,
            image_url.as_deref(),
        );
        let live = invoke(
            self.llm.as_ref(),
            &self.retry,
            &model,
            &system,
            &user_content,
            request.output_tokens(),
            request.sampling_temperature(),
        )
        .and_then(|raw| {
            self.finish(request, &raw).ok_or_else(|| {
                UpstreamError::MalformedResponse("Provider returned no usable prompt text".into())
            })
        });

        let error = match live {
            Ok(prompt) => {
                self.store(request, key.as_str(), &prompt);
                return Ok(prompt);
            }
            Err(e) => e,
        };

        // Template fallback
        if request.template_mode != TemplateMode::Off {
            let template = generate_template(
                &request.preset,
                &preset_text,
                &request.style_addon,
                &request.props,
                &request.tone,
                request.language,
            );
            if let Some(prompt) = template.and_then(|t| self.finish(request, &t)) {
                tracing::info!(error = %error, "Provider failed, answered from template");
                self.store(request, key.as_str(), &prompt);
                return Ok(prompt);
            }
        }

        // Raw preset fallback. Any preset text means no error, even when
        // nothing survives sanitizing; an empty result is not cached.
        if !preset_text.is_empty() {
            let prompt = sanitize_subjects(
                &preset_text,
                request.sanitizer_strength,
                request.strip_trailing_punctuation,
            );
            tracing::info!(error = %error, "Provider failed, answered with raw preset text");
            self.store(request, key.as_str(), &prompt);
            return Ok(prompt);
        }

        tracing::warn!(error = %error, "Provider failed and no preset text to fall back on");
        Err(error)
    }

    fn template_allowed(&self, request: &GenerationRequest, detail: u8) -> bool {
        match request.template_mode {
            TemplateMode::On => true,
            TemplateMode::Auto => {
                request.image.is_none()
                    && !request.has_preset_override()
                    && detail <= self.auto_template_max_detail
            }
            TemplateMode::Off => false,
        }
    }

    /// Sanitize and format; `None` when nothing is left.
    fn finish(&self, request: &GenerationRequest, text: &str) -> Option<String> {
        let prompt = sanitize_subjects(
            text,
            request.sanitizer_strength,
            request.strip_trailing_punctuation,
        );
        (!prompt.is_empty()).then_some(prompt)
    }

    fn store(&self, request: &GenerationRequest, key: &str, prompt: &str) {
        if request.use_cache && !prompt.is_empty() {
            self.cache.put(key, prompt);
        }
    }
}
