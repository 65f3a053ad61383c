//! Wire types for the OpenAI Responses endpoint.
//!
//! Request side: role-tagged input messages with typed content items.
//! Response side: either a convenience `output_text` field or a list of
//! output items, modeled as `ProviderResponse` so text extraction is a match
//! instead of attribute probing.

use serde::{Deserialize, Serialize};

// ──────────────────────────────────────────────
// Request
// ──────────────────────────────────────────────

/// One content item of an input message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputContent {
    InputText { text: String },
    /// `image_url` carries a `data:` URL.
    InputImage { image_url: String },
}

impl InputContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self::InputText { text: text.into() }
    }

    pub fn image(data_url: impl Into<String>) -> Self {
        Self::InputImage {
            image_url: data_url.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputMessage {
    pub role: String,
    pub content: Vec<InputContent>,
}

/// Body of `POST /responses`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseRequest {
    pub model: String,
    pub input: Vec<InputMessage>,
    pub max_output_tokens: u32,
    pub temperature: f32,
}

impl ResponseRequest {
    /// System message followed by the user content.
    pub fn new(
        model: &str,
        system: &str,
        user_content: &[InputContent],
        max_output_tokens: u32,
        temperature: f32,
    ) -> Self {
        Self {
            model: model.to_string(),
            input: vec![
                InputMessage {
                    role: "system".into(),
                    content: vec![InputContent::text(system)],
                },
                InputMessage {
                    role: "user".into(),
                    content: user_content.to_vec(),
                },
            ],
            max_output_tokens,
            temperature,
        }
    }
}

// ──────────────────────────────────────────────
// Response
// ──────────────────────────────────────────────

/// Content chunk inside a message output item.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentChunk {
    OutputText { text: String },
    Text { text: String },
    /// Refusals, annotations and anything newer.
    #[serde(other)]
    Other,
}

/// Output item. Only `message` items carry prompt text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputItem {
    Message {
        #[serde(default)]
        content: Vec<ContentChunk>,
    },
    /// Reasoning items, tool calls, etc.
    #[serde(other)]
    Other,
}

/// Raw response body as sent by the provider.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawResponse {
    #[serde(default)]
    pub output_text: Option<String>,
    #[serde(default)]
    pub output: Vec<OutputItem>,
}

/// Provider reply shape after decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderResponse {
    /// Direct text field.
    Text(String),
    /// Structured output items.
    Items(Vec<OutputItem>),
}

impl From<RawResponse> for ProviderResponse {
    fn from(raw: RawResponse) -> Self {
        match raw.output_text {
            Some(text) if !text.trim().is_empty() => ProviderResponse::Text(text),
            _ => ProviderResponse::Items(raw.output),
        }
    }
}

impl ProviderResponse {
    /// Plain prompt text. Direct text is trimmed; otherwise every text chunk of
    /// every message item is joined with newlines. Empty when nothing matches.
    pub fn extract_text(&self) -> String {
        match self {
            ProviderResponse::Text(text) => text.trim().to_string(),
            ProviderResponse::Items(items) => {
                let chunks: Vec<&str> = items
                    .iter()
                    .filter_map(|item| match item {
                        OutputItem::Message { content } => Some(content),
                        OutputItem::Other => None,
                    })
                    .flatten()
                    .filter_map(|chunk| match chunk {
                        ContentChunk::OutputText { text } | ContentChunk::Text { text } => {
                            Some(text.as_str())
                        }
                        ContentChunk::Other => None,
                    })
                    .collect();
                chunks.join("\n").trim().to_string()
            }
        }
    }
}

/// Error envelope of non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
}
