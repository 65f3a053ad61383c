//! Request model, policy enums and the provider trait.

use std::fmt;
use std::str::FromStr;

use img_hash::image::DynamicImage;

use super::openai_types::{ProviderResponse, ResponseRequest};
use super::UpstreamError;
use crate::presets;

// ═══════════════════════════════════════════════════════════
// Policy enums
// ═══════════════════════════════════════════════════════════

/// How aggressively subject vocabulary is rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SanitizerStrength {
    /// Format only.
    Off,
    /// Common people/animal nouns.
    Light,
    /// Extended token list plus framing phrases ("headshot", "close-up", ...).
    #[default]
    Strict,
}

/// Which model tier a live call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CostMode {
    /// Vision-capable model with an image, cheap text model otherwise.
    #[default]
    Auto,
    /// Always the lowest-cost model.
    Cheap,
    /// Always the user-selected model.
    Premium,
}

/// When the free template path may answer instead of the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TemplateMode {
    #[default]
    Auto,
    On,
    Off,
}

/// Response language of the generated prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    De,
    En,
}

/// Tone labels with a dedicated template clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    Neutral,
    Cinematic,
    Photography,
    Illustration,
    Product,
}

impl SanitizerStrength {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Light => "light",
            Self::Strict => "strict",
        }
    }
}

impl CostMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Cheap => "cheap",
            Self::Premium => "premium",
        }
    }
}

impl TemplateMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::On => "on",
            Self::Off => "off",
        }
    }
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::De => "de",
            Self::En => "en",
        }
    }
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Cinematic => "cinematic",
            Self::Photography => "photography",
            Self::Illustration => "illustration",
            Self::Product => "product",
        }
    }

    /// Parse a free-form tone label. Unknown labels yield `None`.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "neutral" => Some(Self::Neutral),
            "cinematic" => Some(Self::Cinematic),
            "photography" => Some(Self::Photography),
            "illustration" => Some(Self::Illustration),
            "product" => Some(Self::Product),
            _ => None,
        }
    }
}

macro_rules! display_and_parse {
    ($ty:ty, $what:literal, [$($label:literal => $variant:expr),+ $(,)?]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($label => Ok($variant),)+
                    other => Err(format!("unknown {}: '{}'", $what, other)),
                }
            }
        }
    };
}

display_and_parse!(SanitizerStrength, "sanitizer strength", [
    "off" => SanitizerStrength::Off,
    "light" => SanitizerStrength::Light,
    "strict" => SanitizerStrength::Strict,
]);

display_and_parse!(CostMode, "cost mode", [
    "auto" => CostMode::Auto,
    "cheap" => CostMode::Cheap,
    "premium" => CostMode::Premium,
]);

display_and_parse!(TemplateMode, "template mode", [
    "auto" => TemplateMode::Auto,
    "on" => TemplateMode::On,
    "off" => TemplateMode::Off,
]);

display_and_parse!(Language, "language", [
    "de" => Language::De,
    "en" => Language::En,
]);

// ═══════════════════════════════════════════════════════════
// Request
// ═══════════════════════════════════════════════════════════

/// Everything one prompt generation needs. Built by the host, never mutated
/// by the pipeline.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub model: String,
    /// Non-empty (after trim) override beats every cost mode.
    pub model_override: String,
    pub preset: String,
    /// Free text replacing the catalog preset.
    pub preset_override: String,
    pub style_addon: String,
    /// Inanimate environment props.
    pub props: String,
    pub language: Language,
    pub tone: String,
    /// 1..=5
    pub detail_level: u8,
    /// 64..=2000
    pub max_tokens: u32,
    /// 0.0..=1.0
    pub temperature: f32,
    pub template_mode: TemplateMode,
    pub cost_mode: CostMode,
    pub use_cache: bool,
    /// 0 = never expire, at most 365.
    pub cache_ttl_days: u32,
    pub sanitizer_strength: SanitizerStrength,
    pub strip_trailing_punctuation: bool,
    /// Decoded input image used as environmental context.
    pub image: Option<DynamicImage>,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self {
            model: "gpt-4o".into(),
            model_override: String::new(),
            preset: presets::DEFAULT_PRESET.into(),
            preset_override: String::new(),
            style_addon: String::new(),
            props: String::new(),
            language: Language::De,
            tone: Tone::Photography.as_str().into(),
            detail_level: 3,
            max_tokens: 350,
            temperature: 0.0,
            template_mode: TemplateMode::Auto,
            cost_mode: CostMode::Auto,
            use_cache: true,
            cache_ttl_days: 0,
            sanitizer_strength: SanitizerStrength::Strict,
            strip_trailing_punctuation: true,
            image: None,
        }
    }
}

impl GenerationRequest {
    /// Request for a named catalog preset with default policy.
    pub fn for_preset(preset: &str) -> Self {
        Self {
            preset: preset.to_string(),
            ..Self::default()
        }
    }

    /// Base environment text: the trimmed override, else the catalog entry.
    /// Empty when neither exists.
    pub fn preset_text(&self) -> String {
        let override_text = self.preset_override.trim();
        if !override_text.is_empty() {
            return override_text.to_string();
        }
        presets::lookup(&self.preset)
            .map(|text| text.trim().to_string())
            .unwrap_or_default()
    }

    pub fn has_preset_override(&self) -> bool {
        !self.preset_override.trim().is_empty()
    }

    pub fn detail(&self) -> u8 {
        self.detail_level.clamp(1, 5)
    }

    pub fn output_tokens(&self) -> u32 {
        self.max_tokens.clamp(64, 2000)
    }

    pub fn sampling_temperature(&self) -> f32 {
        if self.temperature.is_nan() {
            return 0.0;
        }
        self.temperature.clamp(0.0, 1.0)
    }

    pub fn ttl_days(&self) -> u32 {
        self.cache_ttl_days.min(365)
    }
}

// ═══════════════════════════════════════════════════════════
// Provider seam
// ═══════════════════════════════════════════════════════════

/// Language-model provider abstraction (allows mocking).
pub trait LlmClient {
    /// Perform exactly one provider call. Retries live in `upstream::invoke`.
    fn create_response(&self, request: &ResponseRequest) -> Result<ProviderResponse, UpstreamError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_parse_case_insensitively() {
        assert_eq!("STRICT".parse::<SanitizerStrength>().unwrap(), SanitizerStrength::Strict);
        assert_eq!(" cheap ".parse::<CostMode>().unwrap(), CostMode::Cheap);
        assert_eq!("On".parse::<TemplateMode>().unwrap(), TemplateMode::On);
        assert_eq!("en".parse::<Language>().unwrap(), Language::En);
    }

    #[test]
    fn unknown_enum_label_is_rejected() {
        let err = "medium".parse::<SanitizerStrength>().unwrap_err();
        assert!(err.contains("sanitizer strength"));
    }

    #[test]
    fn display_matches_label() {
        assert_eq!(CostMode::Premium.to_string(), "premium");
        assert_eq!(Language::De.to_string(), "de");
    }

    #[test]
    fn unknown_tone_is_none() {
        assert_eq!(Tone::parse("noir"), None);
        assert_eq!(Tone::parse("Cinematic"), Some(Tone::Cinematic));
    }

    #[test]
    fn preset_override_wins() {
        let req = GenerationRequest {
            preset_override: "  empty parking garage  ".into(),
            ..GenerationRequest::default()
        };
        assert_eq!(req.preset_text(), "empty parking garage");
        assert!(req.has_preset_override());
    }

    #[test]
    fn preset_text_from_catalog() {
        let req = GenerationRequest::for_preset("Office");
        assert!(req.preset_text().starts_with("Modern office environment"));
        assert!(!req.has_preset_override());
    }

    #[test]
    fn unknown_preset_without_override_is_empty() {
        let req = GenerationRequest::for_preset("Nowhere");
        assert!(req.preset_text().is_empty());
    }

    #[test]
    fn numeric_fields_are_clamped() {
        let req = GenerationRequest {
            detail_level: 9,
            max_tokens: 10,
            temperature: 3.0,
            cache_ttl_days: 1000,
            ..GenerationRequest::default()
        };
        assert_eq!(req.detail(), 5);
        assert_eq!(req.output_tokens(), 64);
        assert!((req.sampling_temperature() - 1.0).abs() < f32::EPSILON);
        assert_eq!(req.ttl_days(), 365);

        let low = GenerationRequest {
            detail_level: 0,
            ..GenerationRequest::default()
        };
        assert_eq!(low.detail(), 1);
    }
}
