//! Offline prompt assembly: preset text plus a fixed tone clause, no provider call.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{Language, Tone};
use crate::presets;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Tone clause per language. Unknown tones read as neutral.
pub fn tone_clause(tone: &str, language: Language) -> &'static str {
    let tone = Tone::parse(tone).unwrap_or(Tone::Neutral);
    match (tone, language) {
        (Tone::Neutral, Language::De) => "neutral ausgeleuchtet",
        (Tone::Neutral, Language::En) => "neutral lighting",
        (Tone::Cinematic, Language::De) => "cinematisch mit weicher Kontrastführung",
        (Tone::Cinematic, Language::En) => "cinematic with gentle contrast",
        (Tone::Photography, Language::De) => "fotografischer Look mit realistischem Dynamikumfang",
        (Tone::Photography, Language::En) => "photographic look with realistic dynamic range",
        (Tone::Illustration, Language::De) => "klar strukturiert, illustrativer Stil",
        (Tone::Illustration, Language::En) => "clean structured, illustrative style",
        (Tone::Product, Language::De) => "sauberer, produktorientierter Look",
        (Tone::Product, Language::En) => "clean, product-oriented look",
    }
}

fn labels(language: Language) -> (&'static str, &'static str) {
    match language {
        Language::De => ("requisiten", "stil"),
        Language::En => ("props", "style"),
    }
}

/// Trim and collapse whitespace, keeping case.
fn normalize_keep_case(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// Assemble a prompt without calling the provider.
///
/// The base is `preset_text_override` when non-blank, else the catalog text of
/// `preset_name`. Returns `None` when neither exists. The output is not
/// sanitized or formatted; callers run it through `sanitize_subjects`.
pub fn generate_template(
    preset_name: &str,
    preset_text_override: &str,
    style_addon: &str,
    props: &str,
    tone: &str,
    language: Language,
) -> Option<String> {
    let base = match preset_text_override.trim() {
        "" => presets::lookup(preset_name)?.trim(),
        text => text,
    };
    if base.is_empty() {
        return None;
    }

    let (props_label, style_label) = labels(language);
    let props_line = normalize_keep_case(props);
    let style_line = normalize_keep_case(style_addon);

    let mut clauses = vec![format!("{base} – {}", tone_clause(tone, language))];
    if !props_line.is_empty() {
        clauses.push(format!("{props_label}: {props_line}"));
    }
    if !style_line.is_empty() {
        clauses.push(format!("{style_label}: {style_line}"));
    }
    Some(clauses.join(", "))
}
