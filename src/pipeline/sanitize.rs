//! Subject sanitizer: lexical removal of living-subject vocabulary from prompts.
//!
//! Best effort by construction; it matches words, not meaning.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::format::format_prompt;
use super::types::SanitizerStrength;

/// Replacement for every removed subject reference.
const REPLACEMENT: &str = "background";

const FORBIDDEN_TOKENS_LIGHT: &[&str] = &[
    "person", "people", "human",
    "girl", "boy", "man", "woman", "male", "female", "child", "children", "kid", "baby",
    "animal", "dog", "cat", "bird", "horse", "creature", "monster", "pet", "wildlife",
];

const FORBIDDEN_TOKENS_STRICT: &[&str] = &[
    "person", "people", "human", "character", "model", "portrait", "face", "faces", "hand",
    "hands", "silhouette", "girl", "boy", "man", "woman", "male", "female", "child", "children",
    "kid", "baby", "selfie", "body", "bodies", "actor", "actress", "figure", "subject",
    "animal", "dog", "cat", "bird", "horse", "creature", "monster", "pet", "wildlife", "insect",
    "fish", "crowd", "group", "couple",
];

/// `no …` / `without …` up to the next period.
static NEGATION_CLAUSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:no|without)\b[^.]*").unwrap());

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__NEG_BLOCK_(\d+)__").unwrap());

static LIGHT_TOKENS: LazyLock<Regex> = LazyLock::new(|| token_pattern(FORBIDDEN_TOKENS_LIGHT));

static STRICT_TOKENS: LazyLock<Regex> = LazyLock::new(|| token_pattern(FORBIDDEN_TOKENS_STRICT));

static STRICT_PHRASES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)\bfull[- ]?body\b").unwrap(),
        Regex::new(r"(?i)\bheadshot\b").unwrap(),
        Regex::new(r"(?i)\bselfie\b").unwrap(),
        Regex::new(r"(?i)\bgroup photo\b").unwrap(),
        Regex::new(r"(?i)\bclose[- ]?up\b").unwrap(),
    ]
});

static SUBJECT_FRAMING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:for|with)\s+(?:a|the)\s+(?:subject|person|character|model)\b").unwrap()
});

static REPEATED_REPLACEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bbackground(?:\s+background\b)+").unwrap());

static TRAILING_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[;,.\s]+$").unwrap());

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

fn token_pattern(tokens: &[&str]) -> Regex {
    let alternation = tokens
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).unwrap()
}

/// Remove subject references from a prompt and format the result.
///
/// Negation clauses ("no people", "without vendors") are lifted out before
/// any rewriting and restored verbatim afterwards, so legitimate exclusions
/// survive even at `Strict`.
pub fn sanitize_subjects(
    text: &str,
    strength: SanitizerStrength,
    strip_trailing_punctuation: bool,
) -> String {
    // Phrase patterns allow a single separator, so runs must be collapsed first.
    let mut out = WHITESPACE.replace_all(text.trim(), " ").into_owned();

    if strength == SanitizerStrength::Off {
        if strip_trailing_punctuation {
            out = strip_trailing(&out);
        }
        return format_prompt(&out);
    }

    let (protected, blocks) = protect_negations(&out);
    out = protected;

    if strength == SanitizerStrength::Strict {
        out = SUBJECT_FRAMING
            .replace_all(&out, "for the background")
            .into_owned();
    }

    let tokens = match strength {
        SanitizerStrength::Light => &*LIGHT_TOKENS,
        _ => &*STRICT_TOKENS,
    };
    out = tokens.replace_all(&out, REPLACEMENT).into_owned();

    if strength == SanitizerStrength::Strict {
        for phrase in STRICT_PHRASES.iter() {
            out = phrase.replace_all(&out, REPLACEMENT).into_owned();
        }
    }

    // Keep the first occurrence's casing.
    out = REPEATED_REPLACEMENT
        .replace_all(&out, |caps: &Captures| {
            caps[0].split_whitespace().next().unwrap_or(REPLACEMENT).to_string()
        })
        .into_owned();
    out = WHITESPACE.replace_all(&out, " ").trim().to_string();

    out = restore_negations(&out, &blocks);

    if strip_trailing_punctuation {
        out = strip_trailing(&out);
    }
    format_prompt(&out)
}

/// Replace each negation clause with `__NEG_BLOCK_<n>__`.
fn protect_negations(text: &str) -> (String, Vec<String>) {
    let mut blocks = Vec::new();
    let protected = NEGATION_CLAUSE
        .replace_all(text, |caps: &Captures| {
            blocks.push(caps[0].to_string());
            format!("__NEG_BLOCK_{}__", blocks.len() - 1)
        })
        .into_owned();
    (protected, blocks)
}

fn restore_negations(text: &str, blocks: &[String]) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|i| blocks.get(i))
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn strip_trailing(text: &str) -> String {
    TRAILING_PUNCTUATION.replace(text, "").trim().to_string()
}
