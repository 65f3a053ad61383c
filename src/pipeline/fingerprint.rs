//! Request fingerprints: SHA-256 over normalized, length-prefixed fields.
//!
//! The node version tag is one of the fields, so bumping it starts a fresh key space.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use sha2::{Digest, Sha256};

use super::types::SanitizerStrength;
use crate::config::NODE_VERSION;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Content fingerprint of a generation request: 64 lowercase hex chars.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 8 hex chars, for log lines.
    pub fn short(&self) -> &str {
        &self.0[..8]
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Every field that changes the generated prompt.
#[derive(Debug, Clone, Copy)]
pub struct FingerprintInput<'a> {
    /// The model actually targeted, after tier selection.
    pub model: &'a str,
    pub language: &'a str,
    pub preset_text: &'a str,
    pub style_addon: &'a str,
    pub props: &'a str,
    pub tone: &'a str,
    pub detail_level: u8,
    /// 16 hex chars, or empty when there is no image.
    pub vision_hash: &'a str,
    pub sanitizer: SanitizerStrength,
    /// Remaining output-affecting policy, e.g. template mode.
    pub extra: &'a str,
}

/// Trim, collapse whitespace runs, lowercase.
pub fn normalize_field(value: &str) -> String {
    WHITESPACE.replace_all(value.trim(), " ").to_lowercase()
}

/// Fingerprint with the current node version tag.
pub fn fingerprint(input: &FingerprintInput<'_>) -> Fingerprint {
    fingerprint_with_version(input, NODE_VERSION)
}

/// Fingerprint with an explicit version tag. A different tag yields a
/// disjoint key space.
pub fn fingerprint_with_version(input: &FingerprintInput<'_>, version: &str) -> Fingerprint {
    let detail = input.detail_level.to_string();
    let sanitizer = format!("san:{}", input.sanitizer.as_str());
    let parts = [
        normalize_field(input.model),
        normalize_field(input.language),
        normalize_field(input.preset_text),
        normalize_field(input.style_addon),
        normalize_field(input.props),
        normalize_field(input.tone),
        detail,
        normalize_field(input.vision_hash),
        version.to_string(),
        sanitizer,
        normalize_field(input.extra),
    ];

    let mut hasher = Sha256::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            hasher.update(b"|");
        }
        // Length prefix keeps "a|b" + "c" apart from "a" + "b|c".
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part.as_bytes());
    }
    Fingerprint(format!("{:x}", hasher.finalize()))
}
