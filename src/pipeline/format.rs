//! Prompt formatter: clause splitting, case-insensitive dedup, punctuation repair.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Characters stripped from both ends of every clause.
fn is_clause_edge(c: char) -> bool {
    matches!(c, ' ' | ',' | '.' | ';' | ':')
}

/// Format a prompt into `clause, clause, clause.` form.
///
/// Dash variants (en dash, em dash, minus sign) act as clause separators like
/// `;` and `|`. Whitespace runs inside a clause collapse to one space before
/// clauses are deduplicated case-insensitively, keeping the first
/// occurrence with its original casing. A terminal period is appended unless
/// the text already ends in `.`, `!` or `?`. Empty input stays empty.
pub fn format_prompt(text: &str) -> String {
    let unified: String = text
        .trim()
        .chars()
        .map(|c| match c {
            '\u{2013}' | '\u{2014}' | '\u{2212}' => ';',
            other => other,
        })
        .collect();

    let mut seen = HashSet::new();
    let clauses: Vec<String> = unified
        .split([';', '|'])
        .map(|part| {
            WHITESPACE
                .replace_all(part, " ")
                .trim_matches(is_clause_edge)
                .trim()
                .to_string()
        })
        .filter(|clause| !clause.is_empty())
        .filter(|clause| seen.insert(clause.to_lowercase()))
        .collect();

    let joined = clauses.join(", ");
    let mut out = WHITESPACE.replace_all(joined.trim(), " ").into_owned();
    if out.is_empty() {
        return out;
    }
    if !out.ends_with(['.', '!', '?']) {
        out.push('.');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deduplicates_clauses() {
        assert_eq!(
            format_prompt("red wall; red wall; blue floor"),
            "red wall, blue floor."
        );
    }

    #[test]
    fn dedup_is_case_insensitive_and_keeps_first_casing() {
        assert_eq!(
            format_prompt("Soft Light | soft light | Concrete"),
            "Soft Light, Concrete."
        );
    }

    #[test]
    fn dash_variants_split_clauses() {
        assert_eq!(
            format_prompt("Office interior – neutral lighting — glass walls"),
            "Office interior, neutral lighting, glass walls."
        );
    }

    #[test]
    fn ascii_hyphen_is_not_a_separator() {
        assert_eq!(format_prompt("full-length windows"), "full-length windows.");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(
            format_prompt("  wet   pavement\n\nat  night  "),
            "wet pavement at night."
        );
    }

    #[test]
    fn dedup_ignores_inner_whitespace() {
        assert_eq!(
            format_prompt("red  wall; red wall; blue\tfloor | blue floor"),
            "red wall, blue floor."
        );
    }

    #[test]
    fn keeps_existing_terminal_punctuation() {
        assert_eq!(format_prompt("what a view!"), "what a view!");
        assert_eq!(format_prompt("empty hall?"), "empty hall?");
    }

    #[test]
    fn strips_clause_edges() {
        assert_eq!(format_prompt(", dusty shelves. ; : moss ,"), "dusty shelves, moss.");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(format_prompt(""), "");
        assert_eq!(format_prompt("   "), "");
        assert_eq!(format_prompt(" ; | . "), "");
    }

    #[test]
    fn formatting_is_idempotent() {
        let inputs = [
            "red wall; red wall; blue floor",
            "Neon alley – rain — reflections | neon alley",
            "a calm lake!",
            "stone floor, wooden beams",
        ];
        for input in inputs {
            let once = format_prompt(input);
            assert_eq!(format_prompt(&once), once, "input: {input}");
        }
    }
}
