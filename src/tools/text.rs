//! Small text helpers shared by the generators

use regex::Regex;
use std::sync::OnceLock;

/// Heavy horizontal rule used by the rendered templates
pub const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

fn sentence_terminators() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]+").expect("static sentence regex"))
}

/// Split on runs of `.`, `!` or `?` and keep trimmed fragments longer
/// than 20 characters
pub fn split_sentences(content: &str) -> Vec<String> {
    sentence_terminators()
        .split(content)
        .map(str::trim)
        .filter(|s| s.chars().count() > 20)
        .map(str::to_string)
        .collect()
}

/// First `max` characters of `s`
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Uppercase the first character and lowercase the rest
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Number of whitespace-separated words
pub fn word_count(s: &str) -> usize {
    s.split_whitespace().count()
}
