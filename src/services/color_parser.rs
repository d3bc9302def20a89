//! Turns arbitrary pasted text into an ordered set of unique colors.
//!
//! Works without per-format grammars: `#RRGGBB` codes are pulled out of
//! whatever surrounds them (JSON arrays, `c("...")`, CSS, plain lists). Only
//! when the text holds no such code at all is it split on separators, so that
//! bare `RRGGBB` tokens still work.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::models::Color;

fn hash_hex_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"#[0-9A-Fa-f]{6}").expect("valid hex pattern"))
}

fn separator_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[,;\s]+").expect("valid separator pattern"))
}

/// Parse pasted text into unique colors, in order of first appearance.
///
/// Never fails: malformed tokens are dropped and an empty result is a normal
/// outcome for text with no recognizable colors.
pub fn parse_colors(text: &str) -> Vec<Color> {
    let raw = text.trim();
    if raw.is_empty() {
        return Vec::new();
    }

    let matches: Vec<&str> = hash_hex_pattern()
        .find_iter(raw)
        .map(|m| m.as_str())
        .collect();

    let candidates = if matches.is_empty() {
        separator_pattern()
            .split(raw)
            .filter(|token| !token.is_empty())
            .collect()
    } else {
        matches
    };

    let mut seen = HashSet::new();
    let mut colors = Vec::new();
    for candidate in candidates {
        let Ok(color) = Color::from_hex(candidate) else {
            continue;
        };
        if seen.insert(color.to_hex()) {
            colors.push(color);
        }
    }
    colors
}

/// Parse pasted text into canonical uppercase hex strings.
pub fn parse_hex_list(text: &str) -> Vec<String> {
    parse_colors(text).into_iter().map(Color::to_hex).collect()
}
