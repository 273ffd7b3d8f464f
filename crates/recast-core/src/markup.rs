//! Markup utilities consumed by the [`Text`](crate::objects::Text) wrapper
//!
//! Copyright (c) 2025 Recast Team
//! Licensed under the Apache-2.0 license

use regex::Regex;
use std::sync::OnceLock;

fn tag_pattern() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern is valid"))
}

/// Remove every markup tag, keeping the text between tags
pub fn strip_markup(input: &str) -> String {
    tag_pattern().replace_all(input, "").into_owned()
}

/// Escape the characters that are significant in markup, quotes included
pub fn escape_markup(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Plain-text form: markup and punctuation removed, whitespace collapsed
pub fn clean(input: &str) -> String {
    let stripped = strip_markup(input);
    let kept: String = stripped
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First `count` characters, trailing whitespace trimmed
pub fn truncate_chars(input: &str, count: usize) -> String {
    let truncated: String = input.chars().take(count).collect();
    truncated.trim_end().to_string()
}

/// First `count` whitespace-separated words joined by single spaces
pub fn truncate_words(input: &str, count: usize) -> String {
    input.split_whitespace().take(count).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markup() {
        assert_eq!(
            strip_markup("Text with <strong>html</strong> tag"),
            "Text with html tag"
        );
        assert_eq!(strip_markup("<p\nclass=\"x\">multi</p>"), "multi");
    }

    #[test]
    fn test_escape_markup() {
        assert_eq!(
            escape_markup(r#"some <em>"text"</em> & 'more'"#),
            "some &lt;em&gt;&quot;text&quot;&lt;/em&gt; &amp; &#039;more&#039;"
        );
    }

    #[test]
    fn test_clean_drops_punctuation() {
        assert_eq!(clean("some text!"), "some text");
        assert_eq!(clean("  <b>spaced</b>   out  "), "spaced out");
    }

    #[test]
    fn test_truncation() {
        assert_eq!(truncate_chars("some text", 4), "some");
        assert_eq!(truncate_chars("some text", 5), "some");
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_words("some text in the box", 3), "some text in");
        assert_eq!(truncate_words("short", 3), "short");
    }
}
