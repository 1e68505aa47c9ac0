//! Hover resolution
//!
//! Hover works on raw text rather than tokens so it behaves the same on broken input.
//! The word under the cursor runs from just after the previous space (or the start of the
//! document) to the next space, newline or carriage return (or the end of the document).
//! Line breaks only end a word on the right: a cursor on the first word of a line sees the
//! tail of the previous line glued to it, and gets no hover unless that combined word is
//! known.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::ops::Range as ByteRange;

static CONTEXT_VARIABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^%[A-Z]+%$").expect("context variable pattern is a valid regex"));

/// Glyphs with a known meaning. ⌘ ⌾ ⇜ ⇝ ⇹ are lexed but not described yet.
const GLYPHS: &[(&str, &str, &str)] = &[
    ("Δ", "Delta Shift", "Represents recorded state transition."),
    ("↯", "Intent Discharge", "Human-bound intent force."),
    (
        "ϟ",
        "SLEDGE SPARK",
        "Represents Sledge discharge at a Gate boundary.",
    ),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoverResult {
    /// Byte span of the hovered word.
    pub span: ByteRange<usize>,
    /// Markdown contents.
    pub contents: String,
}

/// The word around `offset` and its byte span. Out-of-range offsets clamp to the text.
pub fn word_at(text: &str, offset: usize) -> (&str, ByteRange<usize>) {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }

    let start = text[..offset].rfind(' ').map(|idx| idx + 1).unwrap_or(0);
    let end = text[offset..]
        .find(|c: char| matches!(c, ' ' | '\n' | '\r'))
        .map(|idx| offset + idx)
        .unwrap_or(text.len());

    if start >= end {
        return ("", offset..offset);
    }
    (&text[start..end], start..end)
}

/// Markdown for a known word, if any.
pub fn describe(word: &str) -> Option<String> {
    if CONTEXT_VARIABLE.is_match(word) {
        return Some(format!("**Context Variable**\n\nSymbol: `{}`", word));
    }

    GLYPHS
        .iter()
        .find(|(glyph, _, _)| *glyph == word)
        .map(|(glyph, title, body)| format!("**{} {}**\n\n{}", glyph, title, body))
}

pub fn hover(text: &str, offset: usize) -> Option<HoverResult> {
    let (word, span) = word_at(text, offset);
    describe(word).map(|contents| HoverResult { span, contents })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_variable() {
        let text = "bind %MODEL% now";
        let result = hover(text, 8).unwrap();
        assert_eq!(result.span, 5..12);
        assert!(result.contents.contains("Context Variable"));
        assert!(result.contents.contains("`%MODEL%`"));
    }

    #[test]
    fn test_glyphs() {
        let text = "Δ ↯ ϟ";
        assert!(hover(text, 0).unwrap().contents.contains("Delta Shift"));
        assert!(hover(text, 3).unwrap().contents.contains("Intent Discharge"));
        assert!(hover(text, 7).unwrap().contents.contains("SLEDGE SPARK"));
    }

    #[test]
    fn test_cursor_at_word_end_still_hovers() {
        let text = "x Δ";
        assert_eq!(hover(text, text.len()).unwrap().span, 2..4);
    }

    #[test]
    fn test_plain_word_has_no_hover() {
        assert_eq!(hover("just words", 2), None);
    }

    #[test]
    fn test_reserved_glyphs_have_no_hover() {
        for glyph in ["⌘", "⌾", "⇜", "⇝", "⇹"] {
            assert_eq!(hover(glyph, 0), None, "{}", glyph);
        }
    }

    #[test]
    fn test_lowercase_variable_is_not_context() {
        assert_eq!(hover("%model%", 1), None);
        assert_eq!(hover("%%", 1), None);
    }

    #[test]
    fn test_word_stops_at_newline_on_the_right() {
        let (word, span) = word_at("%A%\nrest", 1);
        assert_eq!(word, "%A%");
        assert_eq!(span, 0..3);
        assert!(hover("%A%\nrest", 1).is_some());
    }

    #[test]
    fn test_crlf_line_ending_is_not_part_of_the_word() {
        let text = "gate:13 Δ\r\n%MODEL%\r\n";
        let result = hover(text, 8).unwrap();
        assert_eq!(result.span, 8..10);
        assert!(result.contents.contains("Delta Shift"));
        assert_eq!(word_at(text, 10).0, "Δ");
    }

    #[test]
    fn test_word_does_not_stop_at_newline_on_the_left() {
        let (word, _) = word_at("tail\nΔ", 6);
        assert_eq!(word, "tail\nΔ");
        assert_eq!(hover("tail\nΔ", 6), None);
    }

    #[test]
    fn test_offsets_clamp() {
        assert_eq!(hover("Δ", 1).unwrap().span, 0..2);
        assert_eq!(hover("Δ", 500).unwrap().span, 0..2);
        assert_eq!(hover("", 3), None);
    }

    #[test]
    fn test_cursor_on_space_has_no_hover() {
        assert_eq!(hover("Δ  Δ", 3), None);
    }
}
