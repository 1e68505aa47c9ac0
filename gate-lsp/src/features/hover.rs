use gate_analysis::hover as resolve_hover;
use gate_parser::gate::ast::{Position, Range, SourceLocation};

#[derive(Debug, Clone, PartialEq)]
pub struct HoverResult {
    pub range: Range,
    pub contents: String,
}

/// Hover at an editor position. Positions past the end of a line or the document clamp.
pub fn hover(text: &str, position: Position) -> Option<HoverResult> {
    let location = SourceLocation::new(text);
    let offset = location.position_to_byte(position);
    let resolved = resolve_hover(text, offset)?;
    Some(HoverResult {
        range: location.byte_range_to_range(&resolved.span),
        contents: resolved.contents,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::test_support::sample_source;

    #[test]
    fn test_hover_on_context_variable_in_sample() {
        let result = hover(sample_source(), Position::new(0, 40)).expect("hover on %MODEL%");
        assert!(result.contents.contains("`%MODEL%`"));
        assert_eq!(result.range.start, Position::new(0, 37));
        assert_eq!(result.range.end, Position::new(0, 44));
    }

    #[test]
    fn test_hover_counts_utf16_columns() {
        let result = hover("Δ ↯", Position::new(0, 2)).expect("hover on intent glyph");
        assert!(result.contents.contains("Intent Discharge"));
        assert_eq!(result.range.span, 3..6);
        assert_eq!(result.range.start.column, 2);
    }

    #[test]
    fn test_hover_past_end_clamps() {
        let result = hover("x ϟ", Position::new(9, 9)).expect("clamped to the last word");
        assert!(result.contents.contains("SLEDGE SPARK"));
    }

    #[test]
    fn test_no_hover_on_plain_word() {
        assert_eq!(hover("plain", Position::new(0, 1)), None);
    }
}
