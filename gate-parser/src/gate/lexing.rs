//! Lexer
//!
//!     Converts raw gate source into an ordered sequence of [`Token`]s tagged with their byte
//!     spans. The lexer is total: it never fails, whatever the input, because hover and
//!     diagnostics have to keep working while a document is half typed.
//!
//! Matching Strategy
//!
//!     All token classes are compiled into a single alternation with one named group per
//!     class. The regex engine resolves alternations leftmost-first, so at every position the
//!     first class in priority order that matches wins, even if a later class (typically the
//!     fallback word) could match more text. That is the behaviour the language relies on:
//!
//!         `%MODEL%,`   lexes as `%MODEL%` followed by the word `,`
//!         `ab%MODEL%`  lexes as one word, since only the word class matches at `a`
//!
//!     Whitespace never starts a match, so it is skipped without producing tokens. Any other
//!     character is at least matched by the fallback word class, which is what makes the
//!     token spans cover every non-whitespace character of the input.

use crate::gate::token::{Token, TokenKind};
use once_cell::sync::Lazy;
use regex::Regex;

/// Named groups in priority order, paired with the token class they produce.
const CLASSES: &[(&str, TokenKind)] = &[
    ("keyword", TokenKind::ControlKeyword),
    ("context", TokenKind::ContextVariable),
    ("call", TokenKind::FunctionCallHeader),
    ("state", TokenKind::StateChangeHeader),
    ("declaration", TokenKind::DeclarationHeader),
    ("section", TokenKind::SectionHeader),
    ("trace", TokenKind::TraceHeader),
    ("multiline", TokenKind::MultilineString),
    ("string", TokenKind::String),
    ("glyph", TokenKind::Glyph),
    ("irreversible", TokenKind::Irreversible),
    ("directive", TokenKind::Directive),
    ("word", TokenKind::Word),
];

static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"(?P<keyword>!admin::|!system::|!rule::|set::|@meta::)"#,
        r#"|(?P<context>%[A-Z]+%)"#,
        r#"|(?P<call>> FUNCTION_CALL:)"#,
        r#"|(?P<state>> STATE_CHANGE:)"#,
        r#"|(?P<declaration>> DECLARATION::FORMAL:)"#,
        r#"|(?P<section>#==SECTION:[^\n]*)"#,
        r#"|(?P<trace>#==TRACE:[^\n]*)"#,
        r#"|(?P<multiline>"""[\s\S]*?""")"#,
        r#"|(?P<string>"(?:[^"\\\n]|\\.)*")"#,
        r#"|(?P<glyph>[Δ↯ϟ⌘⌾⇜⇝⇹])"#,
        r#"|(?P<irreversible>!!IRREVERSIBLE)"#,
        r#"|(?P<directive>\[[A-Z_]+:[0-9=>]+\])"#,
        r#"|(?P<word>\S+)"#,
    ))
    .expect("token pattern is a valid regex")
});

/// Tokenize gate source text.
pub fn tokenize(source: &str) -> Vec<Token> {
    TOKEN_PATTERN
        .captures_iter(source)
        .filter_map(|captures| {
            CLASSES.iter().find_map(|(group, kind)| {
                captures
                    .name(group)
                    .map(|m| Token::new(*kind, m.as_str(), m.range()))
            })
        })
        .collect()
}
