//! Token definitions for the gate language
//!
//! The token classes are closed: anything the lexer does not recognise becomes a
//! [`TokenKind::Word`], so the set never grows at runtime. Declaration order here
//! matches the matching priority used by the lexer (see [`crate::gate::lexing`]).

use serde::Serialize;
use std::fmt;
use std::ops::Range as ByteRange;

/// All possible token classes in the gate language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenKind {
    /// `!admin::`, `!system::`, `!rule::`, `set::`, `@meta::`
    ControlKeyword,
    /// `%MODEL%`
    ContextVariable,
    /// `> FUNCTION_CALL:`
    FunctionCallHeader,
    /// `> STATE_CHANGE:`
    StateChangeHeader,
    /// `> DECLARATION::FORMAL:`
    DeclarationHeader,
    /// `#==SECTION:<rest of line>`
    SectionHeader,
    /// `#==TRACE:<rest of line>`
    TraceHeader,
    /// `"""..."""`, may span lines
    MultilineString,
    /// `"..."` with backslash escapes
    String,
    /// One of Δ ↯ ϟ ⌘ ⌾ ⇜ ⇝ ⇹
    Glyph,
    /// `!!IRREVERSIBLE`
    Irreversible,
    /// `[GATE:13]`, `[SLEDGE:=>1]`
    Directive,
    /// Catch-all run of non-whitespace
    Word,
}

impl TokenKind {
    /// Block headers open a block that runs until the next top-level marker.
    pub fn is_block_header(self) -> bool {
        matches!(
            self,
            TokenKind::FunctionCallHeader
                | TokenKind::StateChangeHeader
                | TokenKind::DeclarationHeader
        )
    }

    /// `#==SECTION:` and `#==TRACE:` lines.
    pub fn is_section_header(self) -> bool {
        matches!(self, TokenKind::SectionHeader | TokenKind::TraceHeader)
    }

    /// Anything that closes the currently open block.
    pub fn is_top_level_marker(self) -> bool {
        self.is_block_header() || self.is_section_header()
    }

    pub fn is_string(self) -> bool {
        matches!(self, TokenKind::String | TokenKind::MultilineString)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::ControlKeyword => "control-keyword",
            TokenKind::ContextVariable => "context-variable",
            TokenKind::FunctionCallHeader => "function-call-header",
            TokenKind::StateChangeHeader => "state-change-header",
            TokenKind::DeclarationHeader => "declaration-header",
            TokenKind::SectionHeader => "section-header",
            TokenKind::TraceHeader => "trace-header",
            TokenKind::MultilineString => "multiline-string",
            TokenKind::String => "string",
            TokenKind::Glyph => "glyph",
            TokenKind::Irreversible => "irreversible",
            TokenKind::Directive => "directive",
            TokenKind::Word => "word",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lexed token: its class, the literal source text and the byte span it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: ByteRange<usize>,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: ByteRange<usize>) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    pub fn start_offset(&self) -> usize {
        self.span.start
    }

    pub fn end_offset(&self) -> usize {
        self.span.end
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}..{} {:?}",
            self.kind, self.span.start, self.span.end, self.text
        )
    }
}
