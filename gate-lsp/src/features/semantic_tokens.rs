use gate_parser::gate::ast::{Range, SourceLocation, SyntaxNode};
use gate_parser::gate::token::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateSemanticTokenKind {
    ControlKeyword,
    ContextVariable,
    CallHeader,
    StateHeader,
    DeclarationHeader,
    SectionHeader,
    TraceHeader,
    String,
    Glyph,
    Irreversible,
    Directive,
}

impl GateSemanticTokenKind {
    /// Returns the semantic token type string for LSP.
    ///
    /// Standard token types keep existing editor themes working without a Gate-specific
    /// theme. Section headers reuse the markup heading scope so outlines read like prose.
    pub fn as_str(self) -> &'static str {
        match self {
            GateSemanticTokenKind::ControlKeyword => "keyword",
            GateSemanticTokenKind::ContextVariable => "variable",
            GateSemanticTokenKind::CallHeader => "function",
            GateSemanticTokenKind::StateHeader => "event",
            GateSemanticTokenKind::DeclarationHeader => "type",
            GateSemanticTokenKind::SectionHeader => "markup.heading",
            GateSemanticTokenKind::TraceHeader => "comment",
            GateSemanticTokenKind::String => "string",
            GateSemanticTokenKind::Glyph => "operator",
            GateSemanticTokenKind::Irreversible => "modifier",
            GateSemanticTokenKind::Directive => "macro",
        }
    }

    /// Plain words are left to the editor's base colour.
    pub fn from_token_kind(kind: TokenKind) -> Option<Self> {
        let mapped = match kind {
            TokenKind::ControlKeyword => GateSemanticTokenKind::ControlKeyword,
            TokenKind::ContextVariable => GateSemanticTokenKind::ContextVariable,
            TokenKind::FunctionCallHeader => GateSemanticTokenKind::CallHeader,
            TokenKind::StateChangeHeader => GateSemanticTokenKind::StateHeader,
            TokenKind::DeclarationHeader => GateSemanticTokenKind::DeclarationHeader,
            TokenKind::SectionHeader => GateSemanticTokenKind::SectionHeader,
            TokenKind::TraceHeader => GateSemanticTokenKind::TraceHeader,
            TokenKind::MultilineString | TokenKind::String => GateSemanticTokenKind::String,
            TokenKind::Glyph => GateSemanticTokenKind::Glyph,
            TokenKind::Irreversible => GateSemanticTokenKind::Irreversible,
            TokenKind::Directive => GateSemanticTokenKind::Directive,
            TokenKind::Word => return None,
        };
        Some(mapped)
    }
}

pub const SEMANTIC_TOKEN_KINDS: &[GateSemanticTokenKind] = &[
    GateSemanticTokenKind::ControlKeyword,
    GateSemanticTokenKind::ContextVariable,
    GateSemanticTokenKind::CallHeader,
    GateSemanticTokenKind::StateHeader,
    GateSemanticTokenKind::DeclarationHeader,
    GateSemanticTokenKind::SectionHeader,
    GateSemanticTokenKind::TraceHeader,
    GateSemanticTokenKind::String,
    GateSemanticTokenKind::Glyph,
    GateSemanticTokenKind::Irreversible,
    GateSemanticTokenKind::Directive,
];

#[derive(Debug, Clone, PartialEq)]
pub struct GateSemanticToken {
    pub kind: GateSemanticTokenKind,
    pub range: Range,
}

/// Semantic tokens for every classified token of the tree, in source order.
pub fn collect_semantic_tokens(text: &str, tree: &SyntaxNode) -> Vec<GateSemanticToken> {
    let location = SourceLocation::new(text);
    tree.tokens()
        .into_iter()
        .filter_map(|token| {
            GateSemanticTokenKind::from_token_kind(token.kind).map(|kind| GateSemanticToken {
                kind,
                range: location.byte_range_to_range(&token.span),
            })
        })
        .collect()
}
