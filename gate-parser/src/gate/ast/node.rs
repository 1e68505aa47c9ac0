//! Syntax tree nodes
//!
//! Node kinds form a closed enum so that lowering and analysis can match exhaustively.
//! A new block kind is a new variant, and the compiler then points at every consumer
//! that needs to decide what to do with it.

use crate::gate::token::Token;
use serde::Serialize;
use std::ops::Range as ByteRange;

/// A header token together with everything up to the next top-level marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    pub header: Token,
    pub body: Vec<SyntaxNode>,
    /// Byte span from the start of the header to the end of the last body token.
    pub span: ByteRange<usize>,
    /// Verbatim source text covered by `span`.
    pub raw: String,
}

impl Block {
    /// Build a block, slicing its raw text out of `source`.
    pub fn new(header: Token, body: Vec<SyntaxNode>, source: &str) -> Self {
        let end = body
            .iter()
            .filter_map(SyntaxNode::end_offset)
            .last()
            .unwrap_or(header.span.end);
        let span = header.span.start..end;
        let raw = source[span.clone()].to_string();
        Self {
            header,
            body,
            span,
            raw,
        }
    }

    /// Text of the header token with the marker punctuation left intact.
    pub fn title(&self) -> &str {
        &self.header.text
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum SyntaxNode {
    Document(Vec<SyntaxNode>),
    FunctionCallBlock(Block),
    StateChangeBlock(Block),
    DeclarationBlock(Block),
    SectionHeader(Block),
    RawToken(Token),
}

impl SyntaxNode {
    pub fn kind_name(&self) -> &'static str {
        match self {
            SyntaxNode::Document(_) => "Document",
            SyntaxNode::FunctionCallBlock(_) => "FunctionCallBlock",
            SyntaxNode::StateChangeBlock(_) => "StateChangeBlock",
            SyntaxNode::DeclarationBlock(_) => "DeclarationBlock",
            SyntaxNode::SectionHeader(_) => "SectionHeader",
            SyntaxNode::RawToken(_) => "RawToken",
        }
    }

    /// Direct children: top-level nodes of a document, or the body of a block.
    pub fn children(&self) -> &[SyntaxNode] {
        match self {
            SyntaxNode::Document(children) => children,
            SyntaxNode::FunctionCallBlock(block)
            | SyntaxNode::StateChangeBlock(block)
            | SyntaxNode::DeclarationBlock(block)
            | SyntaxNode::SectionHeader(block) => &block.body,
            SyntaxNode::RawToken(_) => &[],
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match self {
            SyntaxNode::FunctionCallBlock(block)
            | SyntaxNode::StateChangeBlock(block)
            | SyntaxNode::DeclarationBlock(block)
            | SyntaxNode::SectionHeader(block) => Some(block),
            SyntaxNode::Document(_) | SyntaxNode::RawToken(_) => None,
        }
    }

    /// Every token under this node, in source order.
    pub fn tokens(&self) -> Vec<&Token> {
        let mut tokens = Vec::new();
        self.collect_tokens(&mut tokens);
        tokens
    }

    fn collect_tokens<'a>(&'a self, out: &mut Vec<&'a Token>) {
        match self {
            SyntaxNode::RawToken(token) => out.push(token),
            SyntaxNode::Document(children) => {
                for child in children {
                    child.collect_tokens(out);
                }
            }
            SyntaxNode::FunctionCallBlock(block)
            | SyntaxNode::StateChangeBlock(block)
            | SyntaxNode::DeclarationBlock(block)
            | SyntaxNode::SectionHeader(block) => {
                out.push(&block.header);
                for child in &block.body {
                    child.collect_tokens(out);
                }
            }
        }
    }

    /// Byte span of the node; `None` for an empty document.
    pub fn span(&self) -> Option<ByteRange<usize>> {
        match self {
            SyntaxNode::RawToken(token) => Some(token.span.clone()),
            SyntaxNode::Document(children) => {
                let start = children.first()?.span()?.start;
                let end = children.last()?.span()?.end;
                Some(start..end)
            }
            SyntaxNode::FunctionCallBlock(block)
            | SyntaxNode::StateChangeBlock(block)
            | SyntaxNode::DeclarationBlock(block)
            | SyntaxNode::SectionHeader(block) => Some(block.span.clone()),
        }
    }

    fn end_offset(&self) -> Option<usize> {
        self.span().map(|span| span.end)
    }
}
