//! Parser
//!
//!     Groups the flat token stream into blocks. The grammar has no nesting: a block
//!     header (`> FUNCTION_CALL:`, `> STATE_CHANGE:`, `> DECLARATION::FORMAL:`) or a
//!     section header (`#==SECTION:`, `#==TRACE:`) opens a node whose body is every token
//!     up to the next such marker, and tokens before the first marker are kept as raw
//!     tokens on the document.
//!
//! Recovery
//!
//!     There is no closing marker in the language, so "unterminated" simply means the block
//!     runs to the end of the input. Parsing cannot fail and never drops a token: flattening
//!     the returned tree yields exactly the lexer output.

use crate::gate::ast::{Block, SyntaxNode};
use crate::gate::lexing::tokenize;
use crate::gate::token::{Token, TokenKind};

/// Parse gate source into a [`SyntaxNode::Document`].
pub fn parse(source: &str) -> SyntaxNode {
    let mut children = Vec::new();
    let mut open: Option<(Token, Vec<SyntaxNode>)> = None;

    for token in tokenize(source) {
        if token.kind.is_top_level_marker() {
            if let Some((header, body)) = open.take() {
                children.push(close_block(header, body, source));
            }
            open = Some((token, Vec::new()));
            continue;
        }

        match open.as_mut() {
            Some((_, body)) => body.push(SyntaxNode::RawToken(token)),
            None => children.push(SyntaxNode::RawToken(token)),
        }
    }

    if let Some((header, body)) = open {
        children.push(close_block(header, body, source));
    }

    SyntaxNode::Document(children)
}

fn close_block(header: Token, body: Vec<SyntaxNode>, source: &str) -> SyntaxNode {
    let kind = header.kind;
    let block = Block::new(header, body, source);
    match kind {
        TokenKind::FunctionCallHeader => SyntaxNode::FunctionCallBlock(block),
        TokenKind::StateChangeHeader => SyntaxNode::StateChangeBlock(block),
        TokenKind::DeclarationHeader => SyntaxNode::DeclarationBlock(block),
        _ => SyntaxNode::SectionHeader(block),
    }
}
