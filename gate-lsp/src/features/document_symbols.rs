//! Document outline
//!
//! Sections nest the blocks that follow them until the next section. Trace headers
//! close a section too and show up as leaf symbols of their own.

use gate_parser::gate::ast::{Block, Range, SourceLocation, SyntaxNode};
use gate_parser::gate::token::TokenKind;
use lsp_types::SymbolKind;

#[derive(Debug, Clone, PartialEq)]
pub struct GateDocumentSymbol {
    pub name: String,
    pub detail: Option<String>,
    pub kind: SymbolKind,
    pub range: Range,
    pub selection_range: Range,
    pub children: Vec<GateDocumentSymbol>,
}

pub fn collect_document_symbols(text: &str, tree: &SyntaxNode) -> Vec<GateDocumentSymbol> {
    let location = SourceLocation::new(text);
    let mut symbols: Vec<GateDocumentSymbol> = Vec::new();
    let mut open_section: Option<GateDocumentSymbol> = None;

    for node in tree.children() {
        let Some(block) = node.as_block() else {
            continue;
        };
        let symbol = block_symbol(node, block, &location);

        if block.header.kind == TokenKind::SectionHeader {
            symbols.extend(open_section.take());
            open_section = Some(symbol);
        } else if block.header.kind == TokenKind::TraceHeader {
            symbols.extend(open_section.take());
            symbols.push(symbol);
        } else if let Some(section) = open_section.as_mut() {
            section.range = location.byte_range_to_range(&(section.range.span.start..block.span.end));
            section.children.push(symbol);
        } else {
            symbols.push(symbol);
        }
    }
    symbols.extend(open_section);
    symbols
}

fn block_symbol(node: &SyntaxNode, block: &Block, location: &SourceLocation) -> GateDocumentSymbol {
    let (name, kind) = match node {
        SyntaxNode::FunctionCallBlock(_) => (body_summary(block, "call"), SymbolKind::FUNCTION),
        SyntaxNode::StateChangeBlock(_) => (body_summary(block, "state change"), SymbolKind::EVENT),
        SyntaxNode::DeclarationBlock(_) => (body_summary(block, "declaration"), SymbolKind::STRUCT),
        _ => (header_title(block), header_kind(block)),
    };

    GateDocumentSymbol {
        name,
        detail: Some(block.header.text.trim_end_matches(':').trim().to_string()),
        kind,
        range: location.byte_range_to_range(&block.span),
        selection_range: location.byte_range_to_range(&block.header.span),
        children: Vec::new(),
    }
}

fn header_kind(block: &Block) -> SymbolKind {
    if block.header.kind == TokenKind::TraceHeader {
        SymbolKind::EVENT
    } else {
        SymbolKind::NAMESPACE
    }
}

/// Text after `#==SECTION:` / `#==TRACE:`.
fn header_title(block: &Block) -> String {
    let title = block
        .title()
        .split_once(':')
        .map(|(_, rest)| rest.trim())
        .unwrap_or_default();
    if title.is_empty() {
        "Section".to_string()
    } else {
        title.to_string()
    }
}

/// First line of the body, trimmed to something an outline can show.
fn body_summary(block: &Block, fallback: &str) -> String {
    const MAX_CHARS: usize = 40;

    let first_line = block.raw[block.header.text.len()..]
        .trim_start()
        .lines()
        .next()
        .unwrap_or_default()
        .trim();
    if first_line.is_empty() {
        return fallback.to_string();
    }
    let mut name: String = first_line.chars().take(MAX_CHARS).collect();
    if first_line.chars().count() > MAX_CHARS {
        name.push('…');
    }
    name
}
