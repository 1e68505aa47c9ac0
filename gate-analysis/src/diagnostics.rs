//! Diagnostic collection for gate documents
//!
//! Gate semantics are stateful across a whole document (a `break_gate` on line 40 can be
//! confirmed on line 2), so diagnostics are produced by whole-document rules rather than
//! per statement checks.
//!
//! ## Rules
//!
//! 1. **unconfirmed-break**: `break_gate` with no `? confirm:"YES"` anywhere
//! 2. **irreversible-active**: `!!IRREVERSIBLE` together with `STATUS="ACTIVE"`
//!
//! Each rule implements [`Rule`] and knows nothing about the others. A [`RuleRegistry`]
//! runs them in registration order and concatenates their output.

use gate_parser::gate::ast::{Position, Range, SourceLocation, SyntaxNode};
use serde::Serialize;
use std::fmt;

/// Source label attached to every diagnostic.
pub const DIAGNOSTIC_SOURCE: &str = "gate-lsp";

pub const UNCONFIRMED_BREAK: &str = "unconfirmed-break";
pub const IRREVERSIBLE_ACTIVE: &str = "irreversible-active";

const BREAK_DIRECTIVE: &str = "break_gate";
const CONFIRMATIONS: [&str; 2] = ["? confirm:\"YES\"", "?confirm:\"YES\""];
const IRREVERSIBLE_MARKER: &str = "!!IRREVERSIBLE";
const ACTIVE_STATUS: &str = "STATUS=\"ACTIVE\"";

/// Diagnostic severity levels matching LSP protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Information,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSeverity::Error => write!(f, "error"),
            DiagnosticSeverity::Warning => write!(f, "warning"),
            DiagnosticSeverity::Information => write!(f, "info"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub range: Range,
    pub severity: DiagnosticSeverity,
    pub message: String,
    pub rule_id: &'static str,
    pub source: &'static str,
}

impl Diagnostic {
    pub fn new(
        rule_id: &'static str,
        range: Range,
        severity: DiagnosticSeverity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            range,
            severity,
            message: message.into(),
            rule_id,
            source: DIAGNOSTIC_SOURCE,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}] {}",
            self.range.start, self.severity, self.rule_id, self.message
        )
    }
}

/// A whole-document check.
///
/// Implementations must be pure: same text and tree in, same diagnostics out, with no
/// dependency on what other rules report.
pub trait Rule: Send + Sync {
    fn id(&self) -> &'static str;

    fn evaluate(&self, text: &str, tree: &SyntaxNode) -> Vec<Diagnostic>;
}

/// Warns about `break_gate` when the document never confirms it.
///
/// Only the two literal spellings in [`CONFIRMATIONS`] count as confirmation.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfirmedBreakRule;

impl Rule for UnconfirmedBreakRule {
    fn id(&self) -> &'static str {
        UNCONFIRMED_BREAK
    }

    fn evaluate(&self, text: &str, _tree: &SyntaxNode) -> Vec<Diagnostic> {
        let Some(offset) = text.find(BREAK_DIRECTIVE) else {
            return Vec::new();
        };
        if CONFIRMATIONS.iter().any(|confirm| text.contains(confirm)) {
            return Vec::new();
        }

        let start = SourceLocation::new(text).byte_to_position(offset);
        let end = Position::new(start.line, start.column + BREAK_DIRECTIVE.len());
        let range = Range::new(offset..offset + BREAK_DIRECTIVE.len(), start, end);

        vec![Diagnostic::new(
            UNCONFIRMED_BREAK,
            range,
            DiagnosticSeverity::Warning,
            "break_gate detected without explicit ? confirm:\"YES\"",
        )]
    }
}

/// Flags documents that are both irreversible and still marked active.
#[derive(Debug, Default, Clone, Copy)]
pub struct IrreversibleActiveRule;

impl Rule for IrreversibleActiveRule {
    fn id(&self) -> &'static str {
        IRREVERSIBLE_ACTIVE
    }

    fn evaluate(&self, text: &str, _tree: &SyntaxNode) -> Vec<Diagnostic> {
        if !(text.contains(IRREVERSIBLE_MARKER) && text.contains(ACTIVE_STATUS)) {
            return Vec::new();
        }

        let first_char = text.chars().next().map(char::len_utf8).unwrap_or(0);
        let range = Range::new(0..first_char, Position::new(0, 0), Position::new(0, 1));

        vec![Diagnostic::new(
            IRREVERSIBLE_ACTIVE,
            range,
            DiagnosticSeverity::Information,
            "Irreversibility marker present with STATUS=\"ACTIVE\"; check gate state logic.",
        )]
    }
}

/// Ordered set of rules evaluated against a document.
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleRegistry {
    /// A registry with no rules.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// The built-in rules, in their canonical order.
    pub fn standard() -> Self {
        Self::empty()
            .with_rule(UnconfirmedBreakRule)
            .with_rule(IrreversibleActiveRule)
    }

    pub fn with_rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Drop every rule whose id is not accepted by `keep`.
    pub fn retain(mut self, keep: impl Fn(&str) -> bool) -> Self {
        self.rules.retain(|rule| keep(rule.id()));
        self
    }

    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.id()).collect()
    }

    pub fn analyze(&self, text: &str, tree: &SyntaxNode) -> Vec<Diagnostic> {
        self.rules
            .iter()
            .flat_map(|rule| rule.evaluate(text, tree))
            .collect()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Run the standard rules over a document.
pub fn analyze(text: &str, tree: &SyntaxNode) -> Vec<Diagnostic> {
    RuleRegistry::standard().analyze(text, tree)
}
