//! Semantic analysis for Gate documents
//!
//! Everything here is a pure function of the document text (plus a cursor offset for
//! hover). Editors and the CLI call straight into these functions; nothing is cached and
//! nothing is shared between calls.
//!
//! - [`diagnostics`]: whole-document rules behind published diagnostics
//! - [`evolution`]: heuristic "progress" score from a data-driven scoring table
//! - [`lattice`]: gate-break preview
//! - [`hover`]: word under cursor to markdown

pub mod diagnostics;
pub mod evolution;
pub mod hover;
pub mod lattice;

pub use diagnostics::{analyze, Diagnostic, DiagnosticSeverity, Rule, RuleRegistry};
pub use evolution::{estimate, EvolutionReport, ScoringTable};
pub use hover::{hover, HoverResult};
pub use lattice::{preview_break, GateBreakPreview, LatticeSettings};
