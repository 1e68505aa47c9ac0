//! Trace documents
//!
//!     A trace document is the line-oriented text every gate tool emits: compiled
//!     programs, evolution reports and so on. It is built from three kinds of entries:
//!
//!         #==TRACE:<NAME>           header
//!         >trace::<KIND>:           record, followed by one line per field:
//!             key:"value"
//!         # free text               note
//!
//!     Field values are written verbatim between the quotes. Raw block text may contain
//!     quotes and newlines; readers are expected to treat the trace as display text, not to
//!     round-trip it.

use crate::gate::ir::{build_ir, IrOp, IrProgram};
use crate::gate::parsing::parse;
use serde::Serialize;
use std::fmt;

const FIELD_INDENT: &str = "    ";

/// Placeholder note emitted for a program with no instructions.
pub const EMPTY_PROGRAM_NOTE: &str = "no IR instructions detected";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceRecord {
    pub kind: String,
    /// Ordered `key → value` pairs; order is preserved in the output.
    pub fields: Vec<(String, String)>,
}

impl TraceRecord {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "entry", rename_all = "lowercase")]
pub enum TraceEntry {
    Header { name: String },
    Record(TraceRecord),
    Note { text: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TraceDocument {
    pub entries: Vec<TraceEntry>,
}

impl TraceDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>) -> Self {
        self.entries.push(TraceEntry::Header { name: name.into() });
        self
    }

    pub fn record(mut self, record: TraceRecord) -> Self {
        self.entries.push(TraceEntry::Record(record));
        self
    }

    pub fn note(mut self, text: impl Into<String>) -> Self {
        self.entries.push(TraceEntry::Note { text: text.into() });
        self
    }

    pub fn records(&self) -> impl Iterator<Item = &TraceRecord> {
        self.entries.iter().filter_map(|entry| match entry {
            TraceEntry::Record(record) => Some(record),
            _ => None,
        })
    }

    /// Render to text: entries separated by newlines, no trailing newline.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TraceDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = Vec::new();
        for entry in &self.entries {
            match entry {
                TraceEntry::Header { name } => lines.push(format!("#==TRACE:{}", name)),
                TraceEntry::Note { text } => lines.push(format!("# {}", text)),
                TraceEntry::Record(record) => {
                    lines.push(format!(">trace::{}:", record.kind));
                    for (key, value) in &record.fields {
                        lines.push(format!("{}{}:\"{}\"", FIELD_INDENT, key, value));
                    }
                }
            }
        }
        f.write_str(&lines.join("\n"))
    }
}

/// Build the trace document for a program.
pub fn trace_document(program: &IrProgram) -> TraceDocument {
    let mut document = TraceDocument::new().header("COMPILED");

    for instruction in &program.instructions {
        document = match instruction.op {
            IrOp::Call => {
                document.record(TraceRecord::new("FUNCTION").field("raw", instruction.raw()))
            }
            IrOp::StateBlock => document
                .header("STATE")
                .record(TraceRecord::new("STATE").field("raw", instruction.raw())),
        };
    }

    if program.is_empty() {
        document = document.note(EMPTY_PROGRAM_NOTE);
    }
    document
}

/// Render a program to trace text.
pub fn render_trace(program: &IrProgram) -> String {
    trace_document(program).render()
}

/// Parse, lower and render in one step.
pub fn compile_to_trace(source: &str) -> String {
    render_trace(&build_ir(&parse(source)))
}
