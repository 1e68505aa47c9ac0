//! Gate-break preview
//!
//! Projects what a `break_gate` would do to the document's gate counter. Nothing is
//! mutated: the preview only reads the first `gate:<n>` marker.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

pub const DEFAULT_GATE: i64 = 13;
pub const DEFAULT_SLEDGE_COST: u32 = 1;

static GATE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"gate:([0-9]+)").expect("gate marker pattern is a valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GateBreakPreview {
    pub current_gate: i64,
    pub next_gate: i64,
    pub irreversible: bool,
    pub sledge_cost: u32,
}

/// Fallback gate and charge used when previewing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatticeSettings {
    pub default_gate: i64,
    pub sledge_cost: u32,
}

impl Default for LatticeSettings {
    fn default() -> Self {
        Self {
            default_gate: DEFAULT_GATE,
            sledge_cost: DEFAULT_SLEDGE_COST,
        }
    }
}

impl LatticeSettings {
    /// The first `gate:<digits>` marker, if its number fits an `i64`.
    pub fn current_gate(&self, text: &str) -> i64 {
        GATE_MARKER
            .captures(text)
            .and_then(|captures| captures[1].parse::<i64>().ok())
            .unwrap_or(self.default_gate)
    }

    pub fn preview_break(&self, text: &str) -> GateBreakPreview {
        let current_gate = self.current_gate(text);
        GateBreakPreview {
            current_gate,
            next_gate: current_gate.saturating_sub(1),
            irreversible: true,
            sledge_cost: self.sledge_cost,
        }
    }
}

/// Preview a gate break with the standard settings.
pub fn preview_break(text: &str) -> GateBreakPreview {
    LatticeSettings::default().preview_break(text)
}

impl fmt::Display for GateBreakPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "GATE BREAK PREVIEW")?;
        writeln!(f, "────────────────────")?;
        writeln!(f, "Gate: {} → {}", self.current_gate, self.next_gate)?;
        writeln!(
            f,
            "Irreversibility: {}",
            if self.irreversible { "TRUE" } else { "FALSE" }
        )?;
        write!(f, "Sledge Cost: {}", self.sledge_cost)
    }
}
