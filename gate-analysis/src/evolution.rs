//! Evolution estimate
//!
//! A deliberately shallow heuristic: a base potential plus a fixed weight for each thematic
//! marker found in the text. The scoring table is plain data so it can be swapped out from
//! configuration and tested without any marker detection involved.

use gate_parser::gate::trace::{TraceDocument, TraceRecord};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_ARC: &str = "ASCENT";
pub const DEFAULT_NOTE: &str = "Heuristic evolution estimate based on titles and echoes";

/// A marker and the weight it adds when any of its patterns occurs in the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub name: String,
    pub patterns: Vec<String>,
    pub weight: f64,
}

impl Marker {
    pub fn new(name: impl Into<String>, patterns: &[&str], weight: f64) -> Self {
        Self {
            name: name.into(),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            weight,
        }
    }

    pub fn is_present(&self, text: &str) -> bool {
        self.patterns.iter().any(|pattern| text.contains(pattern.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringTable {
    pub base: f64,
    pub markers: Vec<Marker>,
    /// Clamp the sum into `[0.0, 1.0]`. Off by default: the standard table tops out at 0.80.
    #[serde(default)]
    pub clamp: bool,
    pub arc: String,
    pub note: String,
}

impl ScoringTable {
    /// Sum the base and the weights of the markers in `present`.
    pub fn score_markers<'a>(&self, present: impl IntoIterator<Item = &'a Marker>) -> f64 {
        let sum = self.base + present.into_iter().map(|m| m.weight).sum::<f64>();
        if self.clamp {
            sum.clamp(0.0, 1.0)
        } else {
            sum
        }
    }

    /// Markers of this table that occur in `text`. Each marker counts once.
    pub fn detect<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a Marker> + 'a {
        self.markers.iter().filter(move |marker| marker.is_present(text))
    }

    pub fn score(&self, text: &str) -> f64 {
        self.score_markers(self.detect(text))
    }

    pub fn estimate(&self, text: &str) -> EvolutionReport {
        EvolutionReport {
            potential: self.score(text),
            arc_label: self.arc.clone(),
            note: self.note.clone(),
        }
    }
}

impl Default for ScoringTable {
    fn default() -> Self {
        Self {
            base: 0.30,
            markers: vec![
                Marker::new("torchbearer", &["Torchbearer"], 0.30),
                Marker::new("echo", &["ECHO", "#==TRACE:ECHO"], 0.20),
            ],
            clamp: false,
            arc: DEFAULT_ARC.to_string(),
            note: DEFAULT_NOTE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvolutionReport {
    pub potential: f64,
    pub arc_label: String,
    pub note: String,
}

impl EvolutionReport {
    pub fn to_trace(&self) -> TraceDocument {
        TraceDocument::new().header("EVOLUTION").record(
            TraceRecord::new("EVOLUTION")
                .field("potential", format!("{:.2}", self.potential))
                .field("arc", self.arc_label.as_str())
                .field("note", self.note.as_str()),
        )
    }
}

impl fmt::Display for EvolutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_trace())
    }
}

/// Estimate with the standard scoring table.
pub fn estimate(text: &str) -> EvolutionReport {
    ScoringTable::default().estimate(text)
}
