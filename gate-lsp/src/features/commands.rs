//! Custom JSON-RPC requests
//!
//! Each request takes a document URI and answers with plain text. Unknown documents get
//! a sentinel string instead of an error so editor commands can show it verbatim.

use lsp_types::{Position, Url};
use serde::Deserialize;

pub const COMPILE_TO_TRACE: &str = "gate/compileToTrace";
pub const EVALUATE_EVOLUTION: &str = "gate/evaluateEvolution";
pub const SHOW_GATE_BREAK_PREVIEW: &str = "gate/showGateBreakPreview";

/// Answer to `gate/compileToTrace` for a document the server does not know.
pub const NO_TRACE: &str = "";
/// Answer to the report requests for a document the server does not know.
pub const NO_DOCUMENT: &str = "No document.";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentParams {
    pub uri: Url,
}

/// The cursor position is accepted for editor convenience; the preview reads the
/// whole document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateBreakPreviewParams {
    pub uri: Url,
    #[serde(default)]
    pub position: Option<Position>,
}
