//! Language Server Protocol (LSP) implementation for Gate
//!
//! Architecture
//!
//!     LSP Layer (tower-lsp):
//!         - JSON-RPC transport, capability negotiation, request routing
//!         - Custom requests registered on the service builder (see [`build_service`])
//!
//!     Server Layer ([`server`]):
//!         - Implements the `LanguageServer` trait
//!         - Keeps the latest text and syntax tree per document URI
//!         - Publishes diagnostics on open and change, clears them on close
//!         - Very thin: every answer comes from the feature layer
//!
//!     Feature Layer ([`features`]):
//!         - Stateless conversions between gate-analysis results and LSP types
//!         - Semantic tokens from lexer classes, outline symbols from blocks and sections
//!
//! Custom Requests
//!
//!     All three take `{ "uri": ... }` and answer with plain text:
//!         - `gate/compileToTrace`: compiled trace, `""` for unknown documents
//!         - `gate/evaluateEvolution`: evolution report, `"No document."` for unknown documents
//!         - `gate/showGateBreakPreview`: gate-break preview (also accepts `position`),
//!           `"No document."` for unknown documents
//!
//! Usage
//!
//!     $ gate-lsp
//!     Starts the language server on stdin/stdout. Logs go to stderr and are filtered with
//!     `RUST_LOG` (default `gate_lsp=info`). A `gate.toml` in the working directory is
//!     layered over the built-in configuration.

pub mod features;
pub mod server;

use features::commands::{COMPILE_TO_TRACE, EVALUATE_EVOLUTION, SHOW_GATE_BREAK_PREVIEW};
use gate_config::GateConfig;
use tower_lsp::{ClientSocket, LspService};

pub use server::{DefaultFeatureProvider, FeatureProvider, GateLanguageServer, LspClient};

/// Build the service with the standard handlers and the Gate custom requests.
pub fn build_service(config: GateConfig) -> (LspService<GateLanguageServer>, ClientSocket) {
    LspService::build(move |client| GateLanguageServer::with_config(client, &config))
        .custom_method(COMPILE_TO_TRACE, GateLanguageServer::compile_to_trace)
        .custom_method(EVALUATE_EVOLUTION, GateLanguageServer::evaluate_evolution)
        .custom_method(
            SHOW_GATE_BREAK_PREVIEW,
            GateLanguageServer::show_gate_break_preview,
        )
        .finish()
}
