//! # gate-parser
//!
//! Front half of the Gate toolchain: everything needed to turn `.gate` source text into
//! tokens, a syntax tree, an instruction program and the canonical trace document.
//!
//! File Layout
//!
//!     src/gate
//!       ├── token      Token kinds and the token record
//!       ├── lexing     Leftmost-first tokenizer
//!       ├── ast        Syntax tree nodes and source positions
//!       ├── parsing    Block-grouping parser
//!       ├── ir         Lowering of the tree into instructions
//!       ├── trace      Trace documents and the trace renderer
//!       └── testing    Sample documents shared by tests across the workspace
//!
//! Every stage is total: there is no lex error and no parse error. Editors hand us half
//! written documents on every keystroke, so unknown vocabulary falls back to plain words
//! and unterminated blocks run to the end of the input.

pub mod gate;

pub use gate::ir::{build_ir, IrInstruction, IrOp, IrProgram};
pub use gate::lexing::tokenize;
pub use gate::parsing::parse;
pub use gate::trace::{compile_to_trace, render_trace, TraceDocument};

/// Extension of Gate source files.
pub const FILE_EXTENSION: &str = "gate";
