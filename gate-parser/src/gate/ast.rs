//! Syntax tree for gate documents
//!
//!     The tree is a plain owned tree: the document owns its top-level nodes and every
//!     block owns its body. See [node] for the node kinds and [range] for converting byte
//!     spans into editor positions.

pub mod node;
pub mod range;

pub use node::{Block, SyntaxNode};
pub use range::{Position, Range, SourceLocation};
