//! Intermediate representation
//!
//! Lowering is intentionally shallow: call blocks become `CALL`, state-change blocks
//! become `STATE_BLOCK`, and both carry the block's verbatim source under `raw` so the
//! trace can be regenerated byte for byte. Declarations, sections and loose tokens are
//! not lowered yet and are skipped rather than rejected.

use crate::gate::ast::SyntaxNode;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IrOp {
    Call,
    StateBlock,
}

impl fmt::Display for IrOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrOp::Call => write!(f, "CALL"),
            IrOp::StateBlock => write!(f, "STATE_BLOCK"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IrInstruction {
    pub op: IrOp,
    pub args: BTreeMap<String, String>,
}

impl IrInstruction {
    pub fn new(op: IrOp, raw: impl Into<String>) -> Self {
        let mut args = BTreeMap::new();
        args.insert("raw".to_string(), raw.into());
        Self { op, args }
    }

    /// The originating source text.
    pub fn raw(&self) -> &str {
        self.args.get("raw").map(String::as_str).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IrProgram {
    pub instructions: Vec<IrInstruction>,
}

impl IrProgram {
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }
}

/// Lower the direct children of a document into an instruction program.
pub fn build_ir(document: &SyntaxNode) -> IrProgram {
    let instructions = document
        .children()
        .iter()
        .filter_map(|node| match node {
            SyntaxNode::FunctionCallBlock(block) => {
                Some(IrInstruction::new(IrOp::Call, block.raw.as_str()))
            }
            SyntaxNode::StateChangeBlock(block) => {
                Some(IrInstruction::new(IrOp::StateBlock, block.raw.as_str()))
            }
            SyntaxNode::DeclarationBlock(_)
            | SyntaxNode::SectionHeader(_)
            | SyntaxNode::RawToken(_)
            | SyntaxNode::Document(_) => None,
        })
        .collect();

    IrProgram { instructions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::parsing::parse;
    use crate::gate::testing::{SAMPLE_NO_BLOCKS, SAMPLE_RITUAL};

    #[test]
    fn test_lowers_calls_and_state_blocks_in_order() {
        let program = build_ir(&parse(SAMPLE_RITUAL));
        let ops: Vec<IrOp> = program.instructions.iter().map(|i| i.op).collect();
        assert_eq!(ops, vec![IrOp::Call, IrOp::StateBlock]);

        assert_eq!(
            program.instructions[0].raw(),
            "> FUNCTION_CALL: break_gate(13) ? confirm:\"YES\"\n!!IRREVERSIBLE ϟ [SLEDGE:=>1]"
        );
        assert_eq!(
            program.instructions[1].raw(),
            "> STATE_CHANGE: gate:13 Δ gate:12\n↯ %INTENT% ⌘ ⌾ ⇜ ⇝ ⇹"
        );
    }

    #[test]
    fn test_declarations_and_sections_are_skipped() {
        assert!(build_ir(&parse(SAMPLE_NO_BLOCKS)).is_empty());
        assert!(build_ir(&parse("> DECLARATION::FORMAL: vow")).is_empty());
    }

    #[test]
    fn test_every_instruction_carries_raw() {
        let program = build_ir(&parse("> FUNCTION_CALL:\n> FUNCTION_CALL: again"));
        assert_eq!(program.len(), 2);
        assert!(program.instructions.iter().all(|i| i.args.contains_key("raw")));
        assert_eq!(program.instructions[0].raw(), "> FUNCTION_CALL:");
    }

    #[test]
    fn test_op_display() {
        assert_eq!(IrOp::Call.to_string(), "CALL");
        assert_eq!(IrOp::StateBlock.to_string(), "STATE_BLOCK");
    }
}
