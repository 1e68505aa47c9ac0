use gate_parser::gate::ast::SyntaxNode;
use gate_parser::gate::testing::SAMPLE_RITUAL;

pub(crate) fn sample_source() -> &'static str {
    SAMPLE_RITUAL
}

pub(crate) fn sample_tree() -> SyntaxNode {
    gate_parser::parse(SAMPLE_RITUAL)
}
