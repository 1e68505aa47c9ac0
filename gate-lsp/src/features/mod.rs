pub mod commands;
pub mod diagnostics;
pub mod document_symbols;
pub mod hover;
pub mod semantic_tokens;

#[cfg(test)]
pub(crate) mod test_support;
