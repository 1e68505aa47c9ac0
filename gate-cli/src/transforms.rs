//! CLI-specific transforms
//!
//! Each subcommand maps to one transform over the document text. Report transforms
//! print the same text the language server answers with; structure transforms dump a
//! pipeline stage as JSON or YAML.

use crate::error::CliError;
use gate_analysis::hover;
use gate_config::GateConfig;
use gate_parser::{build_ir, parse, render_trace, tokenize};
use serde::Serialize;

/// Stages that can be dumped with `--format`.
pub const STRUCTURE_TRANSFORMS: &[&str] = &["tokens", "tree", "ir"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn parse(name: &str) -> Result<Self, CliError> {
        match name {
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            other => Err(CliError::UnsupportedFormat(other.to_string())),
        }
    }

    fn render<T: Serialize>(self, value: &T) -> Result<String, CliError> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        }
    }
}

pub fn compile(source: &str) -> String {
    render_trace(&build_ir(&parse(source)))
}

/// One line per diagnostic: `line:col severity [rule] message`.
pub fn diagnose(source: &str, config: &GateConfig) -> String {
    let tree = parse(source);
    config
        .rule_registry()
        .analyze(source, &tree)
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn evolution(source: &str, config: &GateConfig) -> String {
    config.scoring_table().estimate(source).to_string()
}

pub fn preview(source: &str, config: &GateConfig) -> String {
    config.lattice_settings().preview_break(source).to_string()
}

/// Hover markdown at a byte offset, or `None` when nothing is known about the word.
pub fn hover_at(source: &str, offset: usize) -> Option<String> {
    hover(source, offset).map(|result| result.contents)
}

/// Dump a pipeline stage by name.
pub fn structure(source: &str, stage: &str, format: OutputFormat) -> Result<String, CliError> {
    match stage {
        "tokens" => format.render(&tokenize(source)),
        "tree" => format.render(&parse(source)),
        "ir" => format.render(&build_ir(&parse(source))),
        other => Err(CliError::UnsupportedStage(other.to_string())),
    }
}
