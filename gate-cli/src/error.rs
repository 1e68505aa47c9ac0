use gate_config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("unsupported format '{0}' (expected one of: json, yaml)")]
    UnsupportedFormat(String),

    #[error("unknown stage '{0}' (expected one of: tokens, tree, ir)")]
    UnsupportedStage(String),

    #[error("failed to serialize JSON output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to serialize YAML output: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
