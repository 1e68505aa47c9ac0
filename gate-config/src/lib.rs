//! Shared configuration loader for the Gate toolchain.
//!
//! `defaults/gate.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`GateConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use gate_analysis::diagnostics::{IRREVERSIBLE_ACTIVE, UNCONFIRMED_BREAK};
use gate_analysis::{LatticeSettings, RuleRegistry, ScoringTable};
use serde::Deserialize;
use std::path::Path;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/gate.default.toml");

/// Top-level configuration consumed by Gate applications.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GateConfig {
    pub diagnostics: DiagnosticsConfig,
    pub evolution: ScoringTable,
    pub lattice: LatticeConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DiagnosticsConfig {
    pub rules: RulesConfig,
}

/// One switch per built-in rule.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RulesConfig {
    pub unconfirmed_break: bool,
    pub irreversible_active: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LatticeConfig {
    pub default_gate: i64,
    pub sledge_cost: u32,
}

impl GateConfig {
    /// The standard rules minus the ones switched off.
    pub fn rule_registry(&self) -> RuleRegistry {
        let rules = &self.diagnostics.rules;
        RuleRegistry::standard().retain(|id| match id {
            UNCONFIRMED_BREAK => rules.unconfirmed_break,
            IRREVERSIBLE_ACTIVE => rules.irreversible_active,
            _ => true,
        })
    }

    pub fn scoring_table(&self) -> ScoringTable {
        self.evolution.clone()
    }

    pub fn lattice_settings(&self) -> LatticeSettings {
        LatticeSettings {
            default_gate: self.lattice.default_gate,
            sledge_cost: self.lattice.sledge_cost,
        }
    }
}

impl Default for GateConfig {
    /// Mirrors the embedded defaults without going through the loader.
    fn default() -> Self {
        let lattice = LatticeSettings::default();
        Self {
            diagnostics: DiagnosticsConfig {
                rules: RulesConfig {
                    unconfirmed_break: true,
                    irreversible_active: true,
                },
            },
            evolution: ScoringTable::default(),
            lattice: LatticeConfig {
                default_gate: lattice.default_gate,
                sledge_cost: lattice.sledge_cost,
            },
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<GateConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<GateConfig, ConfigError> {
    Loader::new().build()
}
