use std::path::Path;

use serde::Deserialize;

use schemagraph_introspect::{ConnectionConfig, InferOptions};

/// Contents of an optional `--config` TOML file.
///
/// ```toml
/// [connection]
/// host = "localhost"
/// dbname = "mondial"
///
/// [inference]
/// schema = "public"
/// discrete_threshold = 100
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileSettings {
    pub connection: ConnectionConfig,
    pub inference: InferenceSettings,
}

/// Inference options that may be left unset in the file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InferenceSettings {
    pub schema: Option<String>,
    pub discrete_threshold: Option<u64>,
    pub strength_threshold: Option<u64>,
    pub include_catalog_facts: Option<bool>,
    pub base_iri: Option<String>,
}

impl InferenceSettings {
    /// Field-wise merge where values already set on `self` win.
    pub fn or(self, fallback: Self) -> Self {
        Self {
            schema: self.schema.or(fallback.schema),
            discrete_threshold: self.discrete_threshold.or(fallback.discrete_threshold),
            strength_threshold: self.strength_threshold.or(fallback.strength_threshold),
            include_catalog_facts: self.include_catalog_facts.or(fallback.include_catalog_facts),
            base_iri: self.base_iri.or(fallback.base_iri),
        }
    }

    pub fn to_options(&self) -> InferOptions {
        let defaults = InferOptions::default();
        InferOptions {
            schema: self.schema.clone().unwrap_or(defaults.schema),
            discrete_threshold: self.discrete_threshold.unwrap_or(defaults.discrete_threshold),
            strength_threshold: self.strength_threshold.unwrap_or(defaults.strength_threshold),
            include_catalog_facts: self
                .include_catalog_facts
                .unwrap_or(defaults.include_catalog_facts),
        }
    }
}

pub fn parse_settings(content: &str) -> Result<FileSettings, toml::de::Error> {
    toml::from_str(content)
}

pub fn load_settings(path: &Path) -> Result<FileSettings, SettingsError> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_settings(&content)?)
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml decode error: {0}")]
    TomlDecode(#[from] toml::de::Error),
}
