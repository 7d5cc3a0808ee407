//! Configuration file support for bom-convert.
//!
//! Provides YAML-based defaults through `bom-convert.config.yml` files.
//! Command-line flags always override values loaded here.

use anyhow::Context;
use bom_convert::sbom_conversion::domain::{FormatTarget, SpdxVersion, SpecVersion, WireFormat};
use bom_convert::shared::error::SbomError;
use bom_convert::shared::Result;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use crate::cli::InputFormat;

pub const CONFIG_FILENAME: &str = "bom-convert.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub input_format: Option<String>,
    pub output_format: Option<String>,
    pub output_version: Option<String>,
    pub verbose: Option<bool>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

impl ConfigFile {
    pub fn input_format(&self) -> Option<InputFormat> {
        self.input_format
            .as_deref()
            .and_then(|s| InputFormat::from_str(s).ok())
    }

    pub fn output_format(&self) -> Option<WireFormat> {
        self.output_format
            .as_deref()
            .and_then(|s| WireFormat::from_str(s).ok())
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> std::result::Result<(), SbomError> {
    if let Some(ref value) = config.input_format {
        InputFormat::from_str(value).map_err(|e| SbomError::Config {
            message: format!("input_format: {}", e),
            hint: "Use one of 'autodetect', 'json', 'xml', 'spdxtag' or 'csv'".to_string(),
        })?;
    }

    let output_format = match config.output_format {
        Some(ref value) => Some(WireFormat::from_str(value).map_err(|e| SbomError::Config {
            message: format!("output_format: {}", e),
            hint: "Use one of 'json', 'xml', 'spdxtag' or 'csv'".to_string(),
        })?),
        None => None,
    };

    if let Some(ref version) = config.output_version {
        let parsed = match output_format {
            Some(format) => FormatTarget::parse(format, Some(version)).map(|_| ()),
            // Without a format the version may be on either axis.
            None => SpecVersion::from_str(version)
                .map(|_| ())
                .or_else(|_| SpdxVersion::from_str(version).map(|_| ())),
        };
        parsed.map_err(|e| SbomError::Config {
            message: format!("output_version: {}", e),
            hint: "Use a schema version such as \"1.2\", or an SPDX version such as \"2.1\" for spdxtag output".to_string(),
        })?;
    }

    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}
