//! Manifest loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::Manifest;
use crate::config::validation::{compile_manifest, CompiledManifest, ValidationError};

/// Error type for manifest loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load, parse and validate a manifest from a TOML file.
pub fn load_manifest(path: &Path) -> Result<CompiledManifest, ConfigError> {
    let content = fs::read_to_string(path)?;
    let manifest: Manifest = toml::from_str(&content)?;

    compile_manifest(&manifest).map_err(ConfigError::Validation)
}
