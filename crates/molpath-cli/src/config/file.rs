use crate::cli::OutputFormat;
use crate::error::{CliError, Result};
use molpath::core::models::residue::BondCriteria;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileOutputConfig {
    pub format: Option<OutputFormat>,
}

/// The on-disk TOML configuration. Every key is optional.
///
/// ```toml
/// center = true
///
/// [bonds]
/// threshold = 1.9
///
/// [output]
/// format = "csv"
/// ```
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub center: Option<bool>,
    pub bonds: Option<BondCriteria>,
    pub output: Option<FileOutputConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
