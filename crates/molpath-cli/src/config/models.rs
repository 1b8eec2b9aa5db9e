use crate::cli::OutputFormat;
use molpath::core::models::residue::BondCriteria;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub input_path: PathBuf,
    pub bonds: BondCriteria,
    pub center: bool,
    pub format: OutputFormat,
}
