use crate::cli::OutputFormat;
use molpath::core::models::residue::BOND_DISTANCE_THRESHOLD;

pub struct DefaultsConfig {
    pub bond_threshold: f64,
    pub center: bool,
    pub format: OutputFormat,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            bond_threshold: BOND_DISTANCE_THRESHOLD,
            center: false,
            format: OutputFormat::Table,
        }
    }
}
