use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::{InputArgs, OutputFormat};
use crate::error::{CliError, Result};
use molpath::core::models::residue::BondCriteria;

/// Resolves the effective configuration for one command.
///
/// Precedence, lowest first: built-in defaults, the TOML file, `--set`
/// overrides, then `threshold_override` and the dedicated flags.
pub fn build_config(args: &InputArgs, threshold_override: Option<f64>) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = match &args.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    let file_config = apply_set_values(file_config, &args.set_values)?;

    let threshold = threshold_override
        .or(file_config.bonds.map(|b| b.threshold))
        .unwrap_or(defaults.bond_threshold);
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(CliError::Config(format!(
            "Bond threshold must be a positive number, got {}",
            threshold
        )));
    }

    let center = args.center || file_config.center.unwrap_or(defaults.center);

    let format = args
        .format
        .or(file_config.output.and_then(|o| o.format))
        .unwrap_or(defaults.format);

    Ok(AppConfig {
        input_path: args.input.clone(),
        bonds: BondCriteria { threshold },
        center,
        format,
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key.trim() {
            "center" => {
                config.center = Some(value_str.trim().parse().map_err(|_| {
                    CliError::Config(format!("Invalid boolean value for {}: {}", key, value_str))
                })?);
            }
            "bonds.threshold" => {
                let threshold = value_str.trim().parse().map_err(|_| {
                    CliError::Config(format!("Invalid float value for {}: {}", key, value_str))
                })?;
                config.bonds = Some(BondCriteria { threshold });
            }
            "output.format" => {
                let format = match value_str.trim() {
                    "table" => OutputFormat::Table,
                    "csv" => OutputFormat::Csv,
                    other => {
                        return Err(CliError::Config(format!(
                            "Invalid output format for {}: {}. Expected 'table' or 'csv'.",
                            key, other
                        )));
                    }
                };
                config.output.get_or_insert_with(Default::default).format = Some(format);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unknown configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
