pub mod atoms;
pub mod backbone;
pub mod bonds;
pub mod summary;

use crate::config::AppConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use molpath::core::io::{pdb::PdbFile, traits::StructureFile};
use molpath::core::models::structure::Structure;
use molpath::core::progress::ProgressReporter;
use tracing::info;

/// Reads the configured input file and centers it when requested.
pub fn load_structure(config: &AppConfig, show_progress: bool) -> Result<Structure> {
    info!("Loading input structure from {:?}", &config.input_path);

    let progress_handler = if show_progress {
        CliProgressHandler::new()
    } else {
        CliProgressHandler::hidden()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let mut structure = PdbFile::read_from_path_with_progress(&config.input_path, &reporter)?;

    if config.center {
        let offset = structure.center()?;
        info!(
            "Translated structure by ({:.3}, {:.3}, {:.3}).",
            -offset.x, -offset.y, -offset.z
        );
    }

    Ok(structure)
}
