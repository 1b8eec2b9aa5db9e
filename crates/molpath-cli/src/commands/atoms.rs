use super::load_structure;
use crate::cli::AtomsArgs;
use crate::config::build_config;
use crate::error::Result;
use crate::output::{fixed3, write_rows};
use molpath::core::models::residue::ResidueView;
use serde::Serialize;
use tracing::{info, warn};

#[derive(Serialize, Debug, PartialEq)]
struct AtomRow<'a> {
    serial: isize,
    name: &'a str,
    residue_name: &'a str,
    chain: String,
    x: String,
    y: String,
    z: String,
    element: &'a str,
}

pub fn run(args: AtomsArgs, show_progress: bool) -> Result<()> {
    let config = build_config(&args.input, None)?;
    let structure = load_structure(&config, show_progress)?;

    let residue = structure.residue(args.residue)?;
    info!(
        "Residue {} ({}) has {} atoms.",
        residue.number(),
        residue.name(),
        residue.len()
    );
    if residue.position().is_err() {
        warn!(
            "Residue {} has no 'C' atom and therefore no representative position.",
            residue.number()
        );
    }

    write_rows(&mut std::io::stdout().lock(), config.format, &atom_rows(residue))
}

fn atom_rows(residue: ResidueView<'_>) -> Vec<AtomRow<'_>> {
    residue
        .atoms()
        .map(|atom| AtomRow {
            serial: atom.serial,
            name: &atom.name,
            residue_name: &atom.residue_name,
            chain: atom.chain.map(String::from).unwrap_or_default(),
            x: fixed3(atom.position.x),
            y: fixed3(atom.position.y),
            z: fixed3(atom.position.z),
            element: &atom.element,
        })
        .collect()
}
