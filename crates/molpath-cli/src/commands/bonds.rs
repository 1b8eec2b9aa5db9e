use super::load_structure;
use crate::cli::BondsArgs;
use crate::config::build_config;
use crate::error::Result;
use crate::output::{fixed3, write_rows};
use molpath::core::models::atom::Atom;
use molpath::core::models::residue::{BondCriteria, ResidueView};
use molpath::core::models::structure::Structure;
use molpath::core::utils::geometry;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Serialize, Debug, PartialEq)]
struct BondRow<'a> {
    residue: isize,
    name: &'a str,
    atom1: &'a str,
    serial1: isize,
    atom2: &'a str,
    serial2: isize,
    distance: String,
}

pub fn run(args: BondsArgs, show_progress: bool) -> Result<()> {
    let config = build_config(&args.input, args.threshold)?;
    let structure = load_structure(&config, show_progress)?;

    info!(
        "Inferring bonds with a {:.3} Å threshold.",
        config.bonds.threshold
    );
    let rows = bond_rows(&structure, &args.residues, config.bonds.threshold)?;
    info!("Found {} bonds.", rows.len());

    write_rows(&mut std::io::stdout().lock(), config.format, &rows)
}

/// Bonds of the requested residues in argument order, or of every residue
/// in structure order when none are requested.
fn bond_rows<'a>(
    structure: &'a Structure,
    residues: &[isize],
    threshold: f64,
) -> Result<Vec<BondRow<'a>>> {
    let per_residue: Vec<(ResidueView<'a>, Vec<(&'a Atom, &'a Atom)>)> = if residues.is_empty() {
        let criteria = BondCriteria { threshold };
        structure
            .bonds_by_residue(&criteria)
            .into_iter()
            .map(|entry| (entry.residue, entry.bonds))
            .collect()
    } else {
        residues
            .iter()
            .map(|&number| -> Result<(ResidueView<'a>, Vec<_>)> {
                let residue = structure.residue(number)?;
                Ok((residue, residue.bonds_within(threshold).collect()))
            })
            .collect::<Result<_>>()?
    };

    let mut rows = Vec::new();
    for (residue, bonds) in per_residue {
        debug!(
            residue = residue.number(),
            bonds = bonds.len(),
            "Collected residue bonds."
        );
        rows.extend(bonds.into_iter().map(|(a, b)| BondRow {
            residue: residue.number(),
            name: residue.name(),
            atom1: &a.name,
            serial1: a.serial,
            atom2: &b.name,
            serial2: b.serial,
            distance: fixed3(geometry::distance(&a.position, &b.position)),
        }));
    }
    Ok(rows)
}
