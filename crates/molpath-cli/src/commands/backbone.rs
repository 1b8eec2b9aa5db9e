use super::load_structure;
use crate::cli::BackboneArgs;
use crate::config::build_config;
use crate::error::Result;
use crate::output::{fixed3, write_rows};
use molpath::core::models::residue::BACKBONE_ATOM_NAMES;
use molpath::core::models::structure::{Backbone, Structure};
use nalgebra::Point3;
use serde::Serialize;
use tracing::info;

/// One point of the flattened backbone path.
#[derive(Serialize, Debug, PartialEq)]
struct PathRow {
    index: usize,
    x: String,
    y: String,
    z: String,
}

/// One backbone atom, labelled with the residue it belongs to.
#[derive(Serialize, Debug, PartialEq)]
struct ResidueRow<'a> {
    residue: isize,
    name: &'a str,
    atom: &'static str,
    x: String,
    y: String,
    z: String,
}

pub fn run(args: BackboneArgs, show_progress: bool) -> Result<()> {
    let config = build_config(&args.input, None)?;
    let structure = load_structure(&config, show_progress)?;

    let backbone = structure.backbone(args.triples)?;
    let mut out = std::io::stdout().lock();
    match backbone {
        Backbone::Flat(points) => {
            info!("Writing flat backbone path of {} points.", points.len());
            write_rows(&mut out, config.format, &path_rows(&points))
        }
        Backbone::Triples(triples) => {
            info!("Writing backbone triples for {} residues.", triples.len());
            write_rows(&mut out, config.format, &residue_rows(&structure, &triples))
        }
    }
}

fn path_rows(points: &[Point3<f64>]) -> Vec<PathRow> {
    points
        .iter()
        .enumerate()
        .map(|(index, p)| PathRow {
            index,
            x: fixed3(p.x),
            y: fixed3(p.y),
            z: fixed3(p.z),
        })
        .collect()
}

fn residue_rows<'a>(structure: &'a Structure, triples: &[[Point3<f64>; 3]]) -> Vec<ResidueRow<'a>> {
    structure
        .residues()
        .zip(triples)
        .flat_map(|(residue, triple)| {
            BACKBONE_ATOM_NAMES
                .iter()
                .zip(triple)
                .map(move |(&atom, p)| ResidueRow {
                    residue: residue.number(),
                    name: residue.name(),
                    atom,
                    x: fixed3(p.x),
                    y: fixed3(p.y),
                    z: fixed3(p.z),
                })
        })
        .collect()
}
