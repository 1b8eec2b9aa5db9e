use super::load_structure;
use crate::cli::SummaryArgs;
use crate::config::build_config;
use crate::error::Result;
use crate::output::{fixed3, write_rows};
use molpath::core::models::structure::Structure;
use serde::Serialize;
use tracing::info;

#[derive(Serialize, Debug, PartialEq)]
struct SummaryRow {
    property: &'static str,
    value: String,
}

pub fn run(args: SummaryArgs, show_progress: bool) -> Result<()> {
    let config = build_config(&args.input, None)?;
    let structure = load_structure(&config, show_progress)?;

    let rows = summarize(&structure);
    info!("Writing summary of {} properties.", rows.len());
    write_rows(&mut std::io::stdout().lock(), config.format, &rows)
}

fn summarize(structure: &Structure) -> Vec<SummaryRow> {
    let mut classes: Vec<&str> = structure.residue_classes().collect();
    classes.sort_unstable();

    let centroid = structure
        .centroid()
        .map(|c| format!("{} {} {}", fixed3(c.x), fixed3(c.y), fixed3(c.z)))
        .unwrap_or_else(|| "-".to_string());

    vec![
        SummaryRow {
            property: "atoms",
            value: structure.atom_count().to_string(),
        },
        SummaryRow {
            property: "residues",
            value: structure.residue_count().to_string(),
        },
        SummaryRow {
            property: "chains",
            value: structure.chains().iter().collect(),
        },
        SummaryRow {
            property: "classes",
            value: classes.join(" "),
        },
        SummaryRow {
            property: "centroid",
            value: centroid,
        },
    ]
}
