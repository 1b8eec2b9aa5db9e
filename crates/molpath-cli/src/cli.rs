use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "molpath - Inspect PDB structures: residues, backbone paths and distance-inferred bonds.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print atom, residue and chain counts and the structure centroid.
    Summary(SummaryArgs),
    /// Print the N-CA-C backbone path of every residue.
    Backbone(BackboneArgs),
    /// Print bonds inferred from inter-atomic distances.
    Bonds(BondsArgs),
    /// Print the atoms of one residue in file order.
    Atoms(AtomsArgs),
}

#[derive(ValueEnum, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned, human-readable columns.
    #[default]
    Table,
    /// Comma-separated values with a header row.
    Csv,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Path to the input PDB file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format, overriding `output.format` from the config file.
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Translate the structure so its centroid is at the origin before querying.
    #[arg(long)]
    pub center: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S bonds.threshold=1.9
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `summary` subcommand.
#[derive(Args, Debug)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

/// Arguments for the `backbone` subcommand.
#[derive(Args, Debug)]
pub struct BackboneArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Group positions as one N, CA, C triple per residue instead of one flat path.
    #[arg(long)]
    pub triples: bool,
}

/// Arguments for the `bonds` subcommand.
#[derive(Args, Debug)]
pub struct BondsArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Residue numbers to report. Can be used multiple times; defaults to all residues.
    #[arg(short = 'r', long = "residue", value_name = "NUM", allow_negative_numbers = true)]
    pub residues: Vec<isize>,

    /// Override the bonding distance threshold in Angstroms.
    #[arg(short, long, value_name = "FLOAT")]
    pub threshold: Option<f64>,
}

/// Arguments for the `atoms` subcommand.
#[derive(Args, Debug)]
pub struct AtomsArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Residue number whose atoms are listed.
    #[arg(short = 'r', long = "residue", required = true, value_name = "NUM", allow_negative_numbers = true)]
    pub residue: isize,
}
