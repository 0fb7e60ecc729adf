use crate::utils::parser;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "naturaDock Developers",
    version,
    about = "naturaDock CLI - A virtual screening pipeline that docks a compound library against a protein target with AutoDock Vina and ranks the results.",
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

    /// Number of docking jobs to run in parallel.
    /// Defaults to the number of physical CPU cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub workers: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full pipeline: prepare inputs, dock every ligand and analyze the results.
    Screen(ScreenArgs),
    /// Aggregate, rank and summarize an existing directory of docking results.
    Analyze(AnalyzeArgs),
    /// Score a screening against a list of known actives (enrichment factor and ROC AUC).
    Benchmark(BenchmarkArgs),
}

/// Arguments for the `screen` subcommand.
#[derive(Args, Debug)]
pub struct ScreenArgs {
    // --- Inputs ---
    /// Path to the protein structure (PDB, or an already prepared PDBQT).
    #[arg(short, long, value_name = "PATH")]
    pub protein: Option<PathBuf>,

    /// Path to the compound library (SDF, SMI, MOL2), or a directory of prepared PDBQT ligands.
    #[arg(short, long, value_name = "PATH")]
    pub ligands: Option<PathBuf>,

    /// Directory that receives every output of the run.
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Binding Site ---
    /// Center of the search box. Defaults to the centroid of the protein.
    #[arg(long, value_name = "X,Y,Z", value_parser = parser::parse_triple, allow_hyphen_values = true)]
    pub center: Option<[f64; 3]>,

    /// Size of the search box along X, in Angstroms.
    #[arg(long, value_name = "FLOAT")]
    pub size_x: Option<f64>,

    /// Size of the search box along Y, in Angstroms.
    #[arg(long, value_name = "FLOAT")]
    pub size_y: Option<f64>,

    /// Size of the search box along Z, in Angstroms.
    #[arg(long, value_name = "FLOAT")]
    pub size_z: Option<f64>,

    // --- Compound Filters ---
    /// Maximum molecular weight of a compound.
    #[arg(long, value_name = "FLOAT")]
    pub max_mol_weight: Option<f64>,

    /// Maximum number of rotatable bonds of a compound.
    #[arg(long, value_name = "INT")]
    pub max_rotatable_bonds: Option<u32>,

    /// Minimum logP of a compound.
    #[arg(long, value_name = "FLOAT", allow_hyphen_values = true)]
    pub min_logp: Option<f64>,

    /// Maximum logP of a compound.
    #[arg(long, value_name = "FLOAT", allow_hyphen_values = true)]
    pub max_logp: Option<f64>,

    // --- Docking ---
    /// Path to the AutoDock Vina executable.
    /// Falls back to the config file, then $VINA_EXECUTABLE, then `vina` on the PATH.
    #[arg(long, value_name = "PATH")]
    pub vina: Option<PathBuf>,

    /// Path to the Open Babel executable used for preparation.
    #[arg(long, value_name = "PATH")]
    pub obabel: Option<PathBuf>,

    /// Search exhaustiveness passed to the docking engine.
    #[arg(long, value_name = "INT")]
    pub exhaustiveness: Option<u32>,

    /// Number of binding modes the docking engine should write.
    #[arg(long, value_name = "INT")]
    pub num_modes: Option<u32>,

    /// Random seed passed to the docking engine.
    #[arg(long, value_name = "INT", allow_hyphen_values = true)]
    pub seed: Option<i64>,

    /// Kill a docking job that runs longer than this many seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Extra attempts for a failed docking job.
    #[arg(long, value_name = "INT")]
    pub retries: Option<u32>,

    // --- Analysis ---
    /// Format of the ranked results file (csv or xlsx).
    #[arg(long, value_name = "FORMAT")]
    pub export_format: Option<String>,

    /// Stop after docking; do not aggregate or analyze results.
    #[arg(long)]
    pub skip_analysis: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S docking.exhaustiveness=16
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Directory containing `<compound>_docked.<ext>` artifacts.
    #[arg(required = true, value_name = "RESULTS_DIR")]
    pub results_dir: PathBuf,

    /// Directory for the ranked table and statistics. Defaults to the parent of RESULTS_DIR.
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Format of the ranked results file (csv or xlsx).
    #[arg(short, long, value_name = "FORMAT", default_value = "csv")]
    pub format: String,

    /// Extension of the docking artifacts.
    #[arg(long, value_name = "EXT", default_value = "pdbqt")]
    pub extension: String,
}

/// Arguments for the `benchmark` subcommand.
#[derive(Args, Debug)]
pub struct BenchmarkArgs {
    /// A ranked results CSV, or a directory of docking artifacts.
    #[arg(required = true, value_name = "RESULTS")]
    pub results: PathBuf,

    /// File listing the identifiers of known actives, one per line.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub actives: PathBuf,

    /// Percentiles at which to report the enrichment factor.
    #[arg(
        short,
        long,
        value_name = "PERCENT",
        value_delimiter = ',',
        default_values_t = [1.0, 5.0, 10.0]
    )]
    pub percentile: Vec<f64>,
}
