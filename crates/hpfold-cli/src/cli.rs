use clap::{Args, Parser, Subcommand};
use hpfold::engine::config::AlgorithmKind;
use hpfold::engine::heuristics::HeuristicKind;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "The hpfold developers",
    version,
    about = "hpfold CLI - Search for minimum-energy folds of HP(C) lattice proteins on 2D and 3D lattices.",
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

    /// Set the number of threads used for parallel restarts.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search for a low-energy fold of a sequence.
    Fold(FoldArgs),
    /// Score a given fold of a sequence.
    Score(ScoreArgs),
}

/// Arguments for the `fold` subcommand.
#[derive(Args, Debug)]
pub struct FoldArgs {
    // --- Core Arguments ---
    /// The sequence to fold, written with the letters H, P and C.
    #[arg(required = true, value_name = "SEQUENCE")]
    pub sequence: String,

    /// Search algorithm (e.g., 'depth-first', 'simulated-annealing', 'beam-search').
    #[arg(short, long, value_name = "NAME")]
    pub algorithm: Option<AlgorithmKind>,

    /// Lattice dimensionality.
    #[arg(short, long, value_name = "2|3", value_parser = clap::value_parser!(u8).range(2..=3))]
    pub dimensions: Option<u8>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Path for writing the result as TOML.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    // --- Search Overrides ---
    /// Seed for the random number generator. Restart `i` uses `seed + i`.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Number of independent searches to run.
    #[arg(long, value_name = "INT")]
    pub restarts: Option<usize>,

    /// Number of distinct folds to report.
    #[arg(short, long, value_name = "INT")]
    pub num_solutions: Option<usize>,

    /// Main iteration budget of the chosen algorithm.
    #[arg(long, value_name = "INT")]
    pub max_iterations: Option<u64>,

    /// Wall-clock limit per search, in seconds.
    #[arg(long, value_name = "SECS")]
    pub time_limit: Option<f64>,

    /// Heuristic used to order candidate directions. Can be used multiple times.
    #[arg(long = "heuristic", value_name = "NAME")]
    pub heuristics: Vec<HeuristicKind>,

    /// Disable all pruning in depth-first search.
    #[arg(long)]
    pub no_pruning: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S depth-first.pruning.alpha=0.7
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,
}

/// Arguments for the `score` subcommand.
#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// The sequence, written with the letters H, P and C.
    #[arg(required = true, value_name = "SEQUENCE")]
    pub sequence: String,

    /// The fold as comma-separated direction values (1/-1: x, 2/-2: y, 3/-3: z).
    #[arg(required = true, value_name = "ORDER", allow_hyphen_values = true)]
    pub order: String,
}
