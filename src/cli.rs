// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::{AnalyzerConfig, GeneratorConfig};

/// Command-line arguments for `causal-stream`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "causal-stream",
    version,
    about = "Generate causally-consistent operation streams and compute their optimal schedule.",
    long_about = None
)]
pub struct CliArgs {
    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `CAUSAL_STREAM_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Generate a synthetic workload as JSON Lines.
    Generate(GenerateArgs),
    /// Compute the optimal (unbounded parallelism) schedule of a captured stream.
    Simulate(AnalyzeArgs),
    /// Write the compiled DAG of a captured stream as Graphviz DOT.
    Show(ShowArgs),
}

#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Config file (TOML) with a `[generator]` section.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output file. Default: stdout.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Number of total operations.
    #[arg(short = 'n', long = "total")]
    pub total_ops: Option<usize>,

    /// Number of users.
    #[arg(short = 'u', long)]
    pub num_users: Option<usize>,

    /// Max friends per user.
    #[arg(long)]
    pub max_num_friends: Option<usize>,

    /// Zipfian coefficient of the friend-count distribution.
    #[arg(long)]
    pub coeff_num_friends: Option<f64>,

    /// Ratio of a user's operations that notify friends (0..=1).
    #[arg(long)]
    pub num_interactions_ratio: Option<f64>,

    /// Zipfian coefficient of the interaction-count distribution.
    #[arg(long)]
    pub coeff_interactions_ratio: Option<f64>,

    /// Zipfian coefficient of the per-user friend-activity distribution.
    #[arg(long)]
    pub coeff_friend_activity: Option<f64>,

    /// Value of the `app` field in emitted records.
    #[arg(long)]
    pub app: Option<String>,

    /// RNG seed for a reproducible stream.
    #[arg(long)]
    pub seed: Option<u64>,
}

impl GenerateArgs {
    /// Overwrite the fields of `cfg` that were given on the command line.
    pub fn apply_to(&self, cfg: &mut GeneratorConfig) {
        if let Some(v) = self.total_ops {
            cfg.total_ops = v;
        }
        if let Some(v) = self.num_users {
            cfg.num_users = v;
        }
        if let Some(v) = self.max_num_friends {
            cfg.max_num_friends = v;
        }
        if let Some(v) = self.coeff_num_friends {
            cfg.coeff_num_friends = v;
        }
        if let Some(v) = self.num_interactions_ratio {
            cfg.num_interactions_ratio = v;
        }
        if let Some(v) = self.coeff_interactions_ratio {
            cfg.coeff_interactions_ratio = v;
        }
        if let Some(v) = self.coeff_friend_activity {
            cfg.coeff_friend_activity = v;
        }
        if let Some(ref v) = self.app {
            cfg.app = v.clone();
        }
        if self.seed.is_some() {
            cfg.seed = self.seed;
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct AnalyzeArgs {
    /// Captured stream (JSON Lines). `-` reads stdin.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Config file (TOML) with an `[analyzer]` section.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Skip N lines from the input.
    #[arg(short, long)]
    pub skip: Option<usize>,

    /// Only read N lines from the input (-1 = all).
    #[arg(short, long, allow_negative_numbers = true)]
    pub count: Option<i64>,
}

impl AnalyzeArgs {
    pub fn apply_to(&self, cfg: &mut AnalyzerConfig) {
        if let Some(v) = self.skip {
            cfg.skip = v;
        }
        if let Some(v) = self.count {
            cfg.count = v;
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub analyze: AnalyzeArgs,

    /// Output DOT file. Default: stdout.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
