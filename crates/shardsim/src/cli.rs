//! Command line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Shardsim: build synthetic search cluster topologies for placement tests.
#[derive(Parser)]
#[command(name = "shardsim")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log level filter. `RUST_LOG` takes precedence when set.
    #[arg(long, global = true, default_value = "warn", env = "SHARDSIM_LOG_LEVEL")]
    pub log_level: String,

    /// Log output format.
    #[arg(long, global = true, default_value = "pretty")]
    pub log_format: LogFormat,

    /// Command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Build a topology from a TOML file and print it.
    Build(BuildArgs),
    /// Print version information.
    Version,
}

/// Arguments for the build command.
#[derive(Args)]
pub struct BuildArgs {
    /// Path to the topology file.
    #[arg(short, long)]
    pub config: PathBuf,

    /// Output format (text, json).
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Also print the per-node attribute snapshot.
    #[arg(short, long)]
    pub attributes: bool,
}

/// Output format for CLI commands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// Log output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable log lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}
