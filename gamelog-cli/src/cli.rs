//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// gamelog -- follow and classify game server logs.
///
/// Use `gamelog <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "gamelog", version, about, long_about = None)]
pub struct Cli {
    /// Path to the gamelog.toml configuration file.
    #[arg(short, long, default_value = "gamelog.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Follow a log file and print classified events until interrupted.
    Tail(TailArgs),

    /// Classify individual lines without touching any log file.
    Parse(ParseArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- tail ----

/// Follow a log file.
#[derive(Args, Debug)]
pub struct TailArgs {
    /// Log file to follow (default: `tailer.path` from the config).
    pub path: Option<PathBuf>,

    /// Read the file from the beginning instead of only new lines.
    #[arg(long)]
    pub from_start: bool,
}

// ---- parse ----

/// Classify lines given on the command line or read from a file.
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Lines to classify.
    pub lines: Vec<String>,

    /// Read additional lines from this file.
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

// ---- config ----

/// Manage gamelog configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, tailer, players).
        #[arg(long)]
        section: Option<String>,
    },
}
