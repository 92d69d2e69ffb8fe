//! gamelog CLI entry point
//!
//! Parses arguments, loads configuration, initializes logging and
//! dispatches to a command handler. Errors are printed to stderr and
//! mapped to an exit code via [`CliError::exit_code`].

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;
use tracing::info;

use gamelog_core::config::GeneralConfig;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("error: {e}");
            e.exit_code()
        }
    };

    std::process::exit(code);
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let writer = OutputWriter::new(cli.output);
    let level_override = cli.log_level.as_deref();

    match cli.command {
        Commands::Config(args) => {
            // Logging must work even when the config file is what's broken.
            init_logging(&GeneralConfig::default(), level_override)?;
            commands::config::execute(args, &cli.config, &writer).await
        }
        Commands::Tail(args) => {
            let (config, from_file) = commands::config::load_or_default(&cli.config).await?;
            init_logging(&config.general, level_override)?;
            log_config_source(&cli.config, from_file);
            commands::tail::execute(args, &config, &writer).await
        }
        Commands::Parse(args) => {
            let (config, from_file) = commands::config::load_or_default(&cli.config).await?;
            init_logging(&config.general, level_override)?;
            log_config_source(&cli.config, from_file);
            commands::parse::execute(args, &writer).await
        }
    }
}

fn init_logging(general: &GeneralConfig, level_override: Option<&str>) -> Result<(), CliError> {
    logging::init_tracing(general, level_override).map_err(|e| CliError::Config(e.to_string()))
}

fn log_config_source(path: &std::path::Path, from_file: bool) {
    if from_file {
        info!(path = %path.display(), "configuration loaded");
    } else {
        info!(path = %path.display(), "configuration file not found, using defaults");
    }
}
