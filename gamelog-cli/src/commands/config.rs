//! `gamelog config` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use gamelog_core::config::GamelogConfig;
use gamelog_core::error::{ConfigError, GamelogError};

use crate::cli::{ConfigAction, ConfigArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Known configuration sections for `config show --section`.
const SECTIONS: &[&str] = &["general", "tailer", "players"];

/// Execute the `config` command.
pub async fn execute(
    args: ConfigArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => execute_validate(config_path, writer).await,
        ConfigAction::Show { section } => execute_show(config_path, section, writer).await,
    }
}

/// Load the effective configuration for commands that can run without a file.
///
/// A missing file falls back to defaults (plus env overrides). Any other
/// failure, including an invalid file, is an error. The returned flag is
/// `true` when the file was actually read.
pub async fn load_or_default(config_path: &Path) -> Result<(GamelogConfig, bool), CliError> {
    match GamelogConfig::load(config_path).await {
        Ok(config) => Ok((config, true)),
        Err(GamelogError::Config(ConfigError::FileNotFound { .. })) => {
            let mut config = GamelogConfig::default();
            config.apply_env_overrides();
            config.validate()?;
            Ok((config, false))
        }
        Err(e) => Err(e.into()),
    }
}

/// Execute the config validate subcommand.
///
/// # Errors
///
/// Returns `CliError::Config` if the file is missing, malformed or holds invalid values.
async fn execute_validate(config_path: &Path, writer: &OutputWriter) -> Result<(), CliError> {
    info!(path = %config_path.display(), "validating configuration");

    let result = GamelogConfig::load(config_path).await;

    let report = match result {
        Ok(_) => ConfigValidationReport {
            source: config_path.display().to_string(),
            valid: true,
            errors: Vec::new(),
        },
        Err(e) => ConfigValidationReport {
            source: config_path.display().to_string(),
            valid: false,
            errors: vec![e.to_string()],
        },
    };

    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Config("configuration is invalid".to_owned()));
    }

    Ok(())
}

/// Execute the config show subcommand.
///
/// Displays the effective configuration (file + env overrides + defaults).
///
/// # Errors
///
/// Returns `CliError::Core` if loading fails or `CliError::Command` if the section name is unknown.
async fn execute_show(
    config_path: &Path,
    section: Option<String>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    info!(path = %config_path.display(), "loading configuration");

    let (config, from_file) = load_or_default(config_path).await?;
    let source = if from_file {
        config_path.display().to_string()
    } else {
        format!("{} (not found, defaults)", config_path.display())
    };

    let report = match section.as_deref() {
        None => ConfigReport {
            source,
            section: None,
            config_toml: to_toml(&config),
        },
        Some(name) => {
            let config_toml = match name {
                "general" => to_toml(&config.general),
                "tailer" => to_toml(&config.tailer),
                "players" => to_toml(&config.players),
                _ => {
                    return Err(CliError::Command(format!(
                        "unknown section: {} (expected: {})",
                        name,
                        SECTIONS.join(", ")
                    )));
                }
            };
            ConfigReport {
                source,
                section: Some(name.to_owned()),
                config_toml,
            }
        }
    };

    writer.render(&report)?;

    Ok(())
}

fn to_toml<T: Serialize>(value: &T) -> String {
    toml::to_string_pretty(value).unwrap_or_else(|e| format!("(serialization error: {})", e))
}

/// Configuration display report.
///
/// The `config_toml` field is skipped during JSON serialization (only used for text rendering).
#[derive(Serialize)]
pub struct ConfigReport {
    /// Configuration file path
    pub source: String,
    /// Optional section name (None = full config)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Serialized TOML configuration
    #[serde(skip)]
    pub config_toml: String,
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        if let Some(ref section) = self.section {
            let section_label = format!("[{}]", section);
            writeln!(
                w,
                "Configuration {} (source: {})",
                section_label.bold(),
                self.source
            )?;
        } else {
            writeln!(w, "Configuration (source: {})", self.source.bold())?;
        }

        writeln!(w)?;
        write!(w, "{}", self.config_toml)?;

        Ok(())
    }
}

/// Configuration validation report.
#[derive(Serialize)]
pub struct ConfigValidationReport {
    /// Configuration file path
    pub source: String,
    /// Whether the configuration is valid
    pub valid: bool,
    /// Validation error messages (empty if valid)
    pub errors: Vec<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Config Validation: {}", self.source.bold())?;

        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }

        Ok(())
    }
}
