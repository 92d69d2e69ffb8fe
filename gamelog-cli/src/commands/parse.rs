//! `gamelog parse` command handler

use std::io::Write;

use serde::Serialize;
use tracing::{debug, info};

use gamelog_events::LineGrammar;

use crate::cli::ParseArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `parse` command.
///
/// Lines from the command line are classified first, then lines from `--file`.
/// Blank lines in the file are skipped. Every line that fails to classify is
/// reported in the output stream.
///
/// # Errors
///
/// Returns `CliError::Command` when there is no input or when any line fails
/// to classify, and `CliError::Io` when the input file cannot be read.
pub async fn execute(args: ParseArgs, writer: &OutputWriter) -> Result<(), CliError> {
    let inputs = collect_inputs(&args).await?;
    if inputs.is_empty() {
        return Err(CliError::Command(
            "no input lines (pass LINE arguments or --file)".to_owned(),
        ));
    }

    let grammar = LineGrammar::new()?;
    let total = inputs.len();
    let mut failures = 0usize;

    for input in inputs {
        match grammar.classify(&input.text) {
            Ok(event) => writer.emit(&event)?,
            Err(e) => {
                failures += 1;
                debug!(source = %input.source, error = %e, "line could not be classified");
                writer.emit(&ParseFailure {
                    source: input.source,
                    line: input.text,
                    error: e.to_string(),
                })?;
            }
        }
    }

    info!(total, failures, "parse finished");

    if failures > 0 {
        return Err(CliError::Command(format!(
            "{failures} of {total} lines could not be classified"
        )));
    }
    Ok(())
}

/// A line to classify and where it came from.
struct InputLine {
    source: String,
    text: String,
}

async fn collect_inputs(args: &ParseArgs) -> Result<Vec<InputLine>, CliError> {
    let mut inputs: Vec<InputLine> = args
        .lines
        .iter()
        .enumerate()
        .map(|(i, text)| InputLine {
            source: format!("arg {}", i + 1),
            text: text.clone(),
        })
        .collect();

    if let Some(path) = &args.file {
        // Decode like the tailer does: invalid UTF-8 becomes U+FFFD.
        let bytes = tokio::fs::read(path).await?;
        let content = String::from_utf8_lossy(&bytes);
        inputs.extend(
            content
                .lines()
                .enumerate()
                .filter(|(_, text)| !text.trim().is_empty())
                .map(|(i, text)| InputLine {
                    source: format!("{}:{}", path.display(), i + 1),
                    text: text.to_owned(),
                }),
        );
    }

    Ok(inputs)
}

/// Report for a line that no grammar accepted.
#[derive(Serialize)]
pub struct ParseFailure {
    /// `arg N` or `FILE:LINE`
    pub source: String,
    /// Input line as given
    pub line: String,
    /// Classification error message
    pub error: String,
}

impl Render for ParseFailure {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "{}: {} ({})", self.source, "error".red().bold(), self.error)
    }
}
