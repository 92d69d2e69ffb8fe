//! `gamelog tail` command handler

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use gamelog_core::config::GamelogConfig;
use gamelog_core::event::Event;
use gamelog_events::{EventsError, Tailer, TailerConfig, TailerStats};

use crate::cli::TailArgs;
use crate::error::CliError;
use crate::output::OutputWriter;

/// Execute the `tail` command.
///
/// Runs the tailer in a background task and prints every event until
/// Ctrl-C. Cancellation is a normal exit.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read, or if stdout fails.
pub async fn execute(
    args: TailArgs,
    config: &GamelogConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let tailer_config = tailer_config(args, config);
    tailer_config.validate()?;

    info!(
        path = %tailer_config.path.display(),
        start_at_end = tailer_config.start_at_end,
        "tailing log file"
    );

    let (tx, rx) = mpsc::channel(tailer_config.channel_capacity);
    let cancel = CancellationToken::new();

    let mut tailer = Tailer::new(tailer_config, tx, cancel.clone());
    let task = tokio::spawn(async move {
        let result = tailer.run().await;
        (result, tailer.stats())
    });

    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, stopping tailer");
            signal_cancel.cancel();
        }
    });

    let (_, result) = drive(rx, task, &cancel, |event| writer.emit(event)).await;
    result
}

/// Forward events to `emit` until the tailer stops, then join the tailer task.
///
/// A failing `emit` cancels the tailer. The task is still awaited so its stats
/// are logged and returned, and the emit error wins over the tailer result.
async fn drive(
    mut rx: mpsc::Receiver<Event>,
    task: JoinHandle<(Result<(), EventsError>, TailerStats)>,
    cancel: &CancellationToken,
    mut emit: impl FnMut(&Event) -> Result<(), CliError>,
) -> (TailerStats, Result<(), CliError>) {
    let mut outcome = Ok(());

    // The sender is dropped when the tailer returns, which ends this loop.
    while let Some(event) = rx.recv().await {
        if let Err(e) = emit(&event) {
            warn!(error = %e, "failed to write event, stopping tailer");
            cancel.cancel();
            outcome = Err(e);
            break;
        }
    }
    drop(rx);

    let (result, stats) = match task.await {
        Ok(joined) => joined,
        Err(e) => {
            return (
                TailerStats::default(),
                Err(CliError::Command(format!("tailer task failed: {e}"))),
            );
        }
    };

    info!(
        lines_read = stats.lines_read,
        events_published = stats.events_published,
        parse_errors = stats.parse_errors,
        oversized_lines = stats.oversized_lines,
        rotations = stats.rotations,
        "tailer finished"
    );

    let result = match result {
        Ok(()) => Ok(()),
        Err(e) if e.is_cancelled() => Ok(()),
        Err(e) => {
            warn!(error = %e, "tailer stopped");
            Err(e.into())
        }
    };

    (stats, outcome.and(result))
}

/// Apply command-line overrides on top of the `[tailer]` section.
fn tailer_config(args: TailArgs, config: &GamelogConfig) -> TailerConfig {
    let mut tailer_config = TailerConfig::from_core(&config.tailer);
    if let Some(path) = args.path {
        tailer_config.path = path;
    }
    if args.from_start {
        tailer_config.start_at_end = false;
    }
    tailer_config
}
