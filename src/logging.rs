//! Tracing subscriber setup shared by the binaries.
//!
//! Writing logs to the terminal corrupts the TUI (alternate screen), so in
//! `Auto` mode an interactive session logs to a file and a non-interactive
//! one to stdout.

use std::io::IsTerminal;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::adapters::sanitize::SanitizingMakeWriter;
use crate::config::LogMode;

/// Install the global subscriber. Keep the returned guard alive until exit
/// so buffered lines are flushed.
///
/// # Errors
/// Returns an error if the log file cannot be opened.
pub fn init(mode: LogMode, log_file: &Path) -> std::io::Result<WorkerGuard> {
    let mode = match mode {
        LogMode::Auto if std::io::stdout().is_terminal() => LogMode::File,
        LogMode::Auto => LogMode::Stdout,
        other => other,
    };

    let (writer, guard) = match mode {
        LogMode::File => {
            if let Some(parent) = log_file.parent() {
                // Best-effort: open() below reports the real failure.
                let _ = std::fs::create_dir_all(parent);
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)?;
            tracing_appender::non_blocking(file)
        }
        LogMode::Stderr => tracing_appender::non_blocking(std::io::stderr()),
        LogMode::Stdout | LogMode::Auto => tracing_appender::non_blocking(std::io::stdout()),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(SanitizingMakeWriter::new(writer)),
        )
        .init();

    Ok(guard)
}
