//! Tracing setup for the `desktop-entries` binary.
//!
//! Logs go to stderr, so stdout stays clean for the path lists and JSON the commands
//! print, and to a log file when one can be created.

// -- std imports
use std::{path::PathBuf, sync::OnceLock};

// -- crate imports (conditional)
#[cfg(all(debug_assertions, feature = "tokio-console"))]
use console_subscriber::ConsoleLayer;

// -- crate imports
use anyhow::{Context, Result};
use tracing::warn;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt, prelude::*, registry::Registry};

/// Keeps the non-blocking file writer's worker thread alive until the process exits.
static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const LOG_FILE_NAME: &str = "desktop-entries.log";

#[cfg(debug_assertions)]
const LOG_LEVEL: LevelFilter = LevelFilter::DEBUG;

#[cfg(not(debug_assertions))]
const LOG_LEVEL: LevelFilter = LevelFilter::INFO;

/// Where the log file lives.
///
/// Debug builds write a fresh `./desktop-entries.log` per run; release builds append to the
/// file in the XDG data directory.
///
/// # Errors
/// - [`anyhow::Error`] if the XDG data directory cannot be used or created. (release builds only)
pub fn log_filepath() -> Result<PathBuf> {
    #[cfg(debug_assertions)]
    {
        let path = PathBuf::from(LOG_FILE_NAME);
        let _ = std::fs::remove_file(&path);
        Ok(path)
    }

    #[cfg(not(debug_assertions))]
    {
        xdg::BaseDirectories::with_prefix("desktop-entries")
            .place_data_file(LOG_FILE_NAME)
            .with_context(|| "Could not determine log file path")
    }
}

fn build_file_writer() -> Result<NonBlocking> {
    let path = log_filepath()?;
    let dir = path
        .parent()
        .context("Could not determine log file directory")?;
    let file_name = path
        .file_name()
        .context("Could not determine log file name")?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(guard);

    Ok(writer)
}

/// Filter honoring `RUST_LOG`, defaulting to [`LOG_LEVEL`].
fn env_filter() -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LOG_LEVEL.into())
        .from_env_lossy()
}

/// Installs a subscriber that discards everything.
///
/// # Errors
/// - [`anyhow::Error`] if a global subscriber is already installed.
pub fn init_silent() -> Result<()> {
    tracing::subscriber::set_global_default(tracing::subscriber::NoSubscriber::default())
        .context("Failed to set no-op subscriber")
}

/// Initializes global tracing with stderr and file logging.
///
/// Falls back to stderr only if the log file cannot be opened.
///
/// # Errors
/// - [`anyhow::Error`] if the global tracing subscriber cannot be installed.
pub fn init_tracing() -> Result<()> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(cfg!(debug_assertions))
        .with_line_number(cfg!(debug_assertions))
        .with_filter(env_filter());

    let file_writer = build_file_writer();
    let file_layer = file_writer.as_ref().ok().map(|writer| {
        fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_thread_ids(true)
            .with_writer(writer.clone())
            .with_filter(env_filter())
    });

    let subscriber = Registry::default().with(stderr_layer).with(file_layer);

    #[cfg(all(debug_assertions, feature = "tokio-console"))]
    let subscriber = subscriber.with(ConsoleLayer::builder().spawn());

    tracing::subscriber::set_global_default(subscriber)?;

    if let Err(e) = file_writer {
        warn!("File logging could not be initialized. Falling back to stderr only: {e:#}");
    }

    Ok(())
}
