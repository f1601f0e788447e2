//! Tracing subscriber setup.
//!
//! Filtering comes from `SEQVIEW_LOG` (e.g. `SEQVIEW_LOG=seqview::store=debug`),
//! falling back to `seqview=info` when unset or invalid.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use rand::distr::Alphanumeric;
use rand::Rng;
use thiserror::Error;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "SEQVIEW_LOG";
const DEFAULT_FILTER: &str = "seqview=info";
const LOG_SUFFIX_LEN: usize = 8;

/// Errors that can occur while installing the subscriber.
#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Failed to create log file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Logging is already initialized: {0}")]
    AlreadyInitialized(#[from] TryInitError),
}

fn filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

fn env_filter() -> EnvFilter {
    filter_from(std::env::var(LOG_ENV).ok().as_deref())
}

/// Logs to stderr, for text output mode.
pub fn init_stderr() -> Result<(), LoggingError> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(env_filter())
        .try_init()?;
    Ok(())
}

/// Random log file path in the temp directory.
pub fn log_file_path() -> PathBuf {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(LOG_SUFFIX_LEN)
        .map(char::from)
        .collect();
    std::env::temp_dir().join(format!("seqview-{suffix}.log"))
}

/// Logs to a fresh file, for the interactive viewer which owns the terminal.
///
/// Returns the path of the log file.
pub fn init_file() -> Result<PathBuf, LoggingError> {
    let path = log_file_path();
    let file = File::create(&path)?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(env_filter())
        .try_init()?;
    Ok(path)
}
