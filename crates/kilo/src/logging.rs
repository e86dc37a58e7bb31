#![forbid(unsafe_code)]

//! Diagnostic logging setup.
//!
//! The terminal is the editor's display, so log output never goes there.
//! Logging is enabled only when a log file is given; events are written to
//! it as plain text, filtered by `KILO_LOG` (default `info`).

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding filter directives.
pub const FILTER_ENV: &str = "KILO_LOG";

const DEFAULT_FILTER: &str = "info";

/// Build the event filter from `directives`, falling back to `info` when
/// they are absent or do not parse.
#[must_use]
pub fn env_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber writing to `log_file`.
///
/// Does nothing and returns `Ok(false)` when `log_file` is `None`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened for appending or a global
/// subscriber is already installed.
pub fn init(log_file: Option<&Path>) -> io::Result<bool> {
    let Some(path) = log_file else {
        return Ok(false);
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let directives = std::env::var(FILTER_ENV).ok();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(directives.as_deref()))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(io::Error::other)?;

    tracing::info!(version = crate::VERSION, path = %path.display(), "logging started");
    Ok(true)
}
