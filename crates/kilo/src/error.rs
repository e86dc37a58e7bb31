#![forbid(unsafe_code)]

//! Errors that end the editor.
//!
//! Every variant is fatal. `main` reports it as `kilo: <error>` after the
//! screen is cleared and the terminal restored.

use std::fmt;
use std::io;
use std::path::PathBuf;

use kilo_core::geometry::GeometryError;
#[cfg(unix)]
use kilo_core::terminal_session::TerminalError;

#[derive(Debug)]
pub enum EditorError {
    /// Entering or leaving raw mode failed.
    #[cfg(unix)]
    Terminal(TerminalError),
    /// The window size could not be determined.
    Geometry(GeometryError),
    /// The file named on the command line could not be opened.
    Open { path: PathBuf, source: io::Error },
    /// Reading from the terminal or the file failed.
    Read(io::Error),
    /// Writing a frame to the terminal failed.
    Write(io::Error),
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(unix)]
            Self::Terminal(err) => err.fmt(f),
            Self::Geometry(err) => err.fmt(f),
            Self::Open { path, source } => write!(f, "fopen: {}: {source}", path.display()),
            Self::Read(err) => write!(f, "read: {err}"),
            Self::Write(err) => write!(f, "write: {err}"),
        }
    }
}

impl std::error::Error for EditorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(unix)]
            Self::Terminal(err) => Some(err),
            Self::Geometry(err) => Some(err),
            Self::Open { source, .. } => Some(source),
            Self::Read(err) | Self::Write(err) => Some(err),
        }
    }
}

#[cfg(unix)]
impl From<TerminalError> for EditorError {
    fn from(err: TerminalError) -> Self {
        Self::Terminal(err)
    }
}

impl From<GeometryError> for EditorError {
    fn from(err: GeometryError) -> Self {
        Self::Geometry(err)
    }
}
