#![forbid(unsafe_code)]

//! Loading the displayed text from disk.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use kilo_core::row::{TextRow, read_first_line};

use crate::EditorError;

/// Open `path` and read its first line.
///
/// An empty file yields `Ok(None)`.
///
/// # Errors
///
/// [`EditorError::Open`] if the file cannot be opened and
/// [`EditorError::Read`] if reading it fails.
pub fn open_first_line(path: &Path) -> Result<Option<TextRow>, EditorError> {
    let file = File::open(path).map_err(|source| EditorError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let row = read_first_line(&mut BufReader::new(file)).map_err(EditorError::Read)?;
    tracing::info!(
        path = %path.display(),
        bytes = row.as_ref().map_or(0, TextRow::len),
        "file loaded"
    );
    Ok(row)
}
