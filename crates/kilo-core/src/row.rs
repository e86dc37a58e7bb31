#![forbid(unsafe_code)]

//! The single text row shown at the top of the screen.
//!
//! Content is raw bytes; no encoding is assumed and nothing is expanded.

use std::io::{self, BufRead};

/// One line of document text without its line terminator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextRow {
    content: Vec<u8>,
}

impl TextRow {
    /// Build a row from a line, stripping any trailing `\r` and `\n` bytes.
    #[must_use]
    pub fn from_line(line: &[u8]) -> Self {
        let mut end = line.len();
        while end > 0 && matches!(line[end - 1], b'\n' | b'\r') {
            end -= 1;
        }
        Self {
            content: line[..end].to_vec(),
        }
    }

    /// Length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.content
    }

    /// The row clipped to `width` bytes.
    #[must_use]
    pub fn visible(&self, width: usize) -> &[u8] {
        &self.content[..self.content.len().min(width)]
    }
}

/// Read the first line of `reader` into a row.
///
/// Returns `Ok(None)` when the source is empty.
///
/// # Errors
///
/// Returns the underlying read error.
pub fn read_first_line<R: BufRead>(reader: &mut R) -> io::Result<Option<TextRow>> {
    let mut line = Vec::new();
    let n = reader.read_until(b'\n', &mut line)?;
    if n == 0 {
        return Ok(None);
    }
    crate::debug!(bytes = n, "read first line");
    Ok(Some(TextRow::from_line(&line)))
}
