#![forbid(unsafe_code)]

//! Viewport geometry and window-size resolution.
//!
//! The viewport is resolved once at startup. Two strategies are tried in
//! order:
//!
//! 1. **Window-size ioctl** (`TIOCGWINSZ`) on the output terminal.
//! 2. **Cursor probe**: push the cursor to the far bottom-right corner
//!    (`CSI 999 C`, `CSI 999 B`; the terminal clamps it to its real edges),
//!    then ask where it ended up with a cursor position report request
//!    (`CSI 6 n`). The terminal answers `ESC [ <row> ; <col> R`.
//!
//! The probe is used when the ioctl fails or reports a zero dimension.
//! Its response is collected into a fixed 32-byte buffer; a response that
//! does not fit, does not start with `ESC [`, or does not carry a
//! `row;col` pair fails the resolution.

use std::fmt;
use std::io::{self, Read, Write};

/// Move the cursor right and down as far as the terminal allows.
pub const CURSOR_TO_BOTTOM_RIGHT: &[u8] = b"\x1b[999C\x1b[999B";

/// Device Status Report: request the cursor position (`CSI 6 n`).
pub const CURSOR_POSITION_QUERY: &[u8] = b"\x1b[6n";

/// Capacity of the probe response buffer (including room for a terminator).
const RESPONSE_BUF_LEN: usize = 32;

/// The visible terminal area, in cells.
///
/// Both dimensions are non-zero once resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Viewport {
    /// Height in rows.
    pub rows: u16,
    /// Width in columns.
    pub cols: u16,
}

impl Viewport {
    /// Create a viewport. Callers are responsible for non-zero dimensions.
    #[inline]
    #[must_use]
    pub const fn new(rows: u16, cols: u16) -> Self {
        Self { rows, cols }
    }

    /// Build a viewport from raw dimensions, rejecting zero on either axis.
    #[inline]
    #[must_use]
    pub const fn from_dimensions(rows: u16, cols: u16) -> Option<Self> {
        if rows == 0 || cols == 0 {
            None
        } else {
            Some(Self::new(rows, cols))
        }
    }

    /// Row index of the vertical midpoint (`rows / 2`).
    #[inline]
    #[must_use]
    pub const fn mid_row(&self) -> u16 {
        self.rows / 2
    }
}

/// Window-size resolution failure.
#[derive(Debug)]
pub enum GeometryError {
    /// Writing the probe or reading its response failed.
    Io {
        /// The operation that failed.
        op: &'static str,
        /// Underlying error.
        source: io::Error,
    },
    /// The cursor position report was not `ESC [ <row> ; <col> R`.
    MalformedResponse(Vec<u8>),
    /// The terminal reported a zero-sized window.
    ZeroSize,
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { op, source } => write!(f, "getWindowSize: {op}: {source}"),
            Self::MalformedResponse(bytes) => write!(
                f,
                "getWindowSize: malformed cursor position report {:?}",
                String::from_utf8_lossy(bytes)
            ),
            Self::ZeroSize => write!(f, "getWindowSize: terminal reported a zero-sized window"),
        }
    }
}

impl std::error::Error for GeometryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Resolve the viewport of the terminal behind `output`.
///
/// Tries the window-size ioctl first and falls back to the cursor probe,
/// which writes to `output` and reads the reply from `input`. The terminal
/// must already be in raw mode for the probe reply to arrive unbuffered.
///
/// # Errors
///
/// Returns an error if the probe is needed and fails.
#[cfg(unix)]
pub fn resolve_viewport<R, W>(input: &mut R, output: &mut W) -> Result<Viewport, GeometryError>
where
    R: Read,
    W: Write + std::os::fd::AsFd,
{
    match rustix::termios::tcgetwinsize(&*output) {
        Ok(ws) => {
            if let Some(viewport) = viewport_from_winsize(&ws) {
                crate::info!(
                    rows = viewport.rows,
                    cols = viewport.cols,
                    "viewport from window size"
                );
                return Ok(viewport);
            }
            crate::debug!(
                rows = ws.ws_row,
                cols = ws.ws_col,
                "window size has a zero dimension, probing"
            );
        }
        Err(err) => {
            crate::debug!(%err, "window size unavailable, probing");
            let _ = err;
        }
    }

    let viewport = probe_viewport(input, output)?;
    crate::info!(
        rows = viewport.rows,
        cols = viewport.cols,
        "viewport from cursor probe"
    );
    Ok(viewport)
}

/// Viewport reported by the window-size ioctl, `None` if either side is zero.
#[cfg(unix)]
#[must_use]
pub fn viewport_from_winsize(ws: &rustix::termios::Winsize) -> Option<Viewport> {
    Viewport::from_dimensions(ws.ws_row, ws.ws_col)
}

/// Resolve the viewport with the cursor probe alone.
///
/// # Errors
///
/// Returns an error if the probe cannot be written, the reply cannot be
/// read, or the reply is malformed or zero-sized.
pub fn probe_viewport<R, W>(input: &mut R, output: &mut W) -> Result<Viewport, GeometryError>
where
    R: Read,
    W: Write,
{
    output
        .write_all(CURSOR_TO_BOTTOM_RIGHT)
        .and_then(|()| output.write_all(CURSOR_POSITION_QUERY))
        .and_then(|()| output.flush())
        .map_err(|source| GeometryError::Io {
            op: "write",
            source,
        })?;

    let mut buf = [0u8; RESPONSE_BUF_LEN];
    let len = read_position_report(input, &mut buf)?;
    let (rows, cols) = parse_cursor_position_report(&buf[..len])
        .ok_or_else(|| GeometryError::MalformedResponse(buf[..len].to_vec()))?;
    Viewport::from_dimensions(rows, cols).ok_or(GeometryError::ZeroSize)
}

/// Read a cursor position report one byte at a time.
///
/// Stops at the terminating `R` (not stored), when a read yields nothing, or
/// when the buffer is one byte short of full. Returns the number of bytes
/// stored.
fn read_position_report<R: Read>(input: &mut R, buf: &mut [u8]) -> Result<usize, GeometryError> {
    let mut len = 0;
    let mut byte = [0u8; 1];
    while len < buf.len() - 1 {
        match input.read(&mut byte) {
            Ok(0) => break,
            Ok(_) if byte[0] == b'R' => break,
            Ok(_) => {
                buf[len] = byte[0];
                len += 1;
            }
            Err(ref e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                ) =>
            {
                break;
            }
            Err(source) => return Err(GeometryError::Io { op: "read", source }),
        }
    }
    Ok(len)
}

/// Parse `ESC [ <row> ; <col>` with an optional trailing `R`.
///
/// ```
/// use kilo_core::geometry::parse_cursor_position_report;
///
/// assert_eq!(parse_cursor_position_report(b"\x1b[24;80R"), Some((24, 80)));
/// assert_eq!(parse_cursor_position_report(b"[24;80R"), None);
/// ```
#[must_use]
pub fn parse_cursor_position_report(bytes: &[u8]) -> Option<(u16, u16)> {
    let body = bytes.strip_prefix(b"\x1b[")?;
    let body = match body.iter().position(|&b| b == b'R') {
        Some(end) => &body[..end],
        None => body,
    };
    let split = body.iter().position(|&b| b == b';')?;
    let rows = parse_decimal(&body[..split])?;
    let cols = parse_decimal(&body[split + 1..])?;
    Some((rows, cols))
}

fn parse_decimal(digits: &[u8]) -> Option<u16> {
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(digits).ok()?.parse().ok()
}
