#![forbid(unsafe_code)]

//! Frame composition.
//!
//! A frame is composed from scratch every refresh and returned as an
//! [`AppendBuffer`] ready for a single flush:
//!
//! ```text
//! CSI ?25l  CSI H                      hide cursor, home
//! <line 0> CSI K CRLF                  text row, or "~"
//! ...
//! <line rows/2> CSI K CRLF             welcome banner when no text there
//! ...
//! <line rows-1> CSI K                  no CRLF after the last line
//! CSI row;col H  CSI ?25h              place cursor (1-indexed), show it
//! ```
//!
//! The screen is never cleared as a whole; each line clears its own tail.

use std::io::{self, Write};

use kilo_core::cursor::CursorPosition;
use kilo_core::geometry::Viewport;
use kilo_core::row::TextRow;

use crate::AppendBuffer;
use crate::ansi;

/// Text before the version number in the welcome banner.
pub const WELCOME_PREFIX: &str = "Kilo editor -- version ";

/// Filler drawn on lines past the end of the document.
const FILLER: &[u8] = b"~";

/// Composes full-screen frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameRenderer {
    welcome: String,
}

impl FrameRenderer {
    /// Create a renderer whose banner announces `version`.
    #[must_use]
    pub fn new(version: &str) -> Self {
        Self {
            welcome: format!("{WELCOME_PREFIX}{version}"),
        }
    }

    /// The full, untruncated banner text.
    #[must_use]
    pub fn welcome(&self) -> &str {
        &self.welcome
    }

    /// Compose one frame.
    ///
    /// Reads `viewport`, `cursor`, and `row` without modifying them.
    #[must_use]
    pub fn render(
        &self,
        viewport: Viewport,
        cursor: CursorPosition,
        row: Option<&TextRow>,
    ) -> AppendBuffer {
        #[cfg(feature = "tracing")]
        let _span = tracing::trace_span!("render_frame", rows = viewport.rows, cols = viewport.cols)
            .entered();

        let per_line = usize::from(viewport.cols) + ansi::ERASE_LINE_TO_END.len() + 2;
        let mut ab = AppendBuffer::with_capacity(usize::from(viewport.rows) * per_line + 32);
        // AppendBuffer's Write impl never returns an error.
        let _ = self.compose(&mut ab, viewport, cursor, row);
        ab
    }

    fn compose<W: Write>(
        &self,
        w: &mut W,
        viewport: Viewport,
        cursor: CursorPosition,
        row: Option<&TextRow>,
    ) -> io::Result<()> {
        ansi::cursor_hide(w)?;
        ansi::cursor_home(w)?;
        self.draw_rows(w, viewport, row)?;
        ansi::cup(w, cursor.row, cursor.column)?;
        ansi::cursor_show(w)
    }

    fn draw_rows<W: Write>(
        &self,
        w: &mut W,
        viewport: Viewport,
        row: Option<&TextRow>,
    ) -> io::Result<()> {
        let cols = usize::from(viewport.cols);
        for y in 0..viewport.rows {
            match row {
                Some(text) if y == 0 => w.write_all(text.visible(cols))?,
                _ if y == viewport.mid_row() => self.draw_welcome(w, cols)?,
                _ => w.write_all(FILLER)?,
            }
            ansi::erase_line_to_end(w)?;
            if y + 1 < viewport.rows {
                ansi::crlf(w)?;
            }
        }
        Ok(())
    }

    /// Centered banner. The first pad column carries the filler.
    fn draw_welcome<W: Write>(&self, w: &mut W, cols: usize) -> io::Result<()> {
        let banner = &self.welcome.as_bytes()[..self.welcome.len().min(cols)];
        let mut padding = (cols - banner.len()) / 2;
        if padding > 0 {
            w.write_all(FILLER)?;
            padding -= 1;
        }
        for _ in 0..padding {
            w.write_all(b" ")?;
        }
        w.write_all(banner)
    }
}

impl Default for FrameRenderer {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_VERSION"))
    }
}
