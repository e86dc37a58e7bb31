#![forbid(unsafe_code)]

//! ANSI escape sequence generation helpers.
//!
//! Pure byte-generation functions for the handful of VT100 control
//! sequences the editor emits. No state is tracked here.
//!
//! # Sequence Reference
//!
//! | Category | Sequence | Description |
//! |----------|----------|-------------|
//! | CSI | `ESC [ row ; col H` | CUP (Cursor Position, 1-indexed) |
//! | CSI | `ESC [ H` | Cursor home |
//! | CSI | `ESC [ K` | EL (Erase Line, cursor to end) |
//! | CSI | `ESC [ 2 J` | ED (Erase Display, entire screen) |
//! | DEC | `ESC [ ? 25 l` / `ESC [ ? 25 h` | Cursor hide / show (DECTCEM) |

use std::io::{self, Write};

// =============================================================================
// Cursor Positioning
// =============================================================================

/// Cursor home: `CSI H`
pub const CURSOR_HOME: &[u8] = b"\x1b[H";

/// Move the cursor to the top-left cell.
#[inline]
pub fn cursor_home<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(CURSOR_HOME)
}

/// CUP (Cursor Position): `CSI row ; col H` (1-indexed)
///
/// Row and col are 0-indexed input, converted to 1-indexed for ANSI.
pub fn cup<W: Write>(w: &mut W, row: u16, col: u16) -> io::Result<()> {
    write!(
        w,
        "\x1b[{};{}H",
        u32::from(row) + 1,
        u32::from(col) + 1
    )
}

/// Carriage return plus line feed.
pub const CRLF: &[u8] = b"\r\n";

#[inline]
pub fn crlf<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(CRLF)
}

// =============================================================================
// Cursor Visibility
// =============================================================================

/// DECTCEM cursor hide: `CSI ? 25 l`
pub const CURSOR_HIDE: &[u8] = b"\x1b[?25l";

/// DECTCEM cursor show: `CSI ? 25 h`
pub const CURSOR_SHOW: &[u8] = b"\x1b[?25h";

#[inline]
pub fn cursor_hide<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(CURSOR_HIDE)
}

#[inline]
pub fn cursor_show<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(CURSOR_SHOW)
}

// =============================================================================
// Erase Operations
// =============================================================================

/// EL (Erase Line) from the cursor to the end of the line: `CSI K`
pub const ERASE_LINE_TO_END: &[u8] = b"\x1b[K";

/// ED (Erase Display) for the entire screen: `CSI 2 J`
pub const ERASE_DISPLAY: &[u8] = b"\x1b[2J";

#[inline]
pub fn erase_line_to_end<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(ERASE_LINE_TO_END)
}

#[inline]
pub fn erase_display<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(ERASE_DISPLAY)
}

/// Clear the whole screen and home the cursor (`CSI 2 J` then `CSI H`).
///
/// Used on quit and on the fatal error path.
pub fn clear_screen<W: Write>(w: &mut W) -> io::Result<()> {
    erase_display(w)?;
    cursor_home(w)
}
