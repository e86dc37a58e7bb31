#![forbid(unsafe_code)]

//! Logical key events produced by the input decoder.
//!
//! # Design Notes
//!
//! - The decoder never interprets literal bytes; `Ctrl` combinations arrive
//!   as their raw control byte (`Ctrl-Q` is `0x11`).
//! - Only the four plain arrow sequences (`ESC [ A..D`) are recognized.
//!   Every other escape sequence collapses to [`Key::UnresolvedEscape`].

/// Escape byte that introduces a multi-byte sequence.
pub const ESC: u8 = 0x1b;

/// Map an ASCII letter to the byte its `Ctrl` chord produces.
///
/// ```
/// use kilo_core::event::ctrl_key;
///
/// assert_eq!(ctrl_key(b'q'), 0x11);
/// assert_eq!(ctrl_key(b'Q'), 0x11);
/// ```
#[inline]
#[must_use]
pub const fn ctrl_key(k: u8) -> u8 {
    k & 0x1f
}

/// A decoded key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A byte delivered as-is (printable or control).
    Char(u8),
    /// `ESC [ A`
    ArrowUp,
    /// `ESC [ B`
    ArrowDown,
    /// `ESC [ D`
    ArrowLeft,
    /// `ESC [ C`
    ArrowRight,
    /// A lone escape, a truncated sequence, or one we do not map.
    UnresolvedEscape,
}

impl Key {
    /// The cursor direction for arrow keys, `None` for everything else.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::ArrowUp => Some(Direction::Up),
            Self::ArrowDown => Some(Direction::Down),
            Self::ArrowLeft => Some(Direction::Left),
            Self::ArrowRight => Some(Direction::Right),
            Self::Char(_) | Self::UnresolvedEscape => None,
        }
    }

    /// Whether this key is the `Ctrl` chord for `letter`.
    #[must_use]
    pub const fn is_ctrl(self, letter: u8) -> bool {
        matches!(self, Self::Char(b) if b == ctrl_key(letter))
    }
}

/// One-cell cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}
