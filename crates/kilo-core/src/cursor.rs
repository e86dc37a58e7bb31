#![forbid(unsafe_code)]

//! Cursor position tracking within a fixed viewport.
//!
//! The cursor is 0-indexed (origin at top-left). It can never leave the
//! viewport: each move is one cell and is clamped against the edges, so a
//! move into a wall is a no-op rather than an error.

use crate::event::Direction;
use crate::geometry::Viewport;

/// Cursor position in viewport cells.
///
/// Invariant: `column < viewport.cols` and `row < viewport.rows` for the
/// viewport it is moved within.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct CursorPosition {
    /// Column (x), 0-indexed.
    pub column: u16,
    /// Row (y), 0-indexed.
    pub row: u16,
}

impl CursorPosition {
    /// Cursor at the home position.
    pub const ORIGIN: Self = Self { column: 0, row: 0 };

    /// Create a cursor position.
    #[inline]
    #[must_use]
    pub const fn new(column: u16, row: u16) -> Self {
        Self { column, row }
    }

    /// Move one cell in `direction`, staying inside `viewport`.
    pub fn apply_move(&mut self, direction: Direction, viewport: Viewport) {
        match direction {
            Direction::Left => {
                self.column = self.column.saturating_sub(1);
            }
            Direction::Right => {
                if self.column.saturating_add(1) < viewport.cols {
                    self.column += 1;
                }
            }
            Direction::Up => {
                self.row = self.row.saturating_sub(1);
            }
            Direction::Down => {
                if self.row.saturating_add(1) < viewport.rows {
                    self.row += 1;
                }
            }
        }
    }

    /// Whether this position lies inside `viewport`.
    #[inline]
    #[must_use]
    pub const fn is_within(&self, viewport: Viewport) -> bool {
        self.column < viewport.cols && self.row < viewport.rows
    }
}
