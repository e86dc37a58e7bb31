#![forbid(unsafe_code)]

//! Editor state and key dispatch.

use kilo_core::cursor::CursorPosition;
use kilo_core::event::Key;
use kilo_core::geometry::Viewport;
use kilo_core::row::TextRow;

/// Letter whose `Ctrl` chord quits.
pub const QUIT_LETTER: u8 = b'q';

/// What the event loop should do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

/// Everything the editor knows: the fixed viewport, the cursor, and the
/// optional text row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    viewport: Viewport,
    cursor: CursorPosition,
    row: Option<TextRow>,
}

impl EditorState {
    /// Start with the cursor at the origin.
    #[must_use]
    pub fn new(viewport: Viewport, row: Option<TextRow>) -> Self {
        Self {
            viewport,
            cursor: CursorPosition::ORIGIN,
            row,
        }
    }

    #[inline]
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    #[must_use]
    pub fn cursor(&self) -> CursorPosition {
        self.cursor
    }

    #[inline]
    #[must_use]
    pub fn row(&self) -> Option<&TextRow> {
        self.row.as_ref()
    }

    /// Apply one key.
    ///
    /// Arrows move the cursor, `Ctrl-Q` quits, everything else is ignored.
    pub fn process_key(&mut self, key: Key) -> KeyOutcome {
        if key.is_ctrl(QUIT_LETTER) {
            return KeyOutcome::Quit;
        }
        if let Some(direction) = key.direction() {
            self.cursor.apply_move(direction, self.viewport);
            tracing::trace!(
                column = self.cursor.column,
                row = self.cursor.row,
                "cursor moved"
            );
        }
        KeyOutcome::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: Viewport = Viewport::new(10, 40);

    #[test]
    fn starts_at_origin() {
        let editor = EditorState::new(VIEW, None);
        assert_eq!(editor.cursor(), CursorPosition::ORIGIN);
        assert_eq!(editor.viewport(), VIEW);
        assert!(editor.row().is_none());
    }

    #[test]
    fn ctrl_q_quits() {
        let mut editor = EditorState::new(VIEW, None);
        assert_eq!(editor.process_key(Key::Char(0x11)), KeyOutcome::Quit);
    }

    #[test]
    fn plain_q_does_not_quit() {
        let mut editor = EditorState::new(VIEW, None);
        assert_eq!(editor.process_key(Key::Char(b'q')), KeyOutcome::Continue);
    }

    #[test]
    fn arrows_move_cursor() {
        let mut editor = EditorState::new(VIEW, None);
        editor.process_key(Key::ArrowRight);
        editor.process_key(Key::ArrowRight);
        editor.process_key(Key::ArrowDown);
        assert_eq!(editor.cursor(), CursorPosition::new(2, 1));
        editor.process_key(Key::ArrowLeft);
        editor.process_key(Key::ArrowUp);
        assert_eq!(editor.cursor(), CursorPosition::new(1, 0));
    }

    #[test]
    fn other_keys_are_noops() {
        let mut editor = EditorState::new(VIEW, Some(TextRow::from_line(b"abc")));
        let before = editor.clone();
        for key in [Key::UnresolvedEscape, Key::Char(b'x'), Key::Char(b'\r')] {
            assert_eq!(editor.process_key(key), KeyOutcome::Continue);
        }
        assert_eq!(editor, before);
    }
}
