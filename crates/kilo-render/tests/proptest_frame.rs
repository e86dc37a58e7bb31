//! Property-based structure tests for rendered frames.
//!
//! For any viewport, cursor inside it, and optional text row:
//!
//! 1. The frame starts with hide-cursor + home and ends with CUP + show.
//! 2. There are exactly `rows` erase-line sequences and `rows - 1` CRLFs.
//! 3. No line holds more than `cols` visible bytes.
//! 4. Rendering is deterministic.

use kilo_core::cursor::CursorPosition;
use kilo_core::geometry::Viewport;
use kilo_core::row::TextRow;
use kilo_render::FrameRenderer;
use proptest::prelude::*;

fn count(haystack: &[u8], needle: &[u8]) -> usize {
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}

fn case_strategy() -> impl Strategy<Value = (Viewport, CursorPosition, Option<TextRow>)> {
    (1u16..=120, 1u16..=240).prop_flat_map(|(rows, cols)| {
        (
            Just(Viewport::new(rows, cols)),
            (0..cols, 0..rows).prop_map(|(c, r)| CursorPosition::new(c, r)),
            prop::option::of(
                prop::collection::vec(b' '..=b'~', 0..400)
                    .prop_map(|bytes| TextRow::from_line(&bytes)),
            ),
        )
    })
}

proptest! {
    #[test]
    fn frame_structure_holds((viewport, cursor, row) in case_strategy()) {
        let renderer = FrameRenderer::new("0.0.1");
        let bytes = renderer.render(viewport, cursor, row.as_ref()).into_bytes();

        prop_assert!(bytes.starts_with(b"\x1b[?25l\x1b[H"));
        let suffix = format!("\x1b[{};{}H\x1b[?25h", cursor.row + 1, cursor.column + 1);
        prop_assert!(bytes.ends_with(suffix.as_bytes()));

        prop_assert_eq!(count(&bytes, b"\x1b[K"), usize::from(viewport.rows));
        prop_assert_eq!(count(&bytes, b"\r\n"), usize::from(viewport.rows) - 1);
    }

    #[test]
    fn lines_fit_the_width((viewport, cursor, row) in case_strategy()) {
        let bytes = FrameRenderer::new("0.0.1")
            .render(viewport, cursor, row.as_ref())
            .into_bytes();
        let body = &bytes[b"\x1b[?25l\x1b[H".len()..];
        for line in body.split(|&b| b == b'\n') {
            let Some(end) = line.windows(3).position(|w| w == b"\x1b[K") else {
                continue;
            };
            prop_assert!(end <= usize::from(viewport.cols));
        }
    }

    #[test]
    fn rendering_is_deterministic((viewport, cursor, row) in case_strategy()) {
        let renderer = FrameRenderer::new("0.0.1");
        let a = renderer.render(viewport, cursor, row.as_ref()).into_bytes();
        let b = renderer.render(viewport, cursor, row.as_ref()).into_bytes();
        prop_assert_eq!(a, b);
    }
}
