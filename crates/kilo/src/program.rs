#![forbid(unsafe_code)]

//! The event loop.
//!
//! # State Machine
//!
//! ```text
//!            ┌──────────────────────────────┐
//!            │ Running                      │
//!            │  render + flush one frame    │
//!            │  decode one key              │
//!            │  arrow  -> move cursor       │
//!            │  other  -> ignore            │
//!            └──────────────┬───────────────┘
//!                           │ Ctrl-Q: clear screen + home, one write
//!                           ▼
//!                      Terminating
//! ```
//!
//! There is no way back from `Terminating`. Each frame and the final clear
//! are each delivered in a single `write_all`.

use std::io::{Read, Write};

use kilo_core::input_parser::InputDecoder;
use kilo_render::{AppendBuffer, FrameRenderer, ansi};

use crate::editor::{EditorState, KeyOutcome};
use crate::error::EditorError;

/// Event loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Terminating,
}

/// Drives the editor: owns the terminal streams, the state, and the renderer.
#[derive(Debug)]
pub struct Program<R, W> {
    decoder: InputDecoder<R>,
    output: W,
    renderer: FrameRenderer,
    editor: EditorState,
    state: LoopState,
    frames: u64,
}

impl<R: Read, W: Write> Program<R, W> {
    pub fn new(input: R, output: W, editor: EditorState, renderer: FrameRenderer) -> Self {
        Self {
            decoder: InputDecoder::new(input),
            output,
            renderer,
            editor,
            state: LoopState::Running,
            frames: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> LoopState {
        self.state
    }

    #[must_use]
    pub fn editor(&self) -> &EditorState {
        &self.editor
    }

    /// Frames flushed so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Give back the output stream.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Run until the quit key.
    ///
    /// # Errors
    ///
    /// Returns the first read or write failure.
    pub fn run(&mut self) -> Result<(), EditorError> {
        let _span = tracing::info_span!("event_loop").entered();
        while self.step()? == LoopState::Running {}
        tracing::info!(frames = self.frames, "quit");
        Ok(())
    }

    /// One iteration: refresh the screen, then read and apply one key.
    ///
    /// Does nothing once terminating.
    ///
    /// # Errors
    ///
    /// Returns a read or write failure.
    pub fn step(&mut self) -> Result<LoopState, EditorError> {
        if self.state == LoopState::Terminating {
            return Ok(self.state);
        }
        self.refresh_screen()?;

        let key = self.decoder.read_key().map_err(EditorError::Read)?;
        tracing::debug!(?key, "key");
        if self.editor.process_key(key) == KeyOutcome::Quit {
            self.clear_screen()?;
            self.state = LoopState::Terminating;
        }
        Ok(self.state)
    }

    /// Render the current state and flush it in one write.
    ///
    /// # Errors
    ///
    /// Returns the write failure.
    pub fn refresh_screen(&mut self) -> Result<(), EditorError> {
        let frame = self.renderer.render(
            self.editor.viewport(),
            self.editor.cursor(),
            self.editor.row(),
        );
        frame
            .flush_to(&mut self.output)
            .map_err(EditorError::Write)?;
        self.frames += 1;
        Ok(())
    }

    fn clear_screen(&mut self) -> Result<(), EditorError> {
        let mut ab = AppendBuffer::new();
        ab.append(ansi::ERASE_DISPLAY);
        ab.append(ansi::CURSOR_HOME);
        ab.flush_to(&mut self.output).map_err(EditorError::Write)
    }
}

/// Enter raw mode, resolve the viewport, load the file, and run the loop.
///
/// The terminal is restored before this returns. On failure the screen is
/// cleared first, so the caller only has to report the error.
///
/// # Errors
///
/// Any [`EditorError`].
#[cfg(unix)]
pub fn launch(opts: &crate::cli::Opts) -> Result<(), EditorError> {
    use kilo_core::terminal_session::{RawModeOptions, TerminalSession};

    let mut session = match TerminalSession::enter(RawModeOptions::default()) {
        Ok(session) => session,
        Err(err) => {
            clear_terminal();
            return Err(err.into());
        }
    };
    match drive(opts) {
        Ok(()) => Ok(session.restore()?),
        Err(err) => {
            clear_terminal();
            let _ = session.restore();
            Err(err)
        }
    }
}

#[cfg(unix)]
fn drive(opts: &crate::cli::Opts) -> Result<(), EditorError> {
    use kilo_core::geometry::resolve_viewport;
    use kilo_core::terminal_session::{TerminalError, unbuffered_stdio};

    let (mut input, mut output) =
        unbuffered_stdio().map_err(|source| TerminalError::Io { op: "dup", source })?;

    let viewport = resolve_viewport(&mut input, &mut output)?;
    let row = match opts.file.as_deref() {
        Some(path) => crate::document::open_first_line(path)?,
        None => None,
    };

    let editor = EditorState::new(viewport, row);
    let mut program = Program::new(input, output, editor, FrameRenderer::new(crate::VERSION));
    program.run()
}

/// Best-effort `ESC[2J ESC[H` on the fatal path.
#[cfg(unix)]
fn clear_terminal() {
    let mut ab = AppendBuffer::new();
    ab.append(ansi::ERASE_DISPLAY);
    ab.append(ansi::CURSOR_HOME);
    let _ = ab.flush_to(&mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use kilo_core::cursor::CursorPosition;
    use kilo_core::geometry::Viewport;
    use kilo_core::row::TextRow;
    use std::io;

    /// Records each `write` call separately.
    #[derive(Default)]
    struct WriteLog {
        writes: Vec<Vec<u8>>,
    }

    impl Write for WriteLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.writes.push(buf.to_vec());
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("intentional write failure"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    const VIEW: Viewport = Viewport::new(10, 40);

    fn program(input: &[u8]) -> Program<&[u8], WriteLog> {
        Program::new(
            input,
            WriteLog::default(),
            EditorState::new(VIEW, None),
            FrameRenderer::new("0.0.1"),
        )
    }

    #[test]
    fn quit_clears_screen_once_and_terminates() {
        let mut p = program(b"\x11");
        p.run().unwrap();
        assert_eq!(p.state(), LoopState::Terminating);
        let log = p.into_output();
        assert_eq!(log.writes.len(), 2);
        assert_eq!(log.writes[1], b"\x1b[2J\x1b[H");
        let clears = log
            .writes
            .iter()
            .filter(|w| w.windows(4).any(|s| s == b"\x1b[2J"))
            .count();
        assert_eq!(clears, 1);
    }

    #[test]
    fn one_write_per_frame() {
        let mut p = program(b"\x1b[C\x1b[Bx\x11");
        p.run().unwrap();
        assert_eq!(p.frames(), 4);
        let log = p.into_output();
        // Four frames plus the final clear.
        assert_eq!(log.writes.len(), 5);
        for frame in &log.writes[..4] {
            assert!(frame.starts_with(b"\x1b[?25l\x1b[H"));
            assert!(frame.ends_with(b"\x1b[?25h"));
        }
    }

    #[test]
    fn frames_track_cursor_moves() {
        let mut p = program(b"\x1b[C\x1b[C\x1b[B\x11");
        p.run().unwrap();
        assert_eq!(p.editor().cursor(), CursorPosition::new(2, 1));
        let log = p.into_output();
        assert!(log.writes[0].ends_with(b"\x1b[1;1H\x1b[?25h"));
        assert!(log.writes[1].ends_with(b"\x1b[1;2H\x1b[?25h"));
        assert!(log.writes[2].ends_with(b"\x1b[1;3H\x1b[?25h"));
        assert!(log.writes[3].ends_with(b"\x1b[2;3H\x1b[?25h"));
    }

    #[test]
    fn unresolved_escape_and_literals_are_ignored() {
        let mut p = program(b"\x1b[Zabc\x11");
        p.run().unwrap();
        assert_eq!(p.editor().cursor(), CursorPosition::ORIGIN);
        assert_eq!(p.frames(), 5);
    }

    #[test]
    fn steps_after_quit_do_nothing() {
        let mut p = program(b"\x11");
        assert_eq!(p.step().unwrap(), LoopState::Terminating);
        assert_eq!(p.step().unwrap(), LoopState::Terminating);
        assert_eq!(p.frames(), 1);
        assert_eq!(p.into_output().writes.len(), 2);
    }

    #[test]
    fn text_row_is_rendered() {
        let mut p = Program::new(
            &b"\x11"[..],
            WriteLog::default(),
            EditorState::new(VIEW, Some(TextRow::from_line(b"hello\n"))),
            FrameRenderer::new("0.0.1"),
        );
        p.run().unwrap();
        let log = p.into_output();
        assert!(log.writes[0].starts_with(b"\x1b[?25l\x1b[Hhello\x1b[K\r\n"));
    }

    #[test]
    fn write_failure_is_fatal() {
        let mut p = Program::new(
            &b"\x11"[..],
            FailingWriter,
            EditorState::new(VIEW, None),
            FrameRenderer::new("0.0.1"),
        );
        let err = p.run().unwrap_err();
        assert!(matches!(err, EditorError::Write(_)));
        assert_eq!(p.state(), LoopState::Running);
    }
}
