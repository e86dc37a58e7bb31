#![forbid(unsafe_code)]

//! The kilo editor program: command line, logging setup, editor state, and
//! the event loop that ties the terminal core to the renderer.

pub mod cli;
pub mod document;
pub mod editor;
pub mod error;
pub mod logging;
pub mod program;

pub use editor::{EditorState, KeyOutcome};
pub use error::EditorError;
pub use program::{LoopState, Program};

/// Version shown in the welcome banner and by `--version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
