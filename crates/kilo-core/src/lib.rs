#![forbid(unsafe_code)]

//! Core: terminal lifecycle, window geometry, key decoding, and the editor's
//! cursor and row types.

pub mod cursor;
pub mod event;
pub mod geometry;
pub mod input_parser;
pub mod logging;
pub mod row;
#[cfg(unix)]
pub mod terminal_session;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, error, info, info_span, trace, warn};
