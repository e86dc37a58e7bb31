#![forbid(unsafe_code)]

//! Render kernel: ANSI byte generation, the frame append buffer, and the
//! frame composer.
//!
//! Everything here is pure byte generation. Nothing in this crate touches
//! the terminal except [`append_buffer::AppendBuffer::flush_to`], which
//! writes to whatever `Write` it is handed.

pub mod ansi;
pub mod append_buffer;
pub mod frame;

pub use append_buffer::AppendBuffer;
pub use frame::{FrameRenderer, WELCOME_PREFIX};
