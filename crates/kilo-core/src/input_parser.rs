#![forbid(unsafe_code)]

//! Key decoder.
//!
//! Turns the raw byte stream of a terminal in raw mode into [`Key`] values.
//!
//! # Design
//!
//! The decoder is a request/response protocol: each call to
//! [`InputDecoder::read_key`] consumes exactly the bytes of one key and
//! nothing more. There is no lookahead buffer, so no byte is ever held back
//! between calls.
//!
//! Reads are expected to be bounded by the terminal's read timeout (VMIN 0,
//! VTIME > 0). A read that yields no byte is not an error:
//!
//! - while waiting for the first byte, it is retried;
//! - while waiting for the two bytes after `ESC`, it ends the sequence and
//!   the key resolves to [`Key::UnresolvedEscape`].
//!
//! # Recognized sequences
//!
//! | Bytes | Key |
//! |-------|-----|
//! | `ESC [ A` | [`Key::ArrowUp`] |
//! | `ESC [ B` | [`Key::ArrowDown`] |
//! | `ESC [ C` | [`Key::ArrowRight`] |
//! | `ESC [ D` | [`Key::ArrowLeft`] |
//! | anything else after `ESC` | [`Key::UnresolvedEscape`] |

use std::io::{self, Read};

use crate::event::{ESC, Key};

/// Resolve the two bytes that followed an `ESC`.
///
/// `None` means the byte did not arrive within the read timeout.
#[must_use]
pub const fn resolve_escape(first: Option<u8>, second: Option<u8>) -> Key {
    match (first, second) {
        (Some(b'['), Some(b'A')) => Key::ArrowUp,
        (Some(b'['), Some(b'B')) => Key::ArrowDown,
        (Some(b'['), Some(b'C')) => Key::ArrowRight,
        (Some(b'['), Some(b'D')) => Key::ArrowLeft,
        _ => Key::UnresolvedEscape,
    }
}

/// Decodes keys from a byte source, one key per call.
#[derive(Debug)]
pub struct InputDecoder<R> {
    input: R,
}

impl<R: Read> InputDecoder<R> {
    /// Wrap a byte source.
    pub fn new(input: R) -> Self {
        Self { input }
    }

    /// Read the next key, retrying while the terminal reports no data.
    ///
    /// # Errors
    ///
    /// Returns any read error other than "no data yet" (`WouldBlock`,
    /// `Interrupted`, or a zero-length read).
    pub fn read_key(&mut self) -> io::Result<Key> {
        loop {
            if let Some(key) = self.try_read_key()? {
                return Ok(key);
            }
        }
    }

    /// Read one key if a byte arrives within a single read timeout.
    ///
    /// Returns `Ok(None)` when the first read yields nothing.
    ///
    /// # Errors
    ///
    /// Same as [`read_key`](Self::read_key).
    pub fn try_read_key(&mut self) -> io::Result<Option<Key>> {
        let Some(byte) = self.read_byte()? else {
            return Ok(None);
        };
        if byte != ESC {
            return Ok(Some(Key::Char(byte)));
        }

        let first = self.read_byte()?;
        if first.is_none() {
            crate::trace!("lone escape");
            return Ok(Some(Key::UnresolvedEscape));
        }
        let second = self.read_byte()?;
        let key = resolve_escape(first, second);
        if key == Key::UnresolvedEscape {
            crate::trace!(?first, ?second, "unmapped escape sequence");
        }
        Ok(Some(key))
    }

    /// Get a reference to the underlying byte source.
    pub fn get_ref(&self) -> &R {
        &self.input
    }

    /// Consume the decoder and return the byte source.
    pub fn into_inner(self) -> R {
        self.input
    }

    /// Single bounded read of one byte. `None` when nothing arrived.
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut buf = [0u8; 1];
        match self.input.read(&mut buf) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(buf[0])),
            Err(ref e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                ) =>
            {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
