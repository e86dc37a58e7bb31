#![forbid(unsafe_code)]

//! Frame append buffer.
//!
//! A frame is built up in memory and handed to the terminal with a single
//! `write_all`, so a half-drawn frame is never visible. The buffer lives
//! for exactly one refresh: [`AppendBuffer::flush_to`] consumes it.
//!
//! Growth failures do not abort rendering. An append that cannot reserve
//! memory is dropped and the frame goes out incomplete.

use std::io::{self, Write};

/// Append-only byte buffer for one frame.
#[derive(Debug, Default)]
pub struct AppendBuffer {
    bytes: Vec<u8>,
    dropped: usize,
}

impl AppendBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bytes: Vec::new(),
            dropped: 0,
        }
    }

    /// Create an empty buffer with room for `capacity` bytes.
    ///
    /// A failed reservation leaves the buffer empty and growing on demand.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut buf = Self::new();
        let _ = buf.bytes.try_reserve(capacity);
        buf
    }

    /// Copy `bytes` onto the end of the buffer.
    ///
    /// If the buffer cannot grow, the bytes are discarded.
    pub fn append(&mut self, bytes: &[u8]) {
        if self.bytes.try_reserve(bytes.len()).is_err() {
            self.dropped = self.dropped.saturating_add(bytes.len());
            #[cfg(feature = "tracing")]
            tracing::trace!(len = bytes.len(), "append dropped: allocation failed");
            return;
        }
        self.bytes.extend_from_slice(bytes);
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Bytes discarded because the buffer could not grow.
    #[inline]
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Take the accumulated bytes without writing them.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Write the whole buffer to `w` in one `write_all`, then flush `w`.
    ///
    /// The buffer is consumed whether or not the write succeeds.
    ///
    /// # Errors
    ///
    /// Returns the write or flush error.
    pub fn flush_to<W: Write>(self, w: &mut W) -> io::Result<()> {
        #[cfg(feature = "tracing")]
        tracing::trace!(bytes = self.bytes.len(), "flush frame");
        w.write_all(&self.bytes)?;
        w.flush()
    }
}

impl Write for AppendBuffer {
    /// Always reports the full length as written, even when the bytes were
    /// dropped for lack of memory.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
