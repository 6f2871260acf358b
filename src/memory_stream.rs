//! Virtual stream over a fixed-size memory buffer.
//!
//! Codec engines are written against a file-stream contract: read, write,
//! skip, and seek callbacks plus a total-length hint. `MemoryStream` satisfies
//! that contract over an owned byte buffer so a whole encode or decode can run
//! memory-to-memory.

/// A cursor over an owned, fixed-length byte buffer.
///
/// The cursor never moves outside `0..=len`; writes never touch memory beyond
/// the buffer. The buffer is exclusively owned by the stream for the lifetime
/// of a pipeline stage and handed back via [`MemoryStream::into_written`] once
/// encoding finishes.
pub struct MemoryStream {
    buffer: Vec<u8>,
    position: usize,
}

impl MemoryStream {
    /// Wraps an existing buffer; the cursor starts at 0.
    pub fn new(buffer: Vec<u8>) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    /// Creates a stream over a zero-filled buffer of `len` bytes.
    pub fn zeroed(len: usize) -> Self {
        Self::new(vec![0u8; len])
    }

    /// Total buffer length; also serves as the stream-length hint handed to
    /// the engine at stream-creation time.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    /// Reads up to `dest.len()` bytes at the cursor.
    ///
    /// Returns `None` when the cursor is already at the end of the buffer, so
    /// callers can tell "no more data" apart from a read of zero requested
    /// mid-buffer (which returns `Some(0)`).
    pub fn read(&mut self, dest: &mut [u8]) -> Option<usize> {
        if self.position >= self.buffer.len() {
            return None;
        }
        let count = dest.len().min(self.buffer.len() - self.position);
        dest[..count].copy_from_slice(&self.buffer[self.position..self.position + count]);
        self.position += count;
        Some(count)
    }

    /// Writes `src` at the cursor, short-writing if capacity runs out.
    ///
    /// Returns `None` when the cursor is already at capacity before writing;
    /// otherwise the number of bytes actually copied.
    pub fn write(&mut self, src: &[u8]) -> Option<usize> {
        if self.position >= self.buffer.len() {
            return None;
        }
        let count = src.len().min(self.buffer.len() - self.position);
        self.buffer[self.position..self.position + count].copy_from_slice(&src[..count]);
        self.position += count;
        Some(count)
    }

    /// Advances the cursor by `count`, clamped to the buffer bounds.
    ///
    /// Always acknowledges the requested `count`, even when the move was
    /// clamped: the wrapped engine treats skip as advisory, and reporting the
    /// clamped distance breaks its box-parsing retry logic.
    pub fn skip(&mut self, count: i64) -> i64 {
        let target = self.position as i64 + count;
        self.position = target.clamp(0, self.buffer.len() as i64) as usize;
        count
    }

    /// Absolute positioning. Fails, leaving the cursor unchanged, if `pos`
    /// lies beyond the buffer; seeking to exactly `len` ("at end") is legal.
    pub fn seek(&mut self, pos: u64) -> bool {
        if pos > self.buffer.len() as u64 {
            return false;
        }
        self.position = pos as usize;
        true
    }

    /// Consumes the stream, returning the bytes written so far: the buffer
    /// truncated to the final cursor position.
    pub fn into_written(mut self) -> Vec<u8> {
        self.buffer.truncate(self.position);
        self.buffer
    }
}
