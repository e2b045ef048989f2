//! `Buffer` - a fixed-capacity byte buffer suited to pooling.

use super::Recycle;
use core::fmt;
use std::io;

/// Default capacity of a [`Buffer`], in bytes.
pub const DEFAULT_BUFFER_CAPACITY: usize = 1024;

/// A byte buffer whose storage is allocated once and never grows.
///
/// Writes beyond the capacity are truncated; [`append`](Self::append) reports
/// how many bytes were actually accepted.
#[derive(Clone, PartialEq, Eq)]
pub struct Buffer {
    data: Box<[u8]>,
    len: usize,
}

impl Buffer {
    /// Creates an empty buffer of [`DEFAULT_BUFFER_CAPACITY`] bytes.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUFFER_CAPACITY)
    }

    /// Creates an empty buffer of `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity].into_boxed_slice(),
            len: 0,
        }
    }

    /// Copies as much of `bytes` as fits and returns the number copied.
    pub fn append(&mut self, bytes: &[u8]) -> usize {
        let n = bytes.len().min(self.remaining());
        self.data[self.len..self.len + n].copy_from_slice(&bytes[..n]);
        self.len += n;
        n
    }

    /// The written bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Bytes written since the last reset.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing has been written.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total storage, in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Bytes still available for writing.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity() - self.len
    }

    /// Forgets the written bytes; the storage is kept.
    #[inline]
    pub fn reset(&mut self) {
        self.len = 0;
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Recycle for Buffer {
    #[inline]
    fn recycle(&mut self) {
        self.reset();
    }
}

impl io::Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.append(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .finish()
    }
}
