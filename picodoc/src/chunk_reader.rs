// SPDX-License-Identifier: Apache-2.0

//! A convenience Reader implementation for common use cases.
//!
//! This module provides [`ChunkReader`], a [`Reader`] over an in-memory
//! byte slice. It can hand out the whole slice at once or simulate a
//! stream by returning fixed-size chunks, which is how the streaming
//! decoders are exercised.
//!
//! For real I/O, implement [`Reader`] for your input source (a UART, a
//! socket, a ring buffer) or, with the `std` feature, wrap any
//! `std::io::Read` in [`IoReader`](crate::IoReader).
//!
//! # Examples
//!
//! ```rust
//! use picodoc::{decode_json_reader, ChunkReader, DecodeOptions, Document};
//!
//! let json = br#"{"name": "Alice", "age": 30}"#;
//! let mut doc = Document::new();
//! // three bytes per read, as a slow serial line would deliver them
//! decode_json_reader(&mut doc, ChunkReader::new(json, 3), DecodeOptions::new()).unwrap();
//! assert_eq!(doc.root().member("name").as_str(), Some("Alice"));
//! ```

use crate::io::Reader;

/// A [`Reader`] that reads from a byte slice, optionally in fixed-size chunks.
///
/// 1.  **Full Slice Reading**: [`ChunkReader::full_slice()`] returns as much
///     of the slice as each `read()` buffer can hold.
///
/// 2.  **Chunked Reading**: [`ChunkReader::new()`] caps each `read()` call at
///     a maximum chunk size, to mimic packets or short device reads.
#[derive(Debug)]
pub struct ChunkReader<'a> {
    data: &'a [u8],
    pos: usize,
    chunk_size: usize,
}

impl<'a> ChunkReader<'a> {
    /// Create a new chunked reader from a byte slice.
    ///
    /// Each call to `read()` will return at most `chunk_size` bytes (at
    /// least 1), even if more data is available and the buffer can hold more.
    pub fn new(data: &'a [u8], chunk_size: usize) -> Self {
        Self {
            data,
            pos: 0,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Create a new reader that consumes the entire byte slice at once.
    pub fn full_slice(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            chunk_size: usize::MAX,
        }
    }

    /// Bytes not handed out yet.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }
}

impl Reader for ChunkReader<'_> {
    type Error = ();

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let remaining = self.remaining();
        let to_copy = remaining.len().min(buf.len()).min(self.chunk_size);
        buf[..to_copy].copy_from_slice(&remaining[..to_copy]);
        self.pos += to_copy;
        Ok(to_copy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_slice_reader_basic() {
        let data = b"hello world";
        let mut reader = ChunkReader::full_slice(data);

        let mut buf = [0u8; 5];
        assert_eq!(reader.read(&mut buf).unwrap(), 5);
        assert_eq!(&buf, b"hello");

        let mut buf = [0u8; 10];
        assert_eq!(reader.read(&mut buf).unwrap(), 6);
        assert_eq!(&buf[..6], b" world");

        // EOF
        assert_eq!(reader.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_full_slice_reader_empty() {
        let mut reader = ChunkReader::full_slice(b"");
        let mut buf = [0u8; 10];
        assert_eq!(reader.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_chunk_reader_basic() {
        let data = b"hello world";
        let mut reader = ChunkReader::new(data, 3);

        let mut buf = [0u8; 10];
        assert_eq!(reader.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], b"hel");
        assert_eq!(reader.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], b"lo ");
        assert_eq!(reader.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], b"wor");

        // limited by remaining data (2 < chunk_size)
        assert_eq!(reader.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], b"ld");
        assert_eq!(reader.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_chunk_reader_small_buffer() {
        let mut reader = ChunkReader::new(b"hello", 10);

        // limited by buffer size, not chunk_size
        let mut buf = [0u8; 3];
        assert_eq!(reader.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf, b"hel");
        assert_eq!(reader.remaining(), b"lo");
    }

    #[test]
    fn test_chunk_reader_zero_chunk_size() {
        // clamped to 1
        let mut reader = ChunkReader::new(b"hello", 0);

        let mut buf = [0u8; 10];
        assert_eq!(reader.read(&mut buf).unwrap(), 1);
        assert_eq!(buf[0], b'h');
    }
}
