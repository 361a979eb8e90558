// SPDX-License-Identifier: Apache-2.0

//! Byte sinks for the encoders and byte sources for the decoders.

use alloc::vec::Vec;

/// Destination of encoded bytes.
///
/// A sink may accept fewer bytes than offered (a full buffer, a failed
/// allocation); encoders then keep going and report the bytes actually
/// written.
pub trait Writer {
    /// Writes as much of `bytes` as the sink accepts and returns that count.
    fn write(&mut self, bytes: &[u8]) -> usize;

    fn write_byte(&mut self, byte: u8) -> usize {
        self.write(&[byte])
    }
}

impl<W: Writer + ?Sized> Writer for &mut W {
    fn write(&mut self, bytes: &[u8]) -> usize {
        (**self).write(bytes)
    }
}

impl Writer for Vec<u8> {
    fn write(&mut self, bytes: &[u8]) -> usize {
        if self.try_reserve(bytes.len()).is_err() {
            return 0;
        }
        self.extend_from_slice(bytes);
        bytes.len()
    }
}

/// A [`Writer`] over a caller buffer that silently truncates when full.
#[derive(Debug)]
pub struct SliceWriter<'a> {
    buffer: &'a mut [u8],
    len: usize,
}

impl<'a> SliceWriter<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self { buffer, len: 0 }
    }

    /// The bytes written so far.
    pub fn written(&self) -> &[u8] {
        &self.buffer[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Writer for SliceWriter<'_> {
    fn write(&mut self, bytes: &[u8]) -> usize {
        let available = self.buffer.len() - self.len;
        let n = bytes.len().min(available);
        self.buffer[self.len..self.len + n].copy_from_slice(&bytes[..n]);
        self.len += n;
        n
    }
}

/// A [`Writer`] that only counts, used to measure encoded sizes.
#[derive(Debug, Default, Clone, Copy)]
pub struct CountingWriter {
    count: usize,
}

impl CountingWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl Writer for CountingWriter {
    fn write(&mut self, bytes: &[u8]) -> usize {
        self.count += bytes.len();
        bytes.len()
    }
}

/// Adapts a [`std::io::Write`] into a [`Writer`].
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoWriter<W: std::io::Write>(pub W);

#[cfg(feature = "std")]
impl<W: std::io::Write> Writer for IoWriter<W> {
    fn write(&mut self, bytes: &[u8]) -> usize {
        let mut written = 0;
        while written < bytes.len() {
            match self.0.write(&bytes[written..]) {
                Ok(0) => break,
                Ok(n) => written += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }
        written
    }
}

/// Trait for input sources that can feed a decoder incrementally.
pub trait Reader {
    /// The error type returned by read operations
    type Error;

    /// Read data into the provided buffer.
    /// Returns the number of bytes read, or an error.
    ///
    /// # Contract
    /// - A return value of 0 **MUST** indicate true end of stream
    /// - Implementations **MUST NOT** return 0 unless no more data will ever be available
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

impl<R: Reader + ?Sized> Reader for &mut R {
    type Error = R::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).read(buf)
    }
}

/// Adapts a [`std::io::Read`] into a [`Reader`].
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoReader<R: std::io::Read>(pub R);

#[cfg(feature = "std")]
impl<R: std::io::Read> Reader for IoReader<R> {
    type Error = std::io::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        loop {
            match self.0.read(buf) {
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                other => return other,
            }
        }
    }
}

/// Byte-at-a-time input as the decoders consume it.
pub(crate) trait Source {
    /// Next byte, `None` at end of input.
    fn read_byte(&mut self) -> Option<u8>;

    /// Fills `buf` as far as the input allows and returns the count; short
    /// only at end of input.
    fn read_bytes(&mut self, buf: &mut [u8]) -> usize {
        for (n, slot) in buf.iter_mut().enumerate() {
            match self.read_byte() {
                Some(byte) => *slot = byte,
                None => return n,
            }
        }
        buf.len()
    }

    /// True when the input ended because the underlying reader failed.
    fn failed(&self) -> bool {
        false
    }
}

pub(crate) struct SliceSource<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }
}

impl Source for SliceSource<'_> {
    fn read_byte(&mut self) -> Option<u8> {
        let byte = *self.input.get(self.pos)?;
        self.pos += 1;
        Some(byte)
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> usize {
        let rest = &self.input[self.pos..];
        let n = rest.len().min(buf.len());
        buf[..n].copy_from_slice(&rest[..n]);
        self.pos += n;
        n
    }
}

const READER_BUFFER_LEN: usize = 64;

/// Buffers a [`Reader`] into a [`Source`]; a read error ends the input.
pub(crate) struct ReaderSource<R: Reader> {
    reader: R,
    buffer: [u8; READER_BUFFER_LEN],
    start: usize,
    end: usize,
    finished: bool,
    failed: bool,
}

impl<R: Reader> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: [0; READER_BUFFER_LEN],
            start: 0,
            end: 0,
            finished: false,
            failed: false,
        }
    }

    fn fill(&mut self) -> bool {
        if self.finished {
            return false;
        }
        match self.reader.read(&mut self.buffer) {
            Ok(0) => {
                self.finished = true;
                false
            }
            Ok(n) => {
                self.start = 0;
                self.end = n.min(READER_BUFFER_LEN);
                true
            }
            Err(_) => {
                self.finished = true;
                self.failed = true;
                false
            }
        }
    }
}

impl<R: Reader> Source for ReaderSource<R> {
    fn read_byte(&mut self) -> Option<u8> {
        if self.start == self.end && !self.fill() {
            return None;
        }
        let byte = self.buffer[self.start];
        self.start += 1;
        Some(byte)
    }

    fn failed(&self) -> bool {
        self.failed
    }
}
