//! Byte sink and cursor primitives used by the option codecs.
//!
//! Encoding appends to a [`ByteSink`]; decoding consumes from a [`Reader`].
//! Both fail with [`Error::BufferTooShort`] instead of panicking when the
//! underlying buffer runs out.

use crate::error::Error;
use alloc::vec::Vec;
use byteorder::{ByteOrder, NetworkEndian};

/// Result type alias using the crate's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Destination for encoded bytes.
pub trait ByteSink {
    /// Append raw bytes.
    ///
    /// # Errors
    /// Returns `Error::BufferTooShort` if the sink cannot hold all of `bytes`.
    /// Nothing is written in that case.
    fn put_slice(&mut self, bytes: &[u8]) -> Result<()>;

    /// Append a single byte.
    fn put_u8(&mut self, value: u8) -> Result<()> {
        self.put_slice(&[value])
    }

    /// Append a 16-bit value in network byte order.
    fn put_u16(&mut self, value: u16) -> Result<()> {
        let mut bytes = [0u8; 2];
        NetworkEndian::write_u16(&mut bytes, value);
        self.put_slice(&bytes)
    }
}

impl ByteSink for Vec<u8> {
    fn put_slice(&mut self, bytes: &[u8]) -> Result<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

/// Fixed-capacity sink writing into a caller-provided buffer.
///
/// # Example
/// ```
/// use someip_sd_config::wire::{ByteSink, SliceSink};
///
/// let mut buf = [0u8; 3];
/// let mut sink = SliceSink::new(&mut buf);
/// sink.put_u16(0x0102).unwrap();
/// assert!(sink.put_u16(0x0304).is_err());
/// assert_eq!(sink.written(), &[0x01, 0x02]);
/// ```
#[derive(Debug)]
pub struct SliceSink<'a> {
    buffer: &'a mut [u8],
    pos: usize,
}

impl<'a> SliceSink<'a> {
    /// Create a sink that writes from the start of `buffer`.
    pub fn new(buffer: &'a mut [u8]) -> Self {
        SliceSink { buffer, pos: 0 }
    }

    /// Number of bytes written so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes still available.
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.pos
    }

    /// The written prefix of the buffer.
    pub fn written(&self) -> &[u8] {
        &self.buffer[..self.pos]
    }
}

impl ByteSink for SliceSink<'_> {
    fn put_slice(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() > self.remaining() {
            return Err(Error::BufferTooShort);
        }
        self.buffer[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
        Ok(())
    }
}

/// Forward-only cursor over a received buffer.
///
/// Reads never go past the end of the buffer; a short read leaves the
/// cursor where it was.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Create a cursor positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Reader { data, pos: 0 }
    }

    /// Current offset from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes not consumed yet.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Whether all bytes were consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Consume exactly `len` bytes.
    ///
    /// # Errors
    /// Returns `Error::BufferTooShort` if fewer than `len` bytes remain.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(Error::BufferTooShort);
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }
}
