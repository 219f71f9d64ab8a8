//! Utility types for binary serialization.
//!
//! Provides the ledger's variable-length prefix (`LengthPrefix`) and the
//! `BinaryReader` / `BinaryWriter` cursors used by the binary codec. All
//! multi-byte integers on the ledger wire are big-endian.

use crate::PrimitivesError;

// ---------------------------------------------------------------------------
// LengthPrefix
// ---------------------------------------------------------------------------

/// Largest length encodable with a one-byte prefix.
pub const MAX_SINGLE_BYTE_LENGTH: usize = 192;

/// Largest length encodable with a two-byte prefix.
pub const MAX_DOUBLE_BYTE_LENGTH: usize = 12_480;

/// Largest length encodable at all (three-byte prefix).
pub const MAX_LENGTH_VALUE: usize = 918_744;

/// The variable-length prefix written before blobs, account ids and other
/// variable-length field values.
///
/// | length          | prefix bytes | encoding                                   |
/// |-----------------|--------------|--------------------------------------------|
/// | 0 ..= 192       | 1            | `len`                                      |
/// | 193 ..= 12480   | 2            | `193 + (len-193)/256`, `(len-193) % 256`   |
/// | 12481 ..= 918744| 3            | `241 + (len-12481)/65536`, then 2 bytes    |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthPrefix(pub usize);

impl LengthPrefix {
    /// Decode a length prefix from the start of a byte slice.
    ///
    /// # Returns
    /// A tuple of `(LengthPrefix, bytes_consumed)`, or an error for a
    /// truncated prefix or a first byte outside the valid bands.
    pub fn from_bytes(data: &[u8]) -> Result<(Self, usize), PrimitivesError> {
        let mut reader = BinaryReader::new(data);
        let prefix = reader.read_length_prefix()?;
        Ok((prefix, reader.position()))
    }

    /// Return the wire-format byte length of this prefix.
    ///
    /// # Returns
    /// 1, 2 or 3, or an error if the length exceeds `MAX_LENGTH_VALUE`.
    pub fn length(&self) -> Result<usize, PrimitivesError> {
        match self.0 {
            0..=MAX_SINGLE_BYTE_LENGTH => Ok(1),
            0..=MAX_DOUBLE_BYTE_LENGTH => Ok(2),
            0..=MAX_LENGTH_VALUE => Ok(3),
            n => Err(PrimitivesError::LengthTooLarge(n)),
        }
    }

    /// Encode the prefix into a new byte vector.
    ///
    /// # Returns
    /// A `Vec<u8>` of 1, 2 or 3 bytes, or an error if the length exceeds
    /// `MAX_LENGTH_VALUE`.
    pub fn to_bytes(&self) -> Result<Vec<u8>, PrimitivesError> {
        let len = self.0;
        match self.length()? {
            1 => Ok(vec![len as u8]),
            2 => {
                let v = len - (MAX_SINGLE_BYTE_LENGTH + 1);
                Ok(vec![193 + (v >> 8) as u8, (v & 0xff) as u8])
            }
            _ => {
                let v = len - (MAX_DOUBLE_BYTE_LENGTH + 1);
                Ok(vec![
                    241 + (v >> 16) as u8,
                    ((v >> 8) & 0xff) as u8,
                    (v & 0xff) as u8,
                ])
            }
        }
    }

    /// Return the underlying length value.
    pub fn value(&self) -> usize {
        self.0
    }
}

impl From<usize> for LengthPrefix {
    fn from(v: usize) -> Self {
        LengthPrefix(v)
    }
}

// ---------------------------------------------------------------------------
// BinaryReader
// ---------------------------------------------------------------------------

/// A cursor-based reader for ledger binary data.
///
/// Wraps a byte slice and maintains a read position, providing methods to
/// read big-endian integers and length prefixes. Every read is bounds
/// checked; running past the end is an `UnexpectedEof` error, never a panic.
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BinaryReader<'a> {
    /// Create a new reader over the given byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        BinaryReader { data, pos: 0 }
    }

    /// Read `n` bytes and advance the position.
    ///
    /// # Returns
    /// A byte slice of length `n`, or an error if insufficient data remains.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], PrimitivesError> {
        if n > self.remaining() {
            return Err(PrimitivesError::UnexpectedEof {
                needed: n,
                remaining: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Read exactly `N` bytes into a fixed-size array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], PrimitivesError> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Return the next byte without consuming it.
    pub fn peek_u8(&self) -> Result<u8, PrimitivesError> {
        self.data
            .get(self.pos)
            .copied()
            .ok_or(PrimitivesError::UnexpectedEof { needed: 1, remaining: 0 })
    }

    /// Read a single byte and advance the position.
    pub fn read_u8(&mut self) -> Result<u8, PrimitivesError> {
        let bytes = self.read_bytes(1)?;
        Ok(bytes[0])
    }

    /// Read a big-endian u16 and advance the position by 2 bytes.
    pub fn read_u16_be(&mut self) -> Result<u16, PrimitivesError> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    /// Read a big-endian u32 and advance the position by 4 bytes.
    pub fn read_u32_be(&mut self) -> Result<u32, PrimitivesError> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    /// Read a big-endian u64 and advance the position by 8 bytes.
    pub fn read_u64_be(&mut self) -> Result<u64, PrimitivesError> {
        Ok(u64::from_be_bytes(self.read_array()?))
    }

    /// Read a variable-length prefix and advance the position accordingly.
    ///
    /// # Returns
    /// The decoded `LengthPrefix`, or an error if the prefix is truncated
    /// or its first byte lies outside the three length bands.
    pub fn read_length_prefix(&mut self) -> Result<LengthPrefix, PrimitivesError> {
        let b1 = self.read_u8()? as usize;
        match b1 {
            0..=192 => Ok(LengthPrefix(b1)),
            193..=240 => {
                let b2 = self.read_u8()? as usize;
                Ok(LengthPrefix(193 + (b1 - 193) * 256 + b2))
            }
            241..=254 => {
                let b2 = self.read_u8()? as usize;
                let b3 = self.read_u8()? as usize;
                let len = MAX_DOUBLE_BYTE_LENGTH + 1 + (b1 - 241) * 65_536 + b2 * 256 + b3;
                if len > MAX_LENGTH_VALUE {
                    return Err(PrimitivesError::LengthTooLarge(len));
                }
                Ok(LengthPrefix(len))
            }
            _ => Err(PrimitivesError::InvalidLengthPrefix(b1 as u8)),
        }
    }

    /// Read a length prefix followed by that many bytes.
    pub fn read_variable_length(&mut self) -> Result<&'a [u8], PrimitivesError> {
        let len = self.read_length_prefix()?;
        self.read_bytes(len.value())
    }

    /// Return the number of bytes remaining.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Return the number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Check whether every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}

// ---------------------------------------------------------------------------
// BinaryWriter
// ---------------------------------------------------------------------------

/// A buffer-based writer for ledger binary data.
///
/// Wraps a `Vec<u8>` and provides methods to append big-endian integers and
/// length-prefixed byte strings.
#[derive(Debug, Clone, Default)]
pub struct BinaryWriter {
    buf: Vec<u8>,
}

impl BinaryWriter {
    /// Create a new empty writer.
    pub fn new() -> Self {
        BinaryWriter { buf: Vec::new() }
    }

    /// Create a new writer with a pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        BinaryWriter { buf: Vec::with_capacity(capacity) }
    }

    /// Append raw bytes to the buffer.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Append a single byte to the buffer.
    pub fn write_u8(&mut self, val: u8) {
        self.buf.push(val);
    }

    /// Append a big-endian u16 (2 bytes) to the buffer.
    pub fn write_u16_be(&mut self, val: u16) {
        self.buf.extend_from_slice(&val.to_be_bytes());
    }

    /// Append a big-endian u32 (4 bytes) to the buffer.
    pub fn write_u32_be(&mut self, val: u32) {
        self.buf.extend_from_slice(&val.to_be_bytes());
    }

    /// Append a big-endian u64 (8 bytes) to the buffer.
    pub fn write_u64_be(&mut self, val: u64) {
        self.buf.extend_from_slice(&val.to_be_bytes());
    }

    /// Append a length prefix.
    ///
    /// # Returns
    /// An error if the length exceeds `MAX_LENGTH_VALUE`.
    pub fn write_length_prefix(&mut self, prefix: LengthPrefix) -> Result<(), PrimitivesError> {
        let bytes = prefix.to_bytes()?;
        self.buf.extend_from_slice(&bytes);
        Ok(())
    }

    /// Append a length prefix followed by the bytes themselves.
    pub fn write_variable_length(&mut self, bytes: &[u8]) -> Result<(), PrimitivesError> {
        self.write_length_prefix(LengthPrefix(bytes.len()))?;
        self.write_bytes(bytes);
        Ok(())
    }

    /// Consume the writer and return the accumulated bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Return a reference to the current buffer contents.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Return the current length of the buffer.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}
