//! Cursor wrappers for packing a record field by field.

use crate::error::Result;
use crate::scalar::{pack, unpack, Scalar};

/// Write cursor over a caller-owned buffer.
///
/// ```
/// use microdata_pack::{Packer, Unpacker};
///
/// let mut buf = [0u8; 8];
/// let mut packer = Packer::new(&mut buf);
/// packer.put(42u8)?.put(55u8)?.put(24000i16)?.put(456_234_234u32)?;
/// assert_eq!(packer.position(), 8);
///
/// let mut unpacker = Unpacker::new(&buf);
/// let val1: u8 = unpacker.get()?;
/// let val2: u8 = unpacker.get()?;
/// let val3: i16 = unpacker.get()?;
/// let val4: u32 = unpacker.get()?;
/// assert_eq!((val1, val2, val3, val4), (42, 55, 24000, 456_234_234));
/// # Ok::<(), microdata_pack::PackError>(())
/// ```
#[derive(Debug)]
pub struct Packer<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> Packer<'a> {
    /// Start packing at the beginning of `buf`.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Append `value`; the cursor only advances on success.
    pub fn put<T: Scalar>(&mut self, value: T) -> Result<&mut Self> {
        self.pos = pack(self.buf, self.pos, value)?;
        Ok(self)
    }

    /// Next free position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes still available for writing.
    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// The bytes packed so far.
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.pos]
    }

    /// Release the buffer, returning the packed prefix.
    pub fn into_inner(self) -> &'a mut [u8] {
        let Self { buf, pos } = self;
        &mut buf[..pos]
    }
}

/// Read cursor over packed bytes.
#[derive(Debug, Clone)]
pub struct Unpacker<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Unpacker<'a> {
    /// Start reading at the beginning of `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Read the next value; the cursor only advances on success.
    pub fn get<T: Scalar>(&mut self) -> Result<T> {
        let (value, next) = unpack(self.buf, self.pos)?;
        self.pos = next;
        Ok(value)
    }

    /// Next unread position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// True once every byte has been read.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The unread tail.
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }
}
