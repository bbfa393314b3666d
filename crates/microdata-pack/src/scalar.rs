use crate::error::{PackError, Result};

/// A fixed-width integer with a little-endian wire representation.
///
/// `write_le` and `read_le` operate on a slice of exactly [`Scalar::WIDTH`]
/// bytes and panic on anything shorter; the checked entry points are
/// [`pack`] and [`unpack`].
pub trait Scalar: Copy {
    /// Encoded size in bytes.
    const WIDTH: usize;

    /// Write the value least significant byte first.
    fn write_le(self, dst: &mut [u8]);

    /// Rebuild a value from its least-significant-first bytes.
    fn read_le(src: &[u8]) -> Self;
}

// Byte order is produced with shifts so the result never depends on the
// host's native layout.
macro_rules! impl_unsigned {
    ($($ty:ty => $width:expr),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const WIDTH: usize = $width;

                #[inline]
                fn write_le(self, dst: &mut [u8]) {
                    for (i, byte) in dst[..$width].iter_mut().enumerate() {
                        *byte = ((self >> (8 * i)) & 0xFF) as u8;
                    }
                }

                #[inline]
                fn read_le(src: &[u8]) -> Self {
                    src[..$width]
                        .iter()
                        .enumerate()
                        .fold(0, |acc: $ty, (i, &byte)| acc | (<$ty>::from(byte) << (8 * i)))
                }
            }
        )*
    };
}

// Signed values travel as the bit pattern of the same-width unsigned type;
// casting back assigns into the native signed width, which propagates the
// top byte's sign bit.
macro_rules! impl_signed {
    ($($ty:ty => $unsigned:ty),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const WIDTH: usize = <$unsigned as Scalar>::WIDTH;

                #[inline]
                fn write_le(self, dst: &mut [u8]) {
                    (self as $unsigned).write_le(dst)
                }

                #[inline]
                fn read_le(src: &[u8]) -> Self {
                    <$unsigned>::read_le(src) as $ty
                }
            }
        )*
    };
}

impl_unsigned!(u8 => 1, u16 => 2, u32 => 4);
impl_signed!(i8 => u8, i16 => u16, i32 => u32);

fn span(cursor: usize, width: usize, len: usize) -> Result<usize> {
    match cursor.checked_add(width) {
        Some(end) if end <= len => Ok(end),
        _ => Err(PackError::OutOfBounds { cursor, width, len }),
    }
}

/// Pack `value` into `buf` at `cursor`.
///
/// Returns the position immediately after the written bytes. On error the
/// buffer is left untouched.
pub fn pack<T: Scalar>(buf: &mut [u8], cursor: usize, value: T) -> Result<usize> {
    let end = span(cursor, T::WIDTH, buf.len())?;
    value.write_le(&mut buf[cursor..end]);
    Ok(end)
}

/// Unpack a `T` from `buf` at `cursor`.
///
/// Returns the value and the position immediately after the bytes read.
pub fn unpack<T: Scalar>(buf: &[u8], cursor: usize) -> Result<(T, usize)> {
    let end = span(cursor, T::WIDTH, buf.len())?;
    Ok((T::read_le(&buf[cursor..end]), end))
}

macro_rules! named_ops {
    ($($pack:ident, $unpack:ident => $ty:ty;)*) => {
        $(
            #[doc = concat!("Pack a `", stringify!($ty), "` at `cursor`; see [`pack`].")]
            #[inline]
            pub fn $pack(buf: &mut [u8], cursor: usize, value: $ty) -> Result<usize> {
                pack(buf, cursor, value)
            }

            #[doc = concat!("Unpack a `", stringify!($ty), "` at `cursor`; see [`unpack`].")]
            #[inline]
            pub fn $unpack(buf: &[u8], cursor: usize) -> Result<($ty, usize)> {
                unpack(buf, cursor)
            }
        )*
    };
}

named_ops! {
    pack_u8, unpack_u8 => u8;
    pack_u16, unpack_u16 => u16;
    pack_u32, unpack_u32 => u32;
    pack_i8, unpack_i8 => i8;
    pack_i16, unpack_i16 => i16;
    pack_i32, unpack_i32 => i32;
}
