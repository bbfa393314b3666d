//! SLIP framing for byte streams without message boundaries.
//!
//! Every payload is sent as:
//! - the payload bytes, with `0xC0` escaped as `0xDB 0xDC` and `0xDB` as `0xDB 0xDD`
//! - a single `0xC0` terminator
//!
//! No length prefix, no checksum. Decoding is bounds-checked on both sides:
//! it never writes past the destination and never reads past the source, and
//! a missing terminator is reported instead of scanned for.
//!
//! ```
//! use microdata_slip::{slip_decode, slip_encode};
//!
//! let frame = slip_encode(&[0x01, 0xC0, 0x02]);
//! assert_eq!(frame.as_ref(), &[0x01, 0xDB, 0xDC, 0x02, 0xC0]);
//!
//! let payload = slip_decode(&frame, 3)?;
//! assert_eq!(payload.as_ref(), &[0x01, 0xC0, 0x02]);
//! # Ok::<(), microdata_slip::FrameError>(())
//! ```

pub mod codec;
pub mod decoder;
pub mod error;
pub mod reader;
pub mod writer;

#[cfg(feature = "async")]
pub mod async_codec;

pub use codec::{
    decode_in_place, decode_into, encode_frame, encode_into, max_encoded_len, slip_decode,
    slip_encode, Decoded, FrameConfig, DEFAULT_MAX_PAYLOAD, END, ESC, ESC_END, ESC_ESC,
};
pub use decoder::{DecodeState, SlipDecoder};
pub use error::{FrameError, Result};
pub use reader::FrameReader;
pub use writer::FrameWriter;

#[cfg(feature = "async")]
pub use async_codec::SlipCodec;
