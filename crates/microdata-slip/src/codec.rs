use bytes::{BufMut, Bytes, BytesMut};

use crate::decoder::DecodeState;
use crate::error::{FrameError, Result};

/// Frame terminator.
pub const END: u8 = 0xC0;

/// Escape byte.
pub const ESC: u8 = 0xDB;

/// Escaped form of [`END`] (follows [`ESC`]).
pub const ESC_END: u8 = 0xDC;

/// Escaped form of [`ESC`] (follows [`ESC`]).
pub const ESC_ESC: u8 = 0xDD;

/// Default maximum decoded payload size: 64 KiB.
pub const DEFAULT_MAX_PAYLOAD: usize = 64 * 1024;

/// Worst-case encoded size of an `n`-byte payload: every byte escaped, plus
/// the terminator.
pub const fn max_encoded_len(n: usize) -> usize {
    n.saturating_mul(2).saturating_add(1)
}

/// Outcome of decoding one frame out of a source slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    /// Source bytes consumed, terminator included.
    pub consumed: usize,
    /// Payload bytes written to the destination.
    pub len: usize,
}

const TERMINATOR: &[u8] = &[END];

fn escaped(byte: &u8) -> &[u8] {
    match *byte {
        END => &[ESC, ESC_END],
        ESC => &[ESC, ESC_ESC],
        _ => std::slice::from_ref(byte),
    }
}

/// Encode `payload` as a SLIP frame, appending it to `dst`.
///
/// Wire format:
/// ```text
/// ┌───────────────────────────────┬──────┐
/// │ Payload, escaped              │ END  │
/// │ 0xC0 -> 0xDB 0xDC             │ 0xC0 │
/// │ 0xDB -> 0xDB 0xDD             │      │
/// └───────────────────────────────┴──────┘
/// ```
///
/// Returns the number of bytes appended, always in
/// `payload.len() + 1 ..= max_encoded_len(payload.len())`.
pub fn encode_frame(payload: &[u8], dst: &mut BytesMut) -> usize {
    let start = dst.len();
    dst.reserve(max_encoded_len(payload.len()));
    for byte in payload {
        dst.put_slice(escaped(byte));
    }
    dst.put_u8(END);
    dst.len() - start
}

/// [`encode_frame`] for payloads within `max_payload`.
///
/// Fails with [`FrameError::PayloadTooLarge`] before touching `dst`.
pub(crate) fn encode_bounded(
    payload: &[u8],
    max_payload: usize,
    dst: &mut BytesMut,
) -> Result<usize> {
    if payload.len() > max_payload {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: max_payload,
        });
    }
    Ok(encode_frame(payload, dst))
}

/// Encode `payload` into a freshly allocated frame.
pub fn slip_encode(payload: &[u8]) -> Bytes {
    let mut dst = BytesMut::new();
    encode_frame(payload, &mut dst);
    dst.freeze()
}

/// Encode `payload` into a fixed destination.
///
/// Fails with [`FrameError::Overflow`] instead of writing past `dst`; size it
/// with [`max_encoded_len`] to guarantee success. Bytes written before the
/// failure are unspecified.
pub fn encode_into(payload: &[u8], dst: &mut [u8]) -> Result<usize> {
    let capacity = dst.len();
    let mut len = 0;
    for chunk in payload.iter().map(escaped).chain(std::iter::once(TERMINATOR)) {
        let end = len + chunk.len();
        if end > capacity {
            return Err(FrameError::Overflow { capacity });
        }
        dst[len..end].copy_from_slice(chunk);
        len = end;
    }
    Ok(len)
}

/// Decode the first frame in `src` into `dst`.
///
/// Decoding stops at the first terminator; bytes after it are left alone.
/// `dst.len()` is the capacity: the byte that would exceed it fails the call
/// with [`FrameError::Overflow`] before anything is written. A source with no
/// terminator fails with [`FrameError::Incomplete`].
pub fn decode_into(src: &[u8], dst: &mut [u8]) -> Result<Decoded> {
    let capacity = dst.len();
    let mut state = DecodeState::Normal;
    let mut len = 0;

    for (idx, &byte) in src.iter().enumerate() {
        let (next, out) = state.advance(byte)?;
        if let Some(out) = out {
            if len == capacity {
                return Err(FrameError::Overflow { capacity });
            }
            dst[len] = out;
            len += 1;
        }
        if next == DecodeState::Finished {
            return Ok(Decoded {
                consumed: idx + 1,
                len,
            });
        }
        state = next;
    }

    Err(FrameError::Incomplete {
        consumed: src.len(),
    })
}

/// Decode the first frame in `buf`, writing the payload over its own start.
///
/// Every output byte consumes at least one input byte, so the write index
/// never passes the read index.
pub fn decode_in_place(buf: &mut [u8]) -> Result<Decoded> {
    let mut state = DecodeState::Normal;
    let mut len = 0;

    for idx in 0..buf.len() {
        let (next, out) = state.advance(buf[idx])?;
        if let Some(out) = out {
            buf[len] = out;
            len += 1;
        }
        if next == DecodeState::Finished {
            return Ok(Decoded {
                consumed: idx + 1,
                len,
            });
        }
        state = next;
    }

    Err(FrameError::Incomplete {
        consumed: buf.len(),
    })
}

/// Decode the first frame in `frame`, allowing at most `capacity` payload bytes.
///
/// An empty payload (`[END]`) decodes to `Ok` with no bytes, distinct from
/// every failure.
pub fn slip_decode(frame: &[u8], capacity: usize) -> Result<Bytes> {
    // The payload is always shorter than its encoding.
    let mut dst = BytesMut::zeroed(capacity.min(frame.len()));
    let decoded = decode_into(frame, &mut dst)?;
    dst.truncate(decoded.len);
    Ok(dst.freeze())
}

/// Configuration for SLIP framing over streams.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum decoded payload size in bytes. Default: 64 KiB.
    pub max_payload_size: usize,
    /// Drop zero-length frames (back-to-back terminators) instead of
    /// returning them. Default: false.
    pub skip_empty_frames: bool,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
            skip_empty_frames: false,
        }
    }
}
