//! Resumable SLIP decoder.
//!
//! The byte-level state machine lives in [`DecodeState::advance`] and is
//! shared by the one-shot slice decoders in [`crate::codec`] and by
//! [`SlipDecoder`], which keeps its state between deliveries so a frame split
//! across several reads is never rescanned.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::{debug, trace};

use crate::codec::{DEFAULT_MAX_PAYLOAD, END, ESC, ESC_END, ESC_ESC};
use crate::error::{FrameError, Result};

/// Position of the decoder within the escape grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeState {
    /// Not inside an escape sequence.
    #[default]
    Normal,
    /// The previous byte was [`ESC`].
    InEscape,
    /// A terminator was consumed; the frame is complete.
    Finished,
    /// Malformed input or destination overflow was detected.
    Error,
}

impl DecodeState {
    /// Consume one byte, returning the next state and the payload byte to
    /// emit, if any.
    ///
    /// `Finished` and `Error` end the current frame; the byte after either
    /// one opens the next frame, so it is handled as from `Normal`.
    pub fn advance(self, byte: u8) -> Result<(DecodeState, Option<u8>)> {
        match self {
            DecodeState::InEscape => match byte {
                ESC_END => Ok((DecodeState::Normal, Some(END))),
                ESC_ESC => Ok((DecodeState::Normal, Some(ESC))),
                _ => Err(FrameError::InvalidEscape { byte }),
            },
            DecodeState::Normal | DecodeState::Finished | DecodeState::Error => match byte {
                ESC => Ok((DecodeState::InEscape, None)),
                END => Ok((DecodeState::Finished, None)),
                _ => Ok((DecodeState::Normal, Some(byte))),
            },
        }
    }
}

/// Incremental SLIP decoder over a byte stream.
///
/// Feed it whatever bytes have arrived; it returns each payload as soon as
/// its terminator is seen. After an error, bytes up to and including the next
/// terminator are discarded before decoding resumes.
#[derive(Debug)]
pub struct SlipDecoder {
    state: DecodeState,
    frame: BytesMut,
    consumed: usize,
    max_payload: usize,
}

impl Default for SlipDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SlipDecoder {
    /// Create a decoder with the default payload limit.
    pub fn new() -> Self {
        Self::with_max_payload(DEFAULT_MAX_PAYLOAD)
    }

    /// Create a decoder that rejects payloads longer than `max_payload`.
    pub fn with_max_payload(max_payload: usize) -> Self {
        Self {
            state: DecodeState::Normal,
            frame: BytesMut::new(),
            consumed: 0,
            max_payload,
        }
    }

    /// Decode from `src`, consuming input up to and including a terminator.
    ///
    /// Returns `Ok(None)` once `src` is drained without completing a frame;
    /// the partial frame is kept for the next call. On error the offending
    /// byte has been consumed.
    pub fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>> {
        if self.state == DecodeState::Error && !self.resync(src) {
            return Ok(None);
        }

        let mut idx = 0;
        while idx < src.len() {
            let byte = src[idx];
            idx += 1;
            self.consumed += 1;

            let (next, out) = match self.state.advance(byte) {
                Ok(step) => step,
                Err(err) => {
                    src.advance(idx);
                    return Err(self.fail(err, byte));
                }
            };

            if let Some(out) = out {
                if self.frame.len() >= self.max_payload {
                    src.advance(idx);
                    let err = FrameError::Overflow {
                        capacity: self.max_payload,
                    };
                    return Err(self.fail(err, byte));
                }
                self.frame.put_u8(out);
            }

            if next == DecodeState::Finished {
                src.advance(idx);
                trace!(
                    len = self.frame.len(),
                    consumed = self.consumed,
                    "decoded frame"
                );
                self.state = DecodeState::Normal;
                self.consumed = 0;
                return Ok(Some(self.frame.split().freeze()));
            }
            self.state = next;
        }

        src.advance(idx);
        Ok(None)
    }

    /// Current state-machine state.
    pub fn state(&self) -> DecodeState {
        self.state
    }

    /// Payload bytes decoded so far for the frame in progress.
    pub fn buffered(&self) -> usize {
        self.frame.len()
    }

    /// Raw bytes consumed so far for the frame in progress.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// True when no partial frame is pending.
    pub fn is_idle(&self) -> bool {
        self.state == DecodeState::Normal && self.consumed == 0
    }

    /// Maximum payload size accepted.
    pub fn max_payload(&self) -> usize {
        self.max_payload
    }

    /// Update the maximum payload size for subsequent bytes.
    pub fn set_max_payload(&mut self, max_payload: usize) {
        self.max_payload = max_payload;
    }

    /// Close the decoder at end of input.
    ///
    /// Returns `Incomplete` when a frame was cut short. A frame already
    /// rejected while resynchronising is not reported again.
    pub fn finish(&mut self) -> Result<()> {
        let pending = match self.state {
            DecodeState::Error => None,
            _ if self.consumed == 0 => None,
            _ => Some(self.consumed),
        };
        self.reset();
        match pending {
            Some(consumed) => Err(FrameError::Incomplete { consumed }),
            None => Ok(()),
        }
    }

    /// Drop any partial frame and return to `Normal`.
    pub fn reset(&mut self) {
        self.state = DecodeState::Normal;
        self.frame.clear();
        self.consumed = 0;
    }

    fn fail(&mut self, err: FrameError, byte: u8) -> FrameError {
        debug!(error = %err, consumed = self.consumed, "rejecting frame");
        self.frame.clear();
        self.consumed = 0;
        // A terminator that triggered the error already closed the frame.
        self.state = if byte == END {
            DecodeState::Normal
        } else {
            DecodeState::Error
        };
        err
    }

    fn resync(&mut self, src: &mut BytesMut) -> bool {
        match src.iter().position(|&b| b == END) {
            Some(at) => {
                src.advance(at + 1);
                debug!(discarded = at + 1, "resynchronised on frame terminator");
                self.state = DecodeState::Normal;
                true
            }
            None => {
                trace!(discarded = src.len(), "discarding bytes while resynchronising");
                src.clear();
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode_frame;

    fn wire(payloads: &[&[u8]]) -> BytesMut {
        let mut buf = BytesMut::new();
        for payload in payloads {
            encode_frame(payload, &mut buf);
        }
        buf
    }

    #[test]
    fn transitions_from_normal() {
        let s = DecodeState::Normal;
        assert_eq!(s.advance(ESC).unwrap(), (DecodeState::InEscape, None));
        assert_eq!(s.advance(END).unwrap(), (DecodeState::Finished, None));
        assert_eq!(s.advance(0x42).unwrap(), (DecodeState::Normal, Some(0x42)));
        assert_eq!(
            s.advance(ESC_END).unwrap(),
            (DecodeState::Normal, Some(ESC_END))
        );
    }

    #[test]
    fn transitions_from_escape() {
        let s = DecodeState::InEscape;
        assert_eq!(s.advance(ESC_END).unwrap(), (DecodeState::Normal, Some(END)));
        assert_eq!(s.advance(ESC_ESC).unwrap(), (DecodeState::Normal, Some(ESC)));
        assert!(matches!(
            s.advance(0x00),
            Err(FrameError::InvalidEscape { byte: 0x00 })
        ));
        assert!(matches!(
            s.advance(END),
            Err(FrameError::InvalidEscape { byte: END })
        ));
    }

    #[test]
    fn decodes_back_to_back_frames() {
        let mut src = wire(&[b"one", &[END, ESC], b""]);
        let mut decoder = SlipDecoder::new();

        assert_eq!(decoder.decode(&mut src).unwrap().unwrap().as_ref(), b"one");
        assert_eq!(
            decoder.decode(&mut src).unwrap().unwrap().as_ref(),
            &[END, ESC]
        );
        assert!(decoder.decode(&mut src).unwrap().unwrap().is_empty());
        assert!(decoder.decode(&mut src).unwrap().is_none());
        assert!(src.is_empty());
        assert!(decoder.is_idle());
    }

    #[test]
    fn resumes_across_deliveries() {
        let full = wire(&[&[0x01, END, 0x02]]);
        let mut decoder = SlipDecoder::new();

        // Split between ESC and ESC_END.
        let mut first = BytesMut::from(&full[..2]);
        assert!(decoder.decode(&mut first).unwrap().is_none());
        assert!(first.is_empty());
        assert_eq!(decoder.state(), DecodeState::InEscape);
        assert_eq!(decoder.buffered(), 1);
        assert_eq!(decoder.consumed(), 2);

        let mut second = BytesMut::from(&full[2..]);
        let frame = decoder.decode(&mut second).unwrap().unwrap();
        assert_eq!(frame.as_ref(), &[0x01, END, 0x02]);
        assert!(decoder.is_idle());
    }

    #[test]
    fn byte_at_a_time() {
        let full = wire(&[&[ESC, ESC, END, 0x7F]]);
        let mut decoder = SlipDecoder::new();
        let mut frames = Vec::new();

        for &byte in full.iter() {
            let mut one = BytesMut::from(&[byte][..]);
            if let Some(frame) = decoder.decode(&mut one).unwrap() {
                frames.push(frame);
            }
        }

        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].as_ref(), &[ESC, ESC, END, 0x7F]);
    }

    #[test]
    fn leaves_following_frame_in_source() {
        let mut src = wire(&[b"a", b"b"]);
        let mut decoder = SlipDecoder::new();

        decoder.decode(&mut src).unwrap().unwrap();
        assert_eq!(src.as_ref(), &[b'b', END]);
    }

    #[test]
    fn overflow_then_resync() {
        let mut src = wire(&[b"too long", b"ok"]);
        let mut decoder = SlipDecoder::with_max_payload(4);

        let err = decoder.decode(&mut src).unwrap_err();
        assert!(matches!(err, FrameError::Overflow { capacity: 4 }));
        assert_eq!(decoder.state(), DecodeState::Error);

        let frame = decoder.decode(&mut src).unwrap().unwrap();
        assert_eq!(frame.as_ref(), b"ok");
    }

    #[test]
    fn exact_limit_is_accepted() {
        let mut src = wire(&[b"four"]);
        let mut decoder = SlipDecoder::with_max_payload(4);
        assert_eq!(decoder.decode(&mut src).unwrap().unwrap().as_ref(), b"four");
    }

    #[test]
    fn invalid_escape_then_resync() {
        let mut src = BytesMut::from(&[0x01, ESC, 0x02, 0x03, END, 0x09, END][..]);
        let mut decoder = SlipDecoder::new();

        let err = decoder.decode(&mut src).unwrap_err();
        assert!(matches!(err, FrameError::InvalidEscape { byte: 0x02 }));

        let frame = decoder.decode(&mut src).unwrap().unwrap();
        assert_eq!(frame.as_ref(), &[0x09]);
    }

    #[test]
    fn resync_waits_for_terminator_across_deliveries() {
        let mut decoder = SlipDecoder::new();
        let mut bad = BytesMut::from(&[ESC, 0x00, 0x01][..]);
        assert!(decoder.decode(&mut bad).is_err());

        let mut noise = BytesMut::from(&[0x02, 0x03][..]);
        assert!(decoder.decode(&mut noise).unwrap().is_none());
        assert!(noise.is_empty());
        assert_eq!(decoder.state(), DecodeState::Error);

        let mut tail = BytesMut::from(&[0x04, END, 0x05, END][..]);
        assert_eq!(decoder.decode(&mut tail).unwrap().unwrap().as_ref(), &[0x05]);
    }

    #[test]
    fn escape_before_terminator_keeps_next_frame() {
        // ESC END: the terminator both fails and closes the frame.
        let mut src = BytesMut::from(&[0x01, ESC, END, 0x07, END][..]);
        let mut decoder = SlipDecoder::new();

        assert!(matches!(
            decoder.decode(&mut src),
            Err(FrameError::InvalidEscape { byte: END })
        ));
        assert_eq!(decoder.state(), DecodeState::Normal);
        assert_eq!(decoder.decode(&mut src).unwrap().unwrap().as_ref(), &[0x07]);
    }

    #[test]
    fn random_chunk_splits() {
        let mut seed = 0x00C0_FFEE_u64;
        let mut next = move || {
            seed = seed
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            (seed >> 33) as usize
        };

        for _ in 0..50 {
            let payloads: Vec<Vec<u8>> = (0..1 + next() % 8)
                .map(|_| {
                    let len = next() % 64;
                    (0..len)
                        .map(|_| match next() % 3 {
                            0 => END,
                            1 => ESC,
                            _ => next() as u8,
                        })
                        .collect()
                })
                .collect();
            let refs: Vec<&[u8]> = payloads.iter().map(Vec::as_slice).collect();
            let full = wire(&refs);

            let mut decoder = SlipDecoder::new();
            let mut frames = Vec::new();
            let mut at = 0;
            while at < full.len() {
                let end = (at + 1 + next() % 16).min(full.len());
                let mut chunk = BytesMut::from(&full[at..end]);
                while let Some(frame) = decoder.decode(&mut chunk).unwrap() {
                    frames.push(frame);
                }
                assert!(chunk.is_empty());
                at = end;
            }

            assert_eq!(frames, payloads);
            assert!(decoder.is_idle());
        }
    }

    #[test]
    fn finish_reports_cut_frame() {
        let mut decoder = SlipDecoder::new();
        let mut src = BytesMut::from(&[0x01, ESC][..]);
        assert!(decoder.decode(&mut src).unwrap().is_none());

        assert!(matches!(
            decoder.finish(),
            Err(FrameError::Incomplete { consumed: 2 })
        ));
        assert!(decoder.is_idle());
        assert!(decoder.finish().is_ok());
    }

    #[test]
    fn finish_after_rejected_frame_is_clean() {
        let mut decoder = SlipDecoder::new();
        let mut src = BytesMut::from(&[b'a', ESC, b'z', b'q'][..]);
        assert!(decoder.decode(&mut src).is_err());
        assert!(decoder.decode(&mut src).unwrap().is_none());
        assert_eq!(decoder.state(), DecodeState::Error);

        assert!(decoder.finish().is_ok());
        assert!(decoder.is_idle());
    }

    #[test]
    fn reset_drops_partial_frame() {
        let mut decoder = SlipDecoder::new();
        let mut src = BytesMut::from(&[0x01, 0x02, ESC][..]);
        assert!(decoder.decode(&mut src).unwrap().is_none());
        assert!(!decoder.is_idle());

        decoder.reset();
        assert!(decoder.is_idle());
        assert_eq!(decoder.buffered(), 0);

        let mut src = BytesMut::from(&[ESC_END, END][..]);
        // ESC_END is a plain byte outside an escape.
        assert_eq!(decoder.decode(&mut src).unwrap().unwrap().as_ref(), &[ESC_END]);
    }
}
