//! `tokio_util::codec` adapter for async transports.

use bytes::{Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::trace;

use crate::codec::{encode_bounded, FrameConfig};
use crate::decoder::SlipDecoder;
use crate::error::{FrameError, Result};

/// SLIP codec for `FramedRead` / `FramedWrite` / `Framed`.
///
/// Decoding keeps the state machine between polls, so frames split across
/// socket reads resume where they stopped.
#[derive(Debug, Default)]
pub struct SlipCodec {
    decoder: SlipDecoder,
    config: FrameConfig,
}

impl SlipCodec {
    /// Create a codec with default configuration.
    pub fn new() -> Self {
        Self::with_config(FrameConfig::default())
    }

    /// Create a codec with explicit configuration.
    pub fn with_config(config: FrameConfig) -> Self {
        Self {
            decoder: SlipDecoder::with_max_payload(config.max_payload_size),
            config,
        }
    }

    /// Current codec configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    fn encode_payload(&self, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
        let encoded = encode_bounded(payload, self.config.max_payload_size, dst)?;
        trace!(len = payload.len(), encoded, "encoded frame");
        Ok(())
    }
}

impl Decoder for SlipCodec {
    type Item = Bytes;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>> {
        while let Some(frame) = self.decoder.decode(src)? {
            if frame.is_empty() && self.config.skip_empty_frames {
                continue;
            }
            return Ok(Some(frame));
        }
        Ok(None)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>> {
        if let Some(frame) = self.decode(src)? {
            return Ok(Some(frame));
        }
        self.decoder.finish()?;
        Ok(None)
    }
}

impl Encoder<Bytes> for SlipCodec {
    type Error = FrameError;

    fn encode(&mut self, item: Bytes, dst: &mut BytesMut) -> Result<()> {
        self.encode_payload(&item, dst)
    }
}

impl<'a> Encoder<&'a [u8]> for SlipCodec {
    type Error = FrameError;

    fn encode(&mut self, item: &'a [u8], dst: &mut BytesMut) -> Result<()> {
        self.encode_payload(item, dst)
    }
}
