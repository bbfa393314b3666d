/// Errors that can occur during SLIP encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// An escape byte was followed by something other than `ESC_END`/`ESC_ESC`.
    #[error("invalid escape sequence (0xDB followed by {byte:#04X})")]
    InvalidEscape { byte: u8 },

    /// The destination cannot hold the next output byte.
    #[error("destination overflow (capacity {capacity} bytes)")]
    Overflow { capacity: usize },

    /// The source ran out before a frame terminator was seen.
    #[error("incomplete frame (no terminator in {consumed} bytes)")]
    Incomplete { consumed: usize },

    /// The payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream was closed before any frame data arrived.
    #[error("connection closed")]
    ConnectionClosed,
}

impl FrameError {
    /// True when feeding more bytes could turn this failure into a frame.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FrameError::Incomplete { .. })
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
