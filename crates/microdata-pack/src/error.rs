/// Errors that can occur while packing or unpacking scalars.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PackError {
    /// The value does not fit between the cursor and the end of the buffer.
    #[error("{width}-byte value at offset {cursor} does not fit in {len}-byte buffer")]
    OutOfBounds {
        cursor: usize,
        width: usize,
        len: usize,
    },
}

pub type Result<T> = std::result::Result<T, PackError>;
