//! Tiny decoder error type.

use polycodec_buffers::BufferError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TinyError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("invalid UTF-8")]
    InvalidUtf8,
    #[error("invalid size")]
    InvalidSize,
    #[error("varint does not fit in 64 bits")]
    VarintOverflow,
    #[error("invalid bool byte 0x{0:02x}")]
    InvalidBool(u8),
    #[error("type code {0} out of range")]
    InvalidCode(u64),
    #[error("{0} trailing bytes")]
    TrailingBytes(usize),
    #[error("nested deeper than {} levels", crate::MAX_DEPTH)]
    TooDeep,
}

impl From<BufferError> for TinyError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::EndOfBuffer => TinyError::UnexpectedEof,
            BufferError::InvalidUtf8 => TinyError::InvalidUtf8,
        }
    }
}
