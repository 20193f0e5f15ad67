//! MessagePack decoder error type.

use polycodec_buffers::BufferError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MsgPackError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("invalid UTF-8")]
    InvalidUtf8,
    #[error("invalid size")]
    InvalidSize,
    #[error("invalid MessagePack byte 0x{0:02x}")]
    InvalidByte(u8),
    #[error("integer out of i64 range")]
    IntegerOverflow,
    #[error("reserved extension type {0}")]
    ReservedExtension(i8),
    #[error("{0} trailing bytes")]
    TrailingBytes(usize),
    #[error("nested deeper than {} levels", crate::MAX_DEPTH)]
    TooDeep,
}

impl From<BufferError> for MsgPackError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::EndOfBuffer => MsgPackError::UnexpectedEof,
            BufferError::InvalidUtf8 => MsgPackError::InvalidUtf8,
        }
    }
}
