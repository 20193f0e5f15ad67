use polycodec_buffers::BufferError;
use thiserror::Error;

/// Error type for CBOR decoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CborError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("invalid UTF-8")]
    InvalidUtf8,
    #[error("unexpected minor value {0}")]
    UnexpectedMinor(u8),
    #[error("unsupported cbor feature: {0}")]
    Unsupported(&'static str),
    #[error("unexpected tag {0}")]
    UnexpectedTag(u64),
    #[error("malformed typed object")]
    InvalidTypedObject,
    #[error("integer out of i64 range")]
    IntegerOverflow,
    #[error("invalid size")]
    InvalidSize,
    #[error("{0} trailing bytes")]
    TrailingBytes(usize),
    #[error("nested deeper than {} levels", crate::MAX_DEPTH)]
    TooDeep,
}

impl From<BufferError> for CborError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::EndOfBuffer => CborError::UnexpectedEof,
            BufferError::InvalidUtf8 => CborError::InvalidUtf8,
        }
    }
}
