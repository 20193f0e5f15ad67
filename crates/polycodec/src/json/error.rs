//! JSON decoder error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonError {
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    #[error("map key {0:?} is not a decimal integer")]
    InvalidKey(String),
    #[error("number {0} does not fit in a 64-bit integer")]
    IntegerOverflow(String),
}
