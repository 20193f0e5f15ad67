//! CBOR (RFC 8949) encoding/decoding.
//!
//! Struct values are maps keyed by field name. Capability values use tag 27
//! ("serialised language-independent object") around `[type-tag, value]`.

mod constants;
mod decoder;
mod encoder;
mod error;

pub use constants::TAG_TYPED_OBJECT;
pub use decoder::CborDecoder;
pub use encoder::CborEncoder;
pub use error::CborError;
