//! MessagePack encoding/decoding.
//!
//! Capability values are written as `ext` items: the type byte is the
//! registered code, the payload is the MessagePack encoding of the concrete
//! value.

mod decoder;
mod encoder;
mod error;

pub use decoder::MsgPackDecoder;
pub use encoder::MsgPackEncoder;
pub use error::MsgPackError;
