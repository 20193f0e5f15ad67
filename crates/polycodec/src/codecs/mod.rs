//! One [`ValueCodec`] per serialization backend.

mod cbor;
mod json;
mod msgpack;
mod registry;
mod tiny;
mod types;

pub use cbor::CborCodec;
pub use json::JsonCodec;
pub use msgpack::MsgPackCodec;
pub use registry::Codecs;
pub use tiny::TinyCodec;
pub use types::{CodecError, DecodeError, ValueCodec};
