//! Polymorphic multi-codec serialization harness.
//!
//! A [`Record`] and two generic containers ([`Int64FloatMap`],
//! [`MapSequence`]) are pushed through four independent codecs:
//!
//! - [`codecs::CborCodec`] - self-describing binary, capability values carry
//!   the registered type name
//! - [`codecs::MsgPackCodec`] - binary with numeric `ext` type tags
//! - [`codecs::TinyCodec`] - tag-less compact binary, decoding driven by
//!   [`Shape`]
//! - [`codecs::JsonCodec`] - text, no type tags
//!
//! Values reach a codec as a [`PackValue`] tree through [`Pack`] and come back
//! through [`Unpack`]. A value that is only known as a [`Capability`] is
//! recovered through the [`registry::TypeRegistry`].
//!
//! ```
//! use polycodec::codecs::{MsgPackCodec, ValueCodec};
//! use polycodec::{new_record, Capability};
//!
//! let mut codec = MsgPackCodec::new();
//! let original: Capability = Box::new(new_record());
//! let bytes = codec.encode_value(&original).unwrap();
//! let decoded: Capability = codec.decode_value(&bytes).unwrap();
//! assert_eq!(decoded.name(), "blah");
//! ```

mod capability;
mod constants;
mod containers;
mod pack;
mod pack_extension;
mod pack_value;
mod record;
mod shape;

pub mod cbor;
pub mod codecs;
pub mod harness;
pub mod json;
pub mod msgpack;
pub mod registry;
pub mod tiny;

pub use capability::{Capability, ErasedValue, Named};
pub use constants::{CodecId, MAX_DEPTH};
pub use containers::{new_int64_float_map, new_map_sequence, Int64FloatMap, MapSequence};
pub use pack::{CodecContext, Pack, Shaped, Unpack};
pub use pack_extension::PackExtension;
pub use pack_value::PackValue;
pub use record::{new_record, Record};
pub use shape::Shape;
