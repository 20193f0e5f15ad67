//! Aggregate codec holder.

use std::sync::Arc;

use super::{CborCodec, JsonCodec, MsgPackCodec, TinyCodec};
use crate::registry::{self, TypeRegistry};

/// All four backends sharing one registry.
pub struct Codecs {
    pub cbor: CborCodec,
    pub msgpack: MsgPackCodec,
    pub tiny: TinyCodec,
    pub json: JsonCodec,
}

impl Default for Codecs {
    fn default() -> Self {
        Self::new()
    }
}

impl Codecs {
    pub fn new() -> Self {
        Self::with_registry(registry::global())
    }

    pub fn with_registry(registry: Arc<TypeRegistry>) -> Self {
        Self {
            cbor: CborCodec::with_registry(Arc::clone(&registry)),
            msgpack: MsgPackCodec::with_registry(Arc::clone(&registry)),
            tiny: TinyCodec::with_registry(Arc::clone(&registry)),
            json: JsonCodec::with_registry(registry),
        }
    }
}
