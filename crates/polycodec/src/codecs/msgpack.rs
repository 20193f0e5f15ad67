//! MessagePack codec wrapper. Like CBOR it decodes without a shape.

use std::sync::Arc;

use crate::msgpack::{MsgPackDecoder, MsgPackEncoder};
use crate::registry::{self, TypeRegistry};
use crate::{CodecId, PackValue, Shape};

use super::types::{CodecError, ValueCodec};

pub struct MsgPackCodec {
    pub encoder: MsgPackEncoder,
    pub decoder: MsgPackDecoder,
    registry: Arc<TypeRegistry>,
}

impl Default for MsgPackCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl MsgPackCodec {
    /// Uses the process-wide registry.
    pub fn new() -> Self {
        Self::with_registry(registry::global())
    }

    pub fn with_registry(registry: Arc<TypeRegistry>) -> Self {
        Self {
            encoder: MsgPackEncoder::new(),
            decoder: MsgPackDecoder::new(),
            registry,
        }
    }
}

impl ValueCodec for MsgPackCodec {
    fn id(&self) -> CodecId {
        CodecId::MsgPack
    }

    fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    fn encode_pack(&mut self, value: &PackValue, _shape: &Shape) -> Result<Vec<u8>, CodecError> {
        self.encoder.encode(value)
    }

    fn decode_pack(&mut self, bytes: &[u8], _shape: &Shape) -> Result<PackValue, CodecError> {
        Ok(self.decoder.decode(bytes)?)
    }
}
