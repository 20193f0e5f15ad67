//! JSON codec wrapper.
//!
//! The registry is carried for the shared contract only; JSON never looks
//! anything up in it.

use std::sync::Arc;

use crate::json::{JsonDecoder, JsonEncoder};
use crate::registry::{self, TypeRegistry};
use crate::{CodecContext, CodecId, PackValue, Shape};

use super::types::{CodecError, ValueCodec};

pub struct JsonCodec {
    pub encoder: JsonEncoder,
    pub decoder: JsonDecoder,
    registry: Arc<TypeRegistry>,
}

impl Default for JsonCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonCodec {
    /// Uses the process-wide registry.
    pub fn new() -> Self {
        Self::with_registry(registry::global())
    }

    pub fn with_registry(registry: Arc<TypeRegistry>) -> Self {
        Self {
            encoder: JsonEncoder::new(),
            decoder: JsonDecoder::new(),
            registry,
        }
    }
}

impl ValueCodec for JsonCodec {
    fn id(&self) -> CodecId {
        CodecId::Json
    }

    fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    fn encode_pack(&mut self, value: &PackValue, _shape: &Shape) -> Result<Vec<u8>, CodecError> {
        let cx = CodecContext::new(CodecId::Json, &self.registry);
        self.encoder.encode(value, &cx)
    }

    fn decode_pack(&mut self, bytes: &[u8], shape: &Shape) -> Result<PackValue, CodecError> {
        let cx = CodecContext::new(CodecId::Json, &self.registry);
        self.decoder.decode(bytes, shape, &cx)
    }
}
