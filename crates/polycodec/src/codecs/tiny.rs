//! Tiny codec wrapper.

use std::sync::Arc;

use crate::tiny::{TinyDecoder, TinyEncoder};
use crate::registry::{self, TypeRegistry};
use crate::{CodecContext, CodecId, PackValue, Shape};

use super::types::{CodecError, ValueCodec};

pub struct TinyCodec {
    pub encoder: TinyEncoder,
    pub decoder: TinyDecoder,
    registry: Arc<TypeRegistry>,
}

impl Default for TinyCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl TinyCodec {
    /// Uses the process-wide registry.
    pub fn new() -> Self {
        Self::with_registry(registry::global())
    }

    pub fn with_registry(registry: Arc<TypeRegistry>) -> Self {
        Self {
            encoder: TinyEncoder::new(),
            decoder: TinyDecoder::new(),
            registry,
        }
    }
}

impl ValueCodec for TinyCodec {
    fn id(&self) -> CodecId {
        CodecId::Tiny
    }

    fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    fn encode_pack(&mut self, value: &PackValue, shape: &Shape) -> Result<Vec<u8>, CodecError> {
        let cx = CodecContext::new(CodecId::Tiny, &self.registry);
        self.encoder.encode(value, shape, &cx)
    }

    fn decode_pack(&mut self, bytes: &[u8], shape: &Shape) -> Result<PackValue, CodecError> {
        let cx = CodecContext::new(CodecId::Tiny, &self.registry);
        self.decoder.decode(bytes, shape, &cx)
    }
}
