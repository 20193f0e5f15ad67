//! CBOR codec wrapper.
//!
//! CBOR is self-describing, so the target shape is not consulted.

use std::sync::Arc;

use crate::cbor::{CborDecoder, CborEncoder};
use crate::registry::{self, TypeRegistry};
use crate::{CodecId, PackValue, Shape};

use super::types::{CodecError, ValueCodec};

pub struct CborCodec {
    pub encoder: CborEncoder,
    pub decoder: CborDecoder,
    registry: Arc<TypeRegistry>,
}

impl Default for CborCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl CborCodec {
    /// Uses the process-wide registry.
    pub fn new() -> Self {
        Self::with_registry(registry::global())
    }

    pub fn with_registry(registry: Arc<TypeRegistry>) -> Self {
        Self {
            encoder: CborEncoder::new(),
            decoder: CborDecoder::new(),
            registry,
        }
    }
}

impl ValueCodec for CborCodec {
    fn id(&self) -> CodecId {
        CodecId::Cbor
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
