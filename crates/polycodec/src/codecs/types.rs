//! Common codec trait and errors.

use thiserror::Error;

use crate::cbor::CborError;
use crate::json::JsonError;
use crate::msgpack::MsgPackError;
use crate::registry::{TypeRegistry, TypeTag};
use crate::tiny::TinyError;
use crate::{CodecContext, CodecId, Pack, PackValue, Shape, Unpack};

/// Why bytes could not be turned back into the requested value.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Cbor(#[from] CborError),
    #[error(transparent)]
    MsgPack(#[from] MsgPackError),
    #[error(transparent)]
    Tiny(#[from] TinyError),
    #[error(transparent)]
    Json(#[from] JsonError),
    #[error("expected {expected}, found {found}")]
    Mismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("duplicate map key")]
    DuplicateKey,
}

/// Terminal failure of one encode or decode call.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("{codec}: cannot represent {type_name}")]
    UnsupportedType { codec: CodecId, type_name: String },
    #[error("{codec}: no type registered for tag {tag}")]
    UnregisteredType { codec: CodecId, tag: TypeTag },
    #[error("{codec}: decode failed: {source}")]
    Decode {
        codec: CodecId,
        #[source]
        source: DecodeError,
    },
}

impl CodecError {
    pub fn codec(&self) -> CodecId {
        match self {
            CodecError::UnsupportedType { codec, .. }
            | CodecError::UnregisteredType { codec, .. }
            | CodecError::Decode { codec, .. } => *codec,
        }
    }
}

impl From<CborError> for CodecError {
    fn from(err: CborError) -> Self {
        CodecError::Decode {
            codec: CodecId::Cbor,
            source: err.into(),
        }
    }
}

impl From<MsgPackError> for CodecError {
    fn from(err: MsgPackError) -> Self {
        CodecError::Decode {
            codec: CodecId::MsgPack,
            source: err.into(),
        }
    }
}

impl From<TinyError> for CodecError {
    fn from(err: TinyError) -> Self {
        CodecError::Decode {
            codec: CodecId::Tiny,
            source: err.into(),
        }
    }
}

impl From<JsonError> for CodecError {
    fn from(err: JsonError) -> Self {
        CodecError::Decode {
            codec: CodecId::Json,
            source: err.into(),
        }
    }
}

/// A serialization backend behind the uniform encode/decode contract.
///
/// Implementations keep a reusable encoder whose buffer is reset on every
/// call, so each call yields an independent, self-contained byte sequence.
/// Methods take `&mut self`: a codec is a per-caller handle. Threads that
/// decode concurrently each build their own codec and share the registry.
pub trait ValueCodec {
    fn id(&self) -> CodecId;

    fn registry(&self) -> &TypeRegistry;

    /// Writes a [`PackValue`] whose layout is `shape`.
    fn encode_pack(&mut self, value: &PackValue, shape: &Shape) -> Result<Vec<u8>, CodecError>;

    /// Reads one complete value of layout `shape`; trailing bytes are an
    /// error.
    fn decode_pack(&mut self, bytes: &[u8], shape: &Shape) -> Result<PackValue, CodecError>;

    fn encode_value<T: Pack>(&mut self, value: &T) -> Result<Vec<u8>, CodecError>
    where
        Self: Sized,
    {
        let packed = value.pack(&CodecContext::new(self.id(), self.registry()))?;
        self.encode_pack(&packed, &T::shape())
    }

    /// Decodes into `T`; `T::shape()` is the target shape. For
    /// [`crate::Capability`] the concrete type is recovered from the tag on
    /// the wire.
    fn decode_value<T: Unpack>(&mut self, bytes: &[u8]) -> Result<T, CodecError>
    where
        Self: Sized,
    {
        let value = self.decode_pack(bytes, &T::shape())?;
        T::unpack(value, &CodecContext::new(self.id(), self.registry()))
    }
}
