//! [`TypeTag`]: the identity a concrete type is registered under.

use std::fmt;

use crate::CodecId;

/// Stable identifier of a concrete type on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// Type name (CBOR typed objects).
    Name(String),
    /// Numeric code (MessagePack `ext` type, Tiny short tag).
    Code(u32),
}

/// Highest application-defined MessagePack `ext` type.
pub const MSGPACK_MAX_EXT: u32 = 127;

impl TypeTag {
    /// Whether `codec` can carry this tag on the wire.
    pub fn accepted_by(&self, codec: CodecId) -> bool {
        match (codec, self) {
            (CodecId::Cbor, TypeTag::Name(name)) => !name.is_empty(),
            (CodecId::MsgPack, TypeTag::Code(code)) => *code <= MSGPACK_MAX_EXT,
            (CodecId::Tiny, TypeTag::Code(_)) => true,
            _ => false,
        }
    }
}

impl From<&str> for TypeTag {
    fn from(name: &str) -> Self {
        TypeTag::Name(name.to_owned())
    }
}

impl From<String> for TypeTag {
    fn from(name: String) -> Self {
        TypeTag::Name(name)
    }
}

impl From<u32> for TypeTag {
    fn from(code: u32) -> Self {
        TypeTag::Code(code)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Name(name) => write!(f, "{name:?}"),
            TypeTag::Code(code) => write!(f, "#{code}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acceptance_by_codec() {
        assert!(TypeTag::from("a.B").accepted_by(CodecId::Cbor));
        assert!(!TypeTag::from("").accepted_by(CodecId::Cbor));
        assert!(!TypeTag::Code(20).accepted_by(CodecId::Cbor));
        assert!(TypeTag::Code(127).accepted_by(CodecId::MsgPack));
        assert!(!TypeTag::Code(128).accepted_by(CodecId::MsgPack));
        assert!(TypeTag::Code(70_000).accepted_by(CodecId::Tiny));
        assert!(!TypeTag::from("a.B").accepted_by(CodecId::Tiny));
        assert!(!TypeTag::Code(1).accepted_by(CodecId::Json));
    }

    #[test]
    fn display() {
        assert_eq!(TypeTag::from("a.B").to_string(), "\"a.B\"");
        assert_eq!(TypeTag::Code(20).to_string(), "#20");
    }
}
