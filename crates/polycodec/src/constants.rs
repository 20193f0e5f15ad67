//! Codec identifiers and shared decoder limits.

use std::fmt;

use serde::Deserialize;

/// Deepest container nesting the binary decoders accept. Matches the
/// recursion limit `serde_json` applies to the JSON codec.
pub const MAX_DEPTH: usize = 128;

/// Identifies one serialization backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecId {
    Cbor = 0,
    MsgPack = 1,
    Tiny = 2,
    Json = 3,
}

impl CodecId {
    pub const ALL: [CodecId; 4] = [
        CodecId::Cbor,
        CodecId::MsgPack,
        CodecId::Tiny,
        CodecId::Json,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CodecId::Cbor => "cbor",
            CodecId::MsgPack => "msgpack",
            CodecId::Tiny => "tiny",
            CodecId::Json => "json",
        }
    }

    /// Whether capability values carry a type tag on the wire, i.e. whether
    /// the codec can decode through a [`crate::Capability`].
    pub fn carries_type_tags(self) -> bool {
        !matches!(self, CodecId::Json)
    }
}

impl fmt::Display for CodecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
