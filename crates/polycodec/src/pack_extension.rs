//! [`PackExtension`]: a value wrapped with its concrete-type tag.

use crate::registry::TypeTag;
use crate::PackValue;

/// A value tagged with the registered identity of its concrete type.
///
/// Encoders write it as a CBOR typed object, a MessagePack `ext` or a Tiny
/// tag prefix. Decoders produce it whenever they meet such a wrapper; the
/// tag is resolved against the registry only when the value is unpacked.
#[derive(Debug, Clone, PartialEq)]
pub struct PackExtension {
    pub tag: TypeTag,
    pub val: Box<PackValue>,
}

impl PackExtension {
    pub fn new(tag: TypeTag, val: PackValue) -> Self {
        Self {
            tag,
            val: Box::new(val),
        }
    }
}
