//! The concrete record exercised by every codec.

use crate::codecs::CodecError;
use crate::pack::{pack_bytes, take_field, unpack_bytes};
use crate::{CodecContext, Named, Pack, PackValue, Shape, Shaped, Unpack};

/// Name, opaque body and a float. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    name: String,
    body: Vec<u8>,
    value: f64,
}

impl Record {
    /// Stable type name used by the CBOR codec's registry entry.
    pub const TYPE_NAME: &'static str = "polycodec.Record";
    /// MessagePack `ext` type code.
    pub const MSGPACK_EXT: u32 = 20;
    /// Tiny codec short tag.
    pub const TINY_CODE: u32 = 1;

    pub fn new(name: impl Into<String>, body: impl Into<Vec<u8>>, value: f64) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
            value,
        }
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

/// The fixed sample every codec is exercised with.
pub fn new_record() -> Record {
    Record::new("blah", [1u8, 2, 3, 4, 5], 1.666)
}

impl Named for Record {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Shaped for Record {
    fn shape() -> Shape {
        Shape::Struct(vec![
            ("name", Shape::Str),
            ("body", Shape::Bytes),
            ("value", Shape::Float),
        ])
    }
}

impl Pack for Record {
    fn pack(&self, _cx: &CodecContext<'_>) -> Result<PackValue, CodecError> {
        Ok(PackValue::fields([
            ("name", PackValue::Str(self.name.clone())),
            ("body", pack_bytes(&self.body)),
            ("value", PackValue::Float(self.value)),
        ]))
    }
}

impl Unpack for Record {
    fn unpack(value: PackValue, cx: &CodecContext<'_>) -> Result<Self, CodecError> {
        let mut pairs = match value {
            PackValue::Map(pairs) => pairs,
            other => return Err(cx.mismatch(&Self::shape(), &other)),
        };
        let name = String::unpack(take_field(&mut pairs, "name", cx)?, cx)?;
        let body = unpack_bytes(take_field(&mut pairs, "body", cx)?, cx)?;
        let value = f64::unpack(take_field(&mut pairs, "value", cx)?, cx)?;
        Ok(Self { name, body, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TypeRegistry;
    use crate::CodecId;

    #[test]
    fn sample_record_is_fixed() {
        let record = new_record();
        assert_eq!(record.name(), "blah");
        assert_eq!(record.body(), &[1, 2, 3, 4, 5]);
        assert_eq!(record.value(), 1.666);
        assert_eq!(record, new_record());
    }

    #[test]
    fn unpack_ignores_unknown_fields() {
        let registry = TypeRegistry::empty();
        let cx = CodecContext::new(CodecId::Cbor, &registry);
        let mut value = new_record().pack(&cx).unwrap();
        if let PackValue::Map(pairs) = &mut value {
            pairs.insert(0, (PackValue::Str("extra".into()), PackValue::Bool(true)));
        }
        assert_eq!(Record::unpack(value, &cx).unwrap(), new_record());
    }
}
