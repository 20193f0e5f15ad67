//! `TinyEncoder`: shape-directed writer for the Tiny format.

use polycodec_buffers::Writer;

use super::varint::{write_uvarint, zigzag};
use crate::codecs::CodecError;
use crate::registry::TypeTag;
use crate::{CodecContext, PackValue, Shape};

/// Reusable Tiny encoder. The writer is reset on every [`TinyEncoder::encode`].
pub struct TinyEncoder {
    pub writer: Writer,
}

impl Default for TinyEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl TinyEncoder {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(),
        }
    }

    /// Encodes `value` laid out as `shape`. A value that does not fit the
    /// shape cannot be written, since nothing on the wire says what it is.
    pub fn encode(
        &mut self,
        value: &PackValue,
        shape: &Shape,
        cx: &CodecContext<'_>,
    ) -> Result<Vec<u8>, CodecError> {
        self.writer.reset();
        self.write(value, shape, cx)?;
        Ok(self.writer.flush())
    }

    fn write(
        &mut self,
        value: &PackValue,
        shape: &Shape,
        cx: &CodecContext<'_>,
    ) -> Result<(), CodecError> {
        match (shape, value) {
            (Shape::Bool, PackValue::Bool(b)) => self.writer.u8(u8::from(*b)),
            (Shape::Int, PackValue::Integer(i)) => write_uvarint(&mut self.writer, zigzag(*i)),
            (Shape::Float, PackValue::Float(f)) => self.writer.f64(*f),
            (Shape::Bytes, PackValue::Bytes(b)) => {
                self.write_len(b.len());
                self.writer.buf(b);
            }
            (Shape::Str, PackValue::Str(s)) => {
                self.write_len(s.len());
                self.writer.utf8(s);
            }
            (Shape::Seq(item), PackValue::Array(items)) => {
                self.write_len(items.len());
                for v in items {
                    self.write(v, item, cx)?;
                }
            }
            (Shape::Map(key, val), PackValue::Map(pairs)) => {
                self.write_len(pairs.len());
                for (k, v) in pairs {
                    self.write(k, key, cx)?;
                    self.write(v, val, cx)?;
                }
            }
            (Shape::Struct(fields), PackValue::Map(_)) => {
                for (name, field_shape) in fields {
                    let field = value
                        .field(name)
                        .ok_or_else(|| cx.unsupported(format!("struct without field `{name}`")))?;
                    self.write(field, field_shape, cx)?;
                }
            }
            (Shape::Capability, PackValue::Extension(ext)) => {
                let code = match ext.tag {
                    TypeTag::Code(code) => code,
                    ref tag => return Err(cx.unsupported(format!("extension tag {tag}"))),
                };
                let entry = cx.registry.resolve(cx.codec, &ext.tag)?;
                write_uvarint(&mut self.writer, u64::from(code));
                self.write(&ext.val, &entry.shape(), cx)?;
            }
            (shape, value) => {
                return Err(cx.unsupported(format!("{} as {shape}", value.kind())));
            }
        }
        Ok(())
    }

    fn write_len(&mut self, len: usize) {
        write_uvarint(&mut self.writer, len as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{default_registry, TypeRegistry};
    use crate::{CodecId, PackExtension};

    fn encode(value: &PackValue, shape: &Shape) -> Result<Vec<u8>, CodecError> {
        let registry = default_registry().unwrap();
        TinyEncoder::new().encode(value, shape, &CodecContext::new(CodecId::Tiny, &registry))
    }

    #[test]
    fn scalars() {
        assert_eq!(encode(&PackValue::Bool(true), &Shape::Bool).unwrap(), vec![1]);
        assert_eq!(encode(&PackValue::Integer(-2), &Shape::Int).unwrap(), vec![3]);
        assert_eq!(encode(&PackValue::Str("hi".into()), &Shape::Str).unwrap(), vec![2, b'h', b'i']);
        assert_eq!(
            encode(&PackValue::Float(1.5), &Shape::Float).unwrap(),
            1.5f64.to_be_bytes().to_vec()
        );
    }

    #[test]
    fn struct_fields_follow_shape_order() {
        let shape = Shape::Struct(vec![("a", Shape::Int), ("b", Shape::Bool)]);
        let value = PackValue::fields([("b", PackValue::Bool(false)), ("a", PackValue::Integer(1))]);
        assert_eq!(encode(&value, &shape).unwrap(), vec![2, 0]);
    }

    #[test]
    fn map_is_count_then_pairs() {
        let shape = Shape::map(Shape::Int, Shape::Bool);
        let value = PackValue::Map(vec![(PackValue::Integer(1), PackValue::Bool(true))]);
        assert_eq!(encode(&value, &shape).unwrap(), vec![1, 2, 1]);
    }

    #[test]
    fn value_outside_its_shape_is_unsupported() {
        let err = encode(&PackValue::Integer(1), &Shape::Float).unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedType { codec: CodecId::Tiny, .. }));
        let shape = Shape::Struct(vec![("a", Shape::Int)]);
        assert!(encode(&PackValue::Map(vec![]), &shape).is_err());
    }

    #[test]
    fn capability_needs_a_registered_code() {
        let registry = TypeRegistry::empty();
        let cx = CodecContext::new(CodecId::Tiny, &registry);
        let ext = PackExtension::new(TypeTag::Code(1), PackValue::Null);
        let err = TinyEncoder::new()
            .encode(&PackValue::Extension(ext), &Shape::Capability, &cx)
            .unwrap_err();
        assert!(matches!(err, CodecError::UnregisteredType { .. }));

        let named = PackExtension::new(TypeTag::from("x"), PackValue::Null);
        let err = encode(&PackValue::Extension(named), &Shape::Capability).unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedType { .. }));
    }
}
