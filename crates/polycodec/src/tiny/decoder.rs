//! `TinyDecoder`: shape-directed reader for the Tiny format.

use polycodec_buffers::Reader;

use super::min_wire_size;
use super::varint::{read_uvarint, unzigzag};
use super::TinyError;
use crate::codecs::CodecError;
use crate::registry::TypeTag;
use crate::{CodecContext, PackExtension, PackValue, Shape, MAX_DEPTH};

/// Decodes exactly one value of a given [`Shape`].
///
/// Struct values come back as maps keyed by field name so that they unpack
/// the same way as on the self-describing codecs. Capability codes are
/// resolved through the context's registry as soon as they are read, because
/// the payload layout is only known from the registered type. A registered
/// type may hold further capabilities, so nesting is capped at [`MAX_DEPTH`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TinyDecoder;

impl TinyDecoder {
    pub fn new() -> Self {
        Self
    }

    pub fn decode(
        &self,
        bytes: &[u8],
        shape: &Shape,
        cx: &CodecContext<'_>,
    ) -> Result<PackValue, CodecError> {
        let mut reader = Reader::new(bytes);
        let value = read(&mut reader, shape, cx, 0)?;
        if !reader.is_empty() {
            return Err(TinyError::TrailingBytes(reader.size()).into());
        }
        Ok(value)
    }
}

fn read(
    r: &mut Reader<'_>,
    shape: &Shape,
    cx: &CodecContext<'_>,
    depth: usize,
) -> Result<PackValue, CodecError> {
    if depth > MAX_DEPTH {
        return Err(TinyError::TooDeep.into());
    }
    let value = match shape {
        Shape::Bool => match r.u8().map_err(TinyError::from)? {
            0 => PackValue::Bool(false),
            1 => PackValue::Bool(true),
            b => return Err(TinyError::InvalidBool(b).into()),
        },
        Shape::Int => PackValue::Integer(unzigzag(read_uvarint(r)?)),
        Shape::Float => PackValue::Float(r.f64().map_err(TinyError::from)?),
        Shape::Bytes => {
            let len = read_len(r, 1)?;
            PackValue::Bytes(r.buf(len).map_err(TinyError::from)?.to_vec())
        }
        Shape::Str => {
            let len = read_len(r, 1)?;
            PackValue::Str(r.utf8(len).map_err(TinyError::from)?.to_owned())
        }
        Shape::Seq(item) => {
            let len = read_len(r, min_wire_size(item))?;
            let mut items = Vec::with_capacity(len);
            for _ in 0..len {
                items.push(read(r, item, cx, depth + 1)?);
            }
            PackValue::Array(items)
        }
        Shape::Map(key, val) => {
            let len = read_len(r, min_wire_size(key) + min_wire_size(val))?;
            let mut pairs = Vec::with_capacity(len);
            for _ in 0..len {
                let k = read(r, key, cx, depth + 1)?;
                let v = read(r, val, cx, depth + 1)?;
                pairs.push((k, v));
            }
            PackValue::Map(pairs)
        }
        Shape::Struct(fields) => {
            let mut pairs = Vec::with_capacity(fields.len());
            for (name, field_shape) in fields {
                pairs.push((PackValue::Str((*name).to_owned()), read(r, field_shape, cx, depth + 1)?));
            }
            PackValue::Map(pairs)
        }
        Shape::Capability => {
            let raw = read_uvarint(r)?;
            let code = u32::try_from(raw).map_err(|_| TinyError::InvalidCode(raw))?;
            let tag = TypeTag::Code(code);
            let entry = cx.registry.resolve(cx.codec, &tag)?;
            let val = read(r, &entry.shape(), cx, depth + 1)?;
            PackValue::Extension(PackExtension::new(tag, val))
        }
    };
    Ok(value)
}

/// Reads a length prefix and rejects it when the remaining input cannot hold
/// that many items. Zero-width items are counted as one byte so a prefix can
/// never outrun the input.
fn read_len(r: &mut Reader<'_>, min_item_size: usize) -> Result<usize, TinyError> {
    let len = read_uvarint(r)?;
    usize::try_from(len)
        .ok()
        .filter(|len| len.saturating_mul(min_item_size.max(1)) <= r.size())
        .ok_or(TinyError::InvalidSize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codecs::DecodeError;
    use crate::registry::{default_registry, TypeRegistry};
    use crate::tiny::TinyEncoder;
    use crate::{Capability, CodecId, Named, Pack, Record, Shaped, Unpack};

    fn decode(bytes: &[u8], shape: &Shape) -> Result<PackValue, CodecError> {
        let registry = default_registry().unwrap();
        TinyDecoder::new().decode(bytes, shape, &CodecContext::new(CodecId::Tiny, &registry))
    }

    fn tiny_error(result: Result<PackValue, CodecError>) -> TinyError {
        match result {
            Err(CodecError::Decode {
                source: DecodeError::Tiny(err),
                ..
            }) => err,
            other => panic!("expected a tiny decode error, got {other:?}"),
        }
    }

    #[test]
    fn record_payload_follows_registered_shape() {
        let registry = default_registry().unwrap();
        let cx = CodecContext::new(CodecId::Tiny, &registry);
        let record = crate::new_record();
        let packed = PackValue::Extension(PackExtension::new(
            TypeTag::Code(1),
            record.pack(&cx).unwrap(),
        ));
        let bytes = TinyEncoder::new().encode(&packed, &Shape::Capability, &cx).unwrap();
        // code, "blah", 5 body bytes, 8 float bytes
        assert_eq!(bytes.len(), 1 + 5 + 6 + 8);
        assert_eq!(&bytes[..2], &[1, 4]);

        let decoded = decode(&bytes, &Shape::Capability).unwrap();
        let PackValue::Extension(ext) = decoded else {
            panic!("expected an extension");
        };
        assert_eq!(ext.tag, TypeTag::Code(1));
        assert_eq!(Record::unpack(*ext.val, &cx).unwrap(), record);
    }

    #[test]
    fn unknown_code_is_unregistered() {
        let err = decode(&[9, 0], &Shape::Capability).unwrap_err();
        assert!(matches!(err, CodecError::UnregisteredType { tag: TypeTag::Code(9), .. }));

        let registry = TypeRegistry::empty();
        let cx = CodecContext::new(CodecId::Tiny, &registry);
        let err = TinyDecoder::new().decode(&[1], &Shape::Capability, &cx).unwrap_err();
        assert!(matches!(err, CodecError::UnregisteredType { .. }));
    }

    /// A registered type whose payload is another capability.
    #[derive(Debug)]
    struct Wrapper(Capability);

    impl PartialEq for Wrapper {
        fn eq(&self, other: &Self) -> bool {
            *self.0 == *other.0
        }
    }

    impl Shaped for Wrapper {
        fn shape() -> Shape {
            Shape::Capability
        }
    }

    impl Pack for Wrapper {
        fn pack(&self, cx: &CodecContext<'_>) -> Result<PackValue, CodecError> {
            self.0.pack(cx)
        }
    }

    impl Unpack for Wrapper {
        fn unpack(value: PackValue, cx: &CodecContext<'_>) -> Result<Self, CodecError> {
            Capability::unpack(value, cx).map(Wrapper)
        }
    }

    impl Named for Wrapper {
        fn name(&self) -> &str {
            self.0.name()
        }
    }

    #[test]
    fn nested_capabilities_are_bounded() {
        let mut builder = TypeRegistry::builder();
        builder
            .register::<Record>(CodecId::Tiny, Record::TINY_CODE)
            .unwrap()
            .register::<Wrapper>(CodecId::Tiny, 2u32)
            .unwrap();
        let registry = builder.build();
        let cx = CodecContext::new(CodecId::Tiny, &registry);

        let wrapped: Capability = Box::new(Wrapper(Box::new(Wrapper(Box::new(crate::new_record())))));
        let bytes = TinyEncoder::new()
            .encode(&wrapped.pack(&cx).unwrap(), &Shape::Capability, &cx)
            .unwrap();
        assert_eq!(&bytes[..3], &[2, 2, 1]);
        let decoded = TinyDecoder::new().decode(&bytes, &Shape::Capability, &cx).unwrap();
        assert!(*Capability::unpack(decoded, &cx).unwrap() == *wrapped);

        let endless = vec![2; 500_000];
        let err = TinyDecoder::new().decode(&endless, &Shape::Capability, &cx);
        assert_eq!(tiny_error(err), TinyError::TooDeep);
    }

    #[test]
    fn malformed_input() {
        assert_eq!(tiny_error(decode(&[2], &Shape::Bool)), TinyError::InvalidBool(2));
        assert_eq!(tiny_error(decode(&[], &Shape::Int)), TinyError::UnexpectedEof);
        assert_eq!(tiny_error(decode(&[0, 0], &Shape::Int)), TinyError::TrailingBytes(1));
        assert_eq!(tiny_error(decode(&[3, b'a'], &Shape::Str)), TinyError::InvalidSize);
        assert_eq!(tiny_error(decode(&[1, 0xff], &Shape::Str)), TinyError::InvalidUtf8);
        let floats = Shape::seq(Shape::Float);
        assert_eq!(tiny_error(decode(&[2, 0, 0, 0, 0, 0, 0, 0, 0], &floats)), TinyError::InvalidSize);
    }
}
