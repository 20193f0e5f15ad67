//! Conversions between Rust values and [`PackValue`].

use std::collections::HashMap;
use std::hash::Hash;

use crate::codecs::{CodecError, DecodeError};
use crate::registry::TypeRegistry;
use crate::{CodecId, PackValue, Shape};

/// Everything a conversion needs to know about the codec it runs under.
#[derive(Clone, Copy)]
pub struct CodecContext<'a> {
    pub codec: CodecId,
    pub registry: &'a TypeRegistry,
}

impl<'a> CodecContext<'a> {
    pub fn new(codec: CodecId, registry: &'a TypeRegistry) -> Self {
        Self { codec, registry }
    }

    /// Wraps a decode-side failure with this context's codec.
    pub fn decode_error(&self, err: impl Into<DecodeError>) -> CodecError {
        CodecError::Decode {
            codec: self.codec,
            source: err.into(),
        }
    }

    pub fn mismatch(&self, expected: &Shape, found: &PackValue) -> CodecError {
        self.decode_error(DecodeError::Mismatch {
            expected: expected.describe(),
            found: found.kind(),
        })
    }

    pub fn unsupported(&self, type_name: impl Into<String>) -> CodecError {
        CodecError::UnsupportedType {
            codec: self.codec,
            type_name: type_name.into(),
        }
    }
}

/// Types that know their decode-time [`Shape`].
pub trait Shaped {
    fn shape() -> Shape;
}

/// Conversion into a [`PackValue`].
pub trait Pack: Shaped {
    fn pack(&self, cx: &CodecContext<'_>) -> Result<PackValue, CodecError>;
}

/// Conversion out of a [`PackValue`].
pub trait Unpack: Shaped + Sized {
    fn unpack(value: PackValue, cx: &CodecContext<'_>) -> Result<Self, CodecError>;
}

impl Shaped for bool {
    fn shape() -> Shape {
        Shape::Bool
    }
}

impl Pack for bool {
    fn pack(&self, _cx: &CodecContext<'_>) -> Result<PackValue, CodecError> {
        Ok(PackValue::Bool(*self))
    }
}

impl Unpack for bool {
    fn unpack(value: PackValue, cx: &CodecContext<'_>) -> Result<Self, CodecError> {
        match value {
            PackValue::Bool(b) => Ok(b),
            other => Err(cx.mismatch(&Self::shape(), &other)),
        }
    }
}

impl Shaped for i64 {
    fn shape() -> Shape {
        Shape::Int
    }
}

impl Pack for i64 {
    fn pack(&self, _cx: &CodecContext<'_>) -> Result<PackValue, CodecError> {
        Ok(PackValue::Integer(*self))
    }
}

impl Unpack for i64 {
    fn unpack(value: PackValue, cx: &CodecContext<'_>) -> Result<Self, CodecError> {
        match value {
            PackValue::Integer(i) => Ok(i),
            other => Err(cx.mismatch(&Self::shape(), &other)),
        }
    }
}

impl Shaped for f64 {
    fn shape() -> Shape {
        Shape::Float
    }
}

impl Pack for f64 {
    fn pack(&self, _cx: &CodecContext<'_>) -> Result<PackValue, CodecError> {
        Ok(PackValue::Float(*self))
    }
}

impl Unpack for f64 {
    fn unpack(value: PackValue, cx: &CodecContext<'_>) -> Result<Self, CodecError> {
        match value {
            PackValue::Float(f) => Ok(f),
            other => Err(cx.mismatch(&Self::shape(), &other)),
        }
    }
}

impl Shaped for String {
    fn shape() -> Shape {
        Shape::Str
    }
}

impl Pack for String {
    fn pack(&self, _cx: &CodecContext<'_>) -> Result<PackValue, CodecError> {
        Ok(PackValue::Str(self.clone()))
    }
}

impl Unpack for String {
    fn unpack(value: PackValue, cx: &CodecContext<'_>) -> Result<Self, CodecError> {
        match value {
            PackValue::Str(s) => Ok(s),
            other => Err(cx.mismatch(&Self::shape(), &other)),
        }
    }
}

impl<T: Shaped> Shaped for Vec<T> {
    fn shape() -> Shape {
        Shape::seq(T::shape())
    }
}

impl<T: Pack> Pack for Vec<T> {
    fn pack(&self, cx: &CodecContext<'_>) -> Result<PackValue, CodecError> {
        self.iter()
            .map(|item| item.pack(cx))
            .collect::<Result<Vec<_>, _>>()
            .map(PackValue::Array)
    }
}

impl<T: Unpack> Unpack for Vec<T> {
    fn unpack(value: PackValue, cx: &CodecContext<'_>) -> Result<Self, CodecError> {
        match value {
            PackValue::Array(items) => items.into_iter().map(|item| T::unpack(item, cx)).collect(),
            other => Err(cx.mismatch(&Self::shape(), &other)),
        }
    }
}

impl<K: Shaped, V: Shaped> Shaped for HashMap<K, V> {
    fn shape() -> Shape {
        Shape::map(K::shape(), V::shape())
    }
}

impl<K: Pack, V: Pack> Pack for HashMap<K, V> {
    fn pack(&self, cx: &CodecContext<'_>) -> Result<PackValue, CodecError> {
        let mut pairs = Vec::with_capacity(self.len());
        for (k, v) in self {
            pairs.push((k.pack(cx)?, v.pack(cx)?));
        }
        Ok(PackValue::Map(pairs))
    }
}

impl<K: Unpack + Eq + Hash, V: Unpack> Unpack for HashMap<K, V> {
    fn unpack(value: PackValue, cx: &CodecContext<'_>) -> Result<Self, CodecError> {
        let pairs = match value {
            PackValue::Map(pairs) => pairs,
            other => return Err(cx.mismatch(&Self::shape(), &other)),
        };
        let mut map = HashMap::with_capacity(pairs.len());
        for (k, v) in pairs {
            let key = K::unpack(k, cx)?;
            let val = V::unpack(v, cx)?;
            if map.insert(key, val).is_some() {
                return Err(cx.decode_error(DecodeError::DuplicateKey));
            }
        }
        Ok(map)
    }
}

/// Packs a byte string; `Vec<u8>` itself packs as a sequence.
pub(crate) fn pack_bytes(bytes: &[u8]) -> PackValue {
    PackValue::Bytes(bytes.to_vec())
}

pub(crate) fn unpack_bytes(value: PackValue, cx: &CodecContext<'_>) -> Result<Vec<u8>, CodecError> {
    match value {
        PackValue::Bytes(b) => Ok(b),
        other => Err(cx.mismatch(&Shape::Bytes, &other)),
    }
}

/// Removes a named field from a struct value.
pub(crate) fn take_field(
    pairs: &mut Vec<(PackValue, PackValue)>,
    name: &'static str,
    cx: &CodecContext<'_>,
) -> Result<PackValue, CodecError> {
    let index = pairs
        .iter()
        .position(|(k, _)| matches!(k, PackValue::Str(key) if key == name))
        .ok_or_else(|| cx.decode_error(DecodeError::MissingField(name)))?;
    Ok(pairs.swap_remove(index).1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TypeRegistry;

    #[test]
    fn duplicate_map_key_is_rejected() {
        let registry = TypeRegistry::empty();
        let cx = CodecContext::new(CodecId::MsgPack, &registry);
        let value = PackValue::Map(vec![
            (PackValue::Integer(1), PackValue::Float(1.0)),
            (PackValue::Integer(1), PackValue::Float(2.0)),
        ]);
        let err = HashMap::<i64, f64>::unpack(value, &cx).unwrap_err();
        assert!(matches!(
            err,
            CodecError::Decode {
                source: DecodeError::DuplicateKey,
                ..
            }
        ));
    }

    #[test]
    fn integer_does_not_unpack_as_float() {
        let registry = TypeRegistry::empty();
        let cx = CodecContext::new(CodecId::Cbor, &registry);
        let err = f64::unpack(PackValue::Integer(3), &cx).unwrap_err();
        assert_eq!(err.to_string(), "cbor: decode failed: expected float, found integer");
    }

    #[test]
    fn missing_field_names_the_field() {
        let registry = TypeRegistry::empty();
        let cx = CodecContext::new(CodecId::Tiny, &registry);
        let mut pairs = vec![(PackValue::Str("a".into()), PackValue::Null)];
        let err = take_field(&mut pairs, "b", &cx).unwrap_err();
        assert!(matches!(
            err,
            CodecError::Decode {
                source: DecodeError::MissingField("b"),
                ..
            }
        ));
        assert_eq!(take_field(&mut pairs, "a", &cx).unwrap(), PackValue::Null);
    }
}
