//! `JsonDecoder`: parses JSON text and reshapes it into a [`PackValue`].

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;

use super::JsonError;
use crate::codecs::{CodecError, DecodeError};
use crate::{CodecContext, PackValue, Shape};

/// JSON has no integer map keys and no byte strings, so the target shape
/// decides how strings and numbers are read back.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonDecoder;

impl JsonDecoder {
    pub fn new() -> Self {
        Self
    }

    pub fn decode(
        &self,
        bytes: &[u8],
        shape: &Shape,
        cx: &CodecContext<'_>,
    ) -> Result<PackValue, CodecError> {
        let json: Value = serde_json::from_slice(bytes).map_err(JsonError::from)?;
        from_json(json, shape, cx)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub fn from_json(value: Value, shape: &Shape, cx: &CodecContext<'_>) -> Result<PackValue, CodecError> {
    let packed = match (shape, value) {
        (Shape::Capability, _) => return Err(cx.unsupported("dyn Named without a type tag")),
        (Shape::Bool, Value::Bool(b)) => PackValue::Bool(b),
        (Shape::Int, Value::Number(n)) => match n.as_i64() {
            Some(i) => PackValue::Integer(i),
            None if n.is_f64() => return Err(mismatch(shape, "float", cx)),
            None => return Err(JsonError::IntegerOverflow(n.to_string()).into()),
        },
        (Shape::Float, Value::Number(n)) => match n.as_f64() {
            Some(f) => PackValue::Float(f),
            None => return Err(mismatch(shape, "number", cx)),
        },
        (Shape::Bytes, Value::String(s)) => {
            PackValue::Bytes(STANDARD.decode(s).map_err(JsonError::from)?)
        }
        (Shape::Str, Value::String(s)) => PackValue::Str(s),
        (Shape::Seq(item), Value::Array(items)) => PackValue::Array(
            items
                .into_iter()
                .map(|v| from_json(v, item, cx))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        (Shape::Map(key, val), Value::Object(obj)) => {
            let mut pairs = Vec::with_capacity(obj.len());
            for (k, v) in obj {
                pairs.push((map_key(k, key, cx)?, from_json(v, val, cx)?));
            }
            PackValue::Map(pairs)
        }
        (Shape::Struct(fields), Value::Object(obj)) => {
            let mut pairs = Vec::with_capacity(fields.len());
            for (k, v) in obj {
                // Unknown fields are skipped.
                if let Some((_, field_shape)) = fields.iter().find(|(name, _)| *name == k) {
                    let v = from_json(v, field_shape, cx)?;
                    pairs.push((PackValue::Str(k), v));
                }
            }
            PackValue::Map(pairs)
        }
        (shape, value) => return Err(mismatch(shape, json_kind(&value), cx)),
    };
    Ok(packed)
}

fn map_key(key: String, shape: &Shape, cx: &CodecContext<'_>) -> Result<PackValue, CodecError> {
    match shape {
        Shape::Str => Ok(PackValue::Str(key)),
        Shape::Int => match key.parse::<i64>() {
            Ok(i) => Ok(PackValue::Integer(i)),
            Err(_) => Err(JsonError::InvalidKey(key).into()),
        },
        other => Err(cx.unsupported(format!("{other} map key"))),
    }
}

fn mismatch(expected: &Shape, found: &'static str, cx: &CodecContext<'_>) -> CodecError {
    cx.decode_error(DecodeError::Mismatch {
        expected: expected.describe(),
        found,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TypeRegistry;
    use crate::CodecId;

    fn decode(text: &str, shape: &Shape) -> Result<PackValue, CodecError> {
        let registry = TypeRegistry::empty();
        JsonDecoder::new().decode(text.as_bytes(), shape, &CodecContext::new(CodecId::Json, &registry))
    }

    #[test]
    fn decimal_keys_parse_back_to_integers() {
        let shape = Shape::map(Shape::Int, Shape::Float);
        let value = decode(r#"{"-3": 0.5}"#, &shape).unwrap();
        assert_eq!(
            value,
            PackValue::Map(vec![(PackValue::Integer(-3), PackValue::Float(0.5))])
        );
        let err = decode(r#"{"x": 0.5}"#, &shape).unwrap_err();
        assert!(matches!(
            err,
            CodecError::Decode {
                source: DecodeError::Json(JsonError::InvalidKey(_)),
                ..
            }
        ));
    }

    #[test]
    fn integral_float_still_reads_as_float() {
        assert_eq!(decode("2", &Shape::Float).unwrap(), PackValue::Float(2.0));
        assert!(decode("2.5", &Shape::Int).is_err());
    }

    #[test]
    fn struct_skips_unknown_fields() {
        let shape = Shape::Struct(vec![("body", Shape::Bytes)]);
        let value = decode(r#"{"body": "AQI=", "extra": 1}"#, &shape).unwrap();
        assert_eq!(value, PackValue::fields([("body", PackValue::Bytes(vec![1, 2]))]));
    }

    #[test]
    fn capability_cannot_be_recovered() {
        let err = decode(r#"{"name": "blah"}"#, &Shape::Capability).unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedType { codec: CodecId::Json, .. }));
    }

    #[test]
    fn malformed_input() {
        for text in ["", "{", "[1, 2", "1 2"] {
            let err = decode(text, &Shape::seq(Shape::Int)).unwrap_err();
            assert!(matches!(
                err,
                CodecError::Decode {
                    codec: CodecId::Json,
                    source: DecodeError::Json(JsonError::Parse(_))
                }
            ));
        }
        assert!(decode(r#""!!""#, &Shape::Bytes).is_err());
        assert!(decode("18446744073709551615", &Shape::Int).is_err());
    }
}
