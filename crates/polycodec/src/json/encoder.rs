//! `JsonEncoder`: renders [`PackValue`] trees as JSON text.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{Map, Number, Value};

use crate::codecs::CodecError;
use crate::{CodecContext, PackValue};

/// Reusable JSON encoder; the output buffer is cleared on every call.
#[derive(Debug, Default)]
pub struct JsonEncoder {
    buf: Vec<u8>,
}

impl JsonEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn encode(&mut self, value: &PackValue, cx: &CodecContext<'_>) -> Result<Vec<u8>, CodecError> {
        let json = to_json(value, cx)?;
        self.buf.clear();
        serde_json::to_writer(&mut self.buf, &json).map_err(|err| cx.unsupported(err.to_string()))?;
        Ok(self.buf.clone())
    }
}

/// Extensions lose their tag: only the wrapped value is written.
pub fn to_json(value: &PackValue, cx: &CodecContext<'_>) -> Result<Value, CodecError> {
    let json = match value {
        PackValue::Null => Value::Null,
        PackValue::Bool(b) => Value::Bool(*b),
        PackValue::Integer(i) => Value::from(*i),
        PackValue::Float(f) => Number::from_f64(*f)
            .map(Value::Number)
            .ok_or_else(|| cx.unsupported(format!("non-finite float {f}")))?,
        PackValue::Bytes(b) => Value::String(STANDARD.encode(b)),
        PackValue::Str(s) => Value::String(s.clone()),
        PackValue::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| to_json(item, cx))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        PackValue::Map(pairs) => {
            let mut obj = Map::new();
            for (k, v) in pairs {
                let key = match k {
                    PackValue::Str(s) => s.clone(),
                    PackValue::Integer(i) => i.to_string(),
                    other => return Err(cx.unsupported(format!("{} map key", other.kind()))),
                };
                if obj.insert(key, to_json(v, cx)?).is_some() {
                    return Err(cx.unsupported("map with colliding keys"));
                }
            }
            Value::Object(obj)
        }
        PackValue::Extension(ext) => to_json(&ext.val, cx)?,
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{TypeRegistry, TypeTag};
    use crate::{CodecId, PackExtension};

    fn encode(value: &PackValue) -> Result<String, CodecError> {
        let registry = TypeRegistry::empty();
        let cx = CodecContext::new(CodecId::Json, &registry);
        let bytes = JsonEncoder::new().encode(value, &cx)?;
        Ok(String::from_utf8(bytes).unwrap())
    }

    #[test]
    fn integer_keys_become_decimal_strings() {
        let value = PackValue::Map(vec![(PackValue::Integer(-3), PackValue::Float(0.5))]);
        assert_eq!(encode(&value).unwrap(), r#"{"-3":0.5}"#);
    }

    #[test]
    fn bytes_are_base64() {
        let value = PackValue::Bytes(vec![1, 2, 3, 4, 5]);
        assert_eq!(encode(&value).unwrap(), r#""AQIDBAU=""#);
    }

    #[test]
    fn extension_writes_only_the_value() {
        let ext = PackExtension::new(TypeTag::Code(20), PackValue::Bool(true));
        assert_eq!(encode(&PackValue::Extension(ext)).unwrap(), "true");
    }

    #[test]
    fn unrepresentable_values() {
        let err = encode(&PackValue::Float(f64::NAN)).unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedType { codec: CodecId::Json, .. }));
        let value = PackValue::Map(vec![(PackValue::Bool(true), PackValue::Null)]);
        assert!(encode(&value).is_err());
        let value = PackValue::Map(vec![
            (PackValue::Integer(1), PackValue::Null),
            (PackValue::Str("1".into()), PackValue::Null),
        ]);
        assert!(encode(&value).is_err());
    }
}
