//! [`PackValue`]: the dynamic value tree shared by every codec.

use crate::PackExtension;

/// A decoded (or to-be-encoded) value, independent of any wire format.
///
/// Map keys are arbitrary values so that `i64`-keyed maps survive the binary
/// codecs as-is. Struct values are maps keyed by [`PackValue::Str`] field
/// names.
#[derive(Debug, Clone, PartialEq)]
pub enum PackValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Bytes(Vec<u8>),
    Str(String),
    Array(Vec<PackValue>),
    Map(Vec<(PackValue, PackValue)>),
    /// A value tagged with its concrete type (capability values).
    Extension(PackExtension),
}

impl PackValue {
    /// Short name of the variant, used in mismatch diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            PackValue::Null => "null",
            PackValue::Bool(_) => "bool",
            PackValue::Integer(_) => "integer",
            PackValue::Float(_) => "float",
            PackValue::Bytes(_) => "bytes",
            PackValue::Str(_) => "string",
            PackValue::Array(_) => "array",
            PackValue::Map(_) => "map",
            PackValue::Extension(_) => "extension",
        }
    }

    /// Looks up a struct field in a map keyed by field names.
    pub fn field(&self, name: &str) -> Option<&PackValue> {
        match self {
            PackValue::Map(pairs) => pairs.iter().find_map(|(k, v)| match k {
                PackValue::Str(key) if key == name => Some(v),
                _ => None,
            }),
            _ => None,
        }
    }

    /// Builds a struct value from `(field, value)` pairs.
    pub fn fields<I>(pairs: I) -> PackValue
    where
        I: IntoIterator<Item = (&'static str, PackValue)>,
    {
        PackValue::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (PackValue::Str(k.to_owned()), v))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_lookup_ignores_non_string_keys() {
        let value = PackValue::Map(vec![
            (PackValue::Integer(1), PackValue::Bool(true)),
            (PackValue::Str("name".into()), PackValue::Str("x".into())),
        ]);
        assert_eq!(value.field("name"), Some(&PackValue::Str("x".into())));
        assert_eq!(value.field("1"), None);
        assert_eq!(PackValue::Null.field("name"), None);
    }
}
