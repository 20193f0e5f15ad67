//! [`Shape`]: the layout a decoder is asked to produce.

use std::fmt;

/// Expected layout of a value at decode time.
///
/// Self-describing codecs mostly ignore it. The Tiny codec cannot decode a
/// single byte without it, and the JSON codec uses it to turn string map keys
/// back into integers and base64 strings back into bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Bool,
    Int,
    Float,
    Bytes,
    Str,
    Seq(Box<Shape>),
    Map(Box<Shape>, Box<Shape>),
    Struct(Vec<(&'static str, Shape)>),
    /// Some registered concrete type, identified by the tag on the wire.
    Capability,
}

impl Shape {
    pub fn seq(item: Shape) -> Shape {
        Shape::Seq(Box::new(item))
    }

    pub fn map(key: Shape, value: Shape) -> Shape {
        Shape::Map(Box::new(key), Box::new(value))
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Shape::Bool => "bool",
            Shape::Int => "integer",
            Shape::Float => "float",
            Shape::Bytes => "bytes",
            Shape::Str => "string",
            Shape::Seq(_) => "sequence",
            Shape::Map(_, _) => "map",
            Shape::Struct(_) => "struct",
            Shape::Capability => "capability",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Seq(item) => write!(f, "[{item}]"),
            Shape::Map(k, v) => write!(f, "{{{k}: {v}}}"),
            Shape::Struct(fields) => {
                f.write_str("struct {")?;
                for (i, (name, shape)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {shape}")?;
                }
                f.write_str("}")
            }
            other => f.write_str(other.describe()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_nests() {
        let shape = Shape::seq(Shape::map(Shape::Int, Shape::Float));
        assert_eq!(shape.to_string(), "[{integer: float}]");
        let record = Shape::Struct(vec![("name", Shape::Str), ("body", Shape::Bytes)]);
        assert_eq!(record.to_string(), "struct {name: string, body: bytes}");
    }
}
