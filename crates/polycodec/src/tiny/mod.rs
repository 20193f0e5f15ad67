//! Tiny: a compact binary format with no per-value type information.
//!
//! Layout is dictated entirely by the [`crate::Shape`]:
//!
//! | shape        | wire                                              |
//! |--------------|---------------------------------------------------|
//! | `Bool`       | one byte, `0` or `1`                              |
//! | `Int`        | zigzag LEB128 varint                              |
//! | `Float`      | 8 bytes, IEEE-754 big-endian                      |
//! | `Bytes`/`Str`| varint length, raw bytes                          |
//! | `Seq`        | varint count, items                               |
//! | `Map`        | varint count, key/value pairs                     |
//! | `Struct`     | field values in declaration order, no names       |
//! | `Capability` | varint registered code, payload in that type's shape |

mod decoder;
mod encoder;
mod error;
mod varint;

pub use decoder::TinyDecoder;
pub use encoder::TinyEncoder;
pub use error::TinyError;

use crate::Shape;

/// Fewest bytes a value of `shape` can occupy; length prefixes are checked
/// against it before anything is allocated.
fn min_wire_size(shape: &Shape) -> usize {
    match shape {
        Shape::Float => 8,
        Shape::Map(k, v) => min_wire_size(k) + min_wire_size(v),
        Shape::Struct(fields) => fields.iter().map(|(_, s)| min_wire_size(s)).sum(),
        _ => 1,
    }
}
