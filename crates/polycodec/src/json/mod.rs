//! JSON text codec on top of `serde_json`.
//!
//! Struct fields are written by name, integer map keys as decimal strings
//! and byte strings as standard base64. Nothing on the wire identifies a
//! concrete type, so values behind a [`crate::Capability`] can be written
//! but not read back through the capability.

mod decoder;
mod encoder;
mod error;

pub use decoder::JsonDecoder;
pub use encoder::JsonEncoder;
pub use error::JsonError;
