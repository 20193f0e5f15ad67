//! `CborEncoder`: CBOR encoder for [`PackValue`] trees.

use polycodec_buffers::Writer;

use super::constants::*;
use crate::codecs::CodecError;
use crate::registry::TypeTag;
use crate::{CodecId, PackExtension, PackValue};

/// Reusable CBOR encoder. The writer is reset on every [`CborEncoder::encode`].
pub struct CborEncoder {
    pub writer: Writer,
}

impl Default for CborEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl CborEncoder {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(),
        }
    }

    pub fn with_writer(writer: Writer) -> Self {
        Self { writer }
    }

    /// Encode a value and return the CBOR bytes.
    pub fn encode(&mut self, value: &PackValue) -> Result<Vec<u8>, CodecError> {
        self.writer.reset();
        self.write_any(value)?;
        Ok(self.writer.flush())
    }

    pub fn write_any(&mut self, value: &PackValue) -> Result<(), CodecError> {
        match value {
            PackValue::Null => self.writer.u8(TKN_NULL),
            PackValue::Bool(b) => self.write_boolean(*b),
            PackValue::Integer(i) => self.write_integer(*i),
            PackValue::Float(f) => self.write_float(*f),
            PackValue::Bytes(b) => self.write_bin(b),
            PackValue::Str(s) => self.write_str(s),
            PackValue::Array(arr) => {
                self.write_hdr(MAJOR_ARR, arr.len() as u64);
                for item in arr {
                    self.write_any(item)?;
                }
            }
            PackValue::Map(pairs) => {
                self.write_hdr(MAJOR_MAP, pairs.len() as u64);
                for (key, value) in pairs {
                    self.write_any(key)?;
                    self.write_any(value)?;
                }
            }
            PackValue::Extension(ext) => self.write_typed_object(ext)?,
        }
        Ok(())
    }

    pub fn write_boolean(&mut self, b: bool) {
        self.writer.u8(if b { TKN_TRUE } else { TKN_FALSE });
    }

    pub fn write_integer(&mut self, int: i64) {
        if int >= 0 {
            self.write_hdr(MAJOR_UIN, int as u64);
        } else {
            self.write_hdr(MAJOR_NIN, (-1i64).wrapping_sub(int) as u64);
        }
    }

    /// Floats are always written as 64-bit; no narrowing to f32/f16.
    pub fn write_float(&mut self, float: f64) {
        self.writer.u8f64(TKN_F64, float);
    }

    pub fn write_bin(&mut self, buf: &[u8]) {
        self.write_hdr(MAJOR_BIN, buf.len() as u64);
        self.writer.buf(buf);
    }

    pub fn write_str(&mut self, s: &str) {
        self.write_hdr(MAJOR_STR, s.len() as u64);
        self.writer.utf8(s);
    }

    /// Tag 27 around `[type name, value]`. Numeric codes have no place in a
    /// CBOR typed object and are refused.
    pub fn write_typed_object(&mut self, ext: &PackExtension) -> Result<(), CodecError> {
        let TypeTag::Name(name) = &ext.tag else {
            return Err(CodecError::UnsupportedType {
                codec: CodecId::Cbor,
                type_name: format!("extension tag {}", ext.tag),
            });
        };
        self.write_hdr(MAJOR_TAG, TAG_TYPED_OBJECT);
        self.write_hdr(MAJOR_ARR, 2);
        self.write_str(name);
        self.write_any(&ext.val)
    }

    /// Initial byte plus the shortest argument encoding for `arg`.
    pub fn write_hdr(&mut self, major: u8, arg: u64) {
        let overlay = major << 5;
        let w = &mut self.writer;
        if arg <= 23 {
            w.u8(overlay | arg as u8);
        } else if arg <= 0xff {
            w.u8(overlay | MINOR_U8);
            w.u8(arg as u8);
        } else if arg <= 0xffff {
            w.u8u16(overlay | MINOR_U16, arg as u16);
        } else if arg <= 0xffff_ffff {
            w.u8u32(overlay | MINOR_U32, arg as u32);
        } else {
            w.u8u64(overlay | MINOR_U64, arg);
        }
    }
}
