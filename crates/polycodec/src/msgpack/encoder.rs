//! `MsgPackEncoder`: MessagePack encoder for [`PackValue`] trees.

use polycodec_buffers::Writer;

use crate::codecs::CodecError;
use crate::registry::{TypeTag, MSGPACK_MAX_EXT};
use crate::{CodecId, PackExtension, PackValue};

/// Longest `ext` header: `0xc9`, u32 length, type byte.
const EXT_HDR_MAX: usize = 6;

/// Reusable MessagePack encoder. The writer is reset on every
/// [`MsgPackEncoder::encode`].
pub struct MsgPackEncoder {
    pub writer: Writer,
}

impl Default for MsgPackEncoder {
    fn default() -> Self {
        Self::new()
    }
}

fn unsupported(type_name: impl Into<String>) -> CodecError {
    CodecError::UnsupportedType {
        codec: CodecId::MsgPack,
        type_name: type_name.into(),
    }
}

fn len32(len: usize, what: &str) -> Result<u32, CodecError> {
    u32::try_from(len).map_err(|_| unsupported(format!("{what} of {len} items")))
}

impl MsgPackEncoder {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(),
        }
    }

    /// Encode a value and return the MessagePack bytes.
    pub fn encode(&mut self, value: &PackValue) -> Result<Vec<u8>, CodecError> {
        self.writer.reset();
        self.write_any(value)?;
        Ok(self.writer.flush())
    }

    pub fn write_any(&mut self, value: &PackValue) -> Result<(), CodecError> {
        match value {
            PackValue::Null => self.writer.u8(0xc0),
            PackValue::Bool(b) => self.writer.u8(if *b { 0xc3 } else { 0xc2 }),
            PackValue::Integer(i) => self.write_integer(*i),
            PackValue::Float(f) => self.writer.u8f64(0xcb, *f),
            PackValue::Bytes(b) => self.write_bin(b)?,
            PackValue::Str(s) => self.write_str(s)?,
            PackValue::Array(arr) => {
                self.write_arr_hdr(len32(arr.len(), "array")?);
                for item in arr {
                    self.write_any(item)?;
                }
            }
            PackValue::Map(pairs) => {
                self.write_map_hdr(len32(pairs.len(), "map")?);
                for (key, value) in pairs {
                    self.write_any(key)?;
                    self.write_any(value)?;
                }
            }
            PackValue::Extension(ext) => self.write_ext(ext)?,
        }
        Ok(())
    }

    pub fn write_integer(&mut self, int: i64) {
        let w = &mut self.writer;
        if int >= 0 {
            if int <= 0x7f {
                w.u8(int as u8);
            } else if int <= 0xff {
                w.u8(0xcc);
                w.u8(int as u8);
            } else if int <= 0xffff {
                w.u8u16(0xcd, int as u16);
            } else if int <= 0xffff_ffff {
                w.u8u32(0xce, int as u32);
            } else {
                w.u8u64(0xcf, int as u64);
            }
        } else if int >= -32 {
            w.i8(int as i8);
        } else if int >= i64::from(i8::MIN) {
            w.u8(0xd0);
            w.i8(int as i8);
        } else if int >= i64::from(i16::MIN) {
            w.u8(0xd1);
            w.i16(int as i16);
        } else if int >= i64::from(i32::MIN) {
            w.u8(0xd2);
            w.i32(int as i32);
        } else {
            w.u8(0xd3);
            w.i64(int);
        }
    }

    pub fn write_str(&mut self, s: &str) -> Result<(), CodecError> {
        let len = len32(s.len(), "string")?;
        let w = &mut self.writer;
        if len <= 31 {
            w.u8(0xa0 | len as u8);
        } else if len <= 0xff {
            w.u8(0xd9);
            w.u8(len as u8);
        } else if len <= 0xffff {
            w.u8u16(0xda, len as u16);
        } else {
            w.u8u32(0xdb, len);
        }
        w.utf8(s);
        Ok(())
    }

    pub fn write_bin(&mut self, buf: &[u8]) -> Result<(), CodecError> {
        let len = len32(buf.len(), "binary")?;
        let w = &mut self.writer;
        if len <= 0xff {
            w.u8(0xc4);
            w.u8(len as u8);
        } else if len <= 0xffff {
            w.u8u16(0xc5, len as u16);
        } else {
            w.u8u32(0xc6, len);
        }
        w.buf(buf);
        Ok(())
    }

    pub fn write_arr_hdr(&mut self, len: u32) {
        if len <= 15 {
            self.writer.u8(0x90 | len as u8);
        } else if len <= 0xffff {
            self.writer.u8u16(0xdc, len as u16);
        } else {
            self.writer.u8u32(0xdd, len);
        }
    }

    pub fn write_map_hdr(&mut self, len: u32) {
        if len <= 15 {
            self.writer.u8(0x80 | len as u8);
        } else if len <= 0xffff {
            self.writer.u8u16(0xde, len as u16);
        } else {
            self.writer.u8u32(0xdf, len);
        }
    }

    /// Writes the payload past a reserved header slot, then moves it back
    /// behind the header that matches its actual length.
    pub fn write_ext(&mut self, ext: &PackExtension) -> Result<(), CodecError> {
        let kind = match ext.tag {
            TypeTag::Code(code) if code <= MSGPACK_MAX_EXT => code as u8,
            ref tag => return Err(unsupported(format!("extension tag {tag}"))),
        };
        let start = self.writer.x;
        self.writer.ensure_capacity(EXT_HDR_MAX);
        self.writer.x = start + EXT_HDR_MAX;
        self.write_any(&ext.val)?;
        let payload = start + EXT_HDR_MAX;
        let len = self.writer.x - payload;

        let mut hdr = [0u8; EXT_HDR_MAX];
        let hdr_len = match len {
            1 => fixext(&mut hdr, 0xd4, kind),
            2 => fixext(&mut hdr, 0xd5, kind),
            4 => fixext(&mut hdr, 0xd6, kind),
            8 => fixext(&mut hdr, 0xd7, kind),
            16 => fixext(&mut hdr, 0xd8, kind),
            _ if len <= 0xff => {
                hdr[..3].copy_from_slice(&[0xc7, len as u8, kind]);
                3
            }
            _ if len <= 0xffff => {
                hdr[0] = 0xc8;
                hdr[1..3].copy_from_slice(&(len as u16).to_be_bytes());
                hdr[3] = kind;
                4
            }
            _ => {
                hdr[0] = 0xc9;
                hdr[1..5].copy_from_slice(&len32(len, "extension payload")?.to_be_bytes());
                hdr[5] = kind;
                6
            }
        };

        let buf = &mut self.writer.uint8;
        buf.copy_within(payload..payload + len, start + hdr_len);
        buf[start..start + hdr_len].copy_from_slice(&hdr[..hdr_len]);
        self.writer.x = start + hdr_len + len;
        Ok(())
    }
}

fn fixext(hdr: &mut [u8; EXT_HDR_MAX], marker: u8, kind: u8) -> usize {
    hdr[0] = marker;
    hdr[1] = kind;
    2
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: &PackValue) -> Vec<u8> {
        MsgPackEncoder::new().encode(value).unwrap()
    }

    #[test]
    fn integer_families() {
        assert_eq!(encode(&PackValue::Integer(5)), vec![0x05]);
        assert_eq!(encode(&PackValue::Integer(200)), vec![0xcc, 200]);
        assert_eq!(encode(&PackValue::Integer(-1)), vec![0xff]);
        assert_eq!(encode(&PackValue::Integer(-33)), vec![0xd0, 0xdf]);
        assert_eq!(encode(&PackValue::Integer(-129)), vec![0xd1, 0xff, 0x7f]);
        assert_eq!(encode(&PackValue::Integer(1 << 40))[0], 0xcf);
        assert_eq!(encode(&PackValue::Integer(i64::MIN))[0], 0xd3);
    }

    #[test]
    fn fixext_header_is_closed_up() {
        let ext = PackExtension::new(TypeTag::Code(20), PackValue::Bool(true));
        assert_eq!(encode(&PackValue::Extension(ext)), vec![0xd4, 20, 0xc3]);
    }

    #[test]
    fn ext8_header() {
        let ext = PackExtension::new(TypeTag::Code(3), PackValue::Str("abcd".into()));
        assert_eq!(
            encode(&PackValue::Extension(ext)),
            vec![0xc7, 5, 3, 0xa4, b'a', b'b', b'c', b'd']
        );
    }

    #[test]
    fn nested_in_array() {
        let ext = PackExtension::new(TypeTag::Code(1), PackValue::Integer(7));
        let value = PackValue::Array(vec![PackValue::Extension(ext), PackValue::Null]);
        assert_eq!(encode(&value), vec![0x92, 0xd4, 1, 0x07, 0xc0]);
    }

    #[test]
    fn named_tag_is_unsupported() {
        let ext = PackExtension::new(TypeTag::from("x"), PackValue::Null);
        let err = MsgPackEncoder::new()
            .encode(&PackValue::Extension(ext))
            .unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedType { codec: CodecId::MsgPack, .. }));
    }
}
