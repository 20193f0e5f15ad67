//! `MsgPackDecoder`: MessagePack decoder producing [`PackValue`] trees.

use polycodec_buffers::Reader;

use super::MsgPackError;
use crate::registry::TypeTag;
use crate::{PackExtension, PackValue, MAX_DEPTH};

/// Decodes exactly one MessagePack item. `ext` payloads are decoded
/// recursively and must themselves be exactly one item. Nesting, `ext`
/// payloads included, is limited to [`MAX_DEPTH`].
#[derive(Debug, Default, Clone, Copy)]
pub struct MsgPackDecoder;

impl MsgPackDecoder {
    pub fn new() -> Self {
        Self
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<PackValue, MsgPackError> {
        let mut reader = Reader::new(bytes);
        let value = read_any(&mut reader, 0)?;
        if !reader.is_empty() {
            return Err(MsgPackError::TrailingBytes(reader.size()));
        }
        Ok(value)
    }
}

fn read_any(r: &mut Reader<'_>, depth: usize) -> Result<PackValue, MsgPackError> {
    if depth > MAX_DEPTH {
        return Err(MsgPackError::TooDeep);
    }
    let byte = r.u8()?;
    let value = match byte {
        0x00..=0x7f => PackValue::Integer(i64::from(byte)),
        0x80..=0x8f => read_map(r, usize::from(byte & 0x0f), depth)?,
        0x90..=0x9f => read_arr(r, usize::from(byte & 0x0f), depth)?,
        0xa0..=0xbf => read_str(r, usize::from(byte & 0x1f))?,
        0xc0 => PackValue::Null,
        0xc2 => PackValue::Bool(false),
        0xc3 => PackValue::Bool(true),
        0xc4 => {
            let len = usize::from(r.u8()?);
            read_bin(r, len)?
        }
        0xc5 => {
            let len = usize::from(r.u16()?);
            read_bin(r, len)?
        }
        0xc6 => {
            let len = r.u32()? as usize;
            read_bin(r, len)?
        }
        0xc7 => {
            let len = usize::from(r.u8()?);
            read_ext(r, len, depth)?
        }
        0xc8 => {
            let len = usize::from(r.u16()?);
            read_ext(r, len, depth)?
        }
        0xc9 => {
            let len = r.u32()? as usize;
            read_ext(r, len, depth)?
        }
        0xca => PackValue::Float(f64::from(r.f32()?)),
        0xcb => PackValue::Float(r.f64()?),
        0xcc => PackValue::Integer(i64::from(r.u8()?)),
        0xcd => PackValue::Integer(i64::from(r.u16()?)),
        0xce => PackValue::Integer(i64::from(r.u32()?)),
        0xcf => {
            let uint = r.u64()?;
            PackValue::Integer(i64::try_from(uint).map_err(|_| MsgPackError::IntegerOverflow)?)
        }
        0xd0 => PackValue::Integer(i64::from(r.i8()?)),
        0xd1 => PackValue::Integer(i64::from(r.i16()?)),
        0xd2 => PackValue::Integer(i64::from(r.i32()?)),
        0xd3 => PackValue::Integer(r.i64()?),
        0xd4 => read_ext(r, 1, depth)?,
        0xd5 => read_ext(r, 2, depth)?,
        0xd6 => read_ext(r, 4, depth)?,
        0xd7 => read_ext(r, 8, depth)?,
        0xd8 => read_ext(r, 16, depth)?,
        0xd9 => {
            let len = usize::from(r.u8()?);
            read_str(r, len)?
        }
        0xda => {
            let len = usize::from(r.u16()?);
            read_str(r, len)?
        }
        0xdb => {
            let len = r.u32()? as usize;
            read_str(r, len)?
        }
        0xdc => {
            let len = usize::from(r.u16()?);
            read_arr(r, len, depth)?
        }
        0xdd => {
            let len = r.u32()? as usize;
            read_arr(r, len, depth)?
        }
        0xde => {
            let len = usize::from(r.u16()?);
            read_map(r, len, depth)?
        }
        0xdf => {
            let len = r.u32()? as usize;
            read_map(r, len, depth)?
        }
        0xe0..=0xff => PackValue::Integer(i64::from(byte as i8)),
        _ => return Err(MsgPackError::InvalidByte(byte)),
    };
    Ok(value)
}

fn check_size(r: &Reader<'_>, len: usize, min_item_size: usize) -> Result<(), MsgPackError> {
    if len.saturating_mul(min_item_size) > r.size() {
        return Err(MsgPackError::InvalidSize);
    }
    Ok(())
}

fn read_str(r: &mut Reader<'_>, len: usize) -> Result<PackValue, MsgPackError> {
    check_size(r, len, 1)?;
    Ok(PackValue::Str(r.utf8(len)?.to_owned()))
}

fn read_bin(r: &mut Reader<'_>, len: usize) -> Result<PackValue, MsgPackError> {
    check_size(r, len, 1)?;
    Ok(PackValue::Bytes(r.buf(len)?.to_vec()))
}

fn read_arr(r: &mut Reader<'_>, len: usize, depth: usize) -> Result<PackValue, MsgPackError> {
    check_size(r, len, 1)?;
    let mut arr = Vec::with_capacity(len);
    for _ in 0..len {
        arr.push(read_any(r, depth + 1)?);
    }
    Ok(PackValue::Array(arr))
}

fn read_map(r: &mut Reader<'_>, len: usize, depth: usize) -> Result<PackValue, MsgPackError> {
    check_size(r, len, 2)?;
    let mut pairs = Vec::with_capacity(len);
    for _ in 0..len {
        let key = read_any(r, depth + 1)?;
        let value = read_any(r, depth + 1)?;
        pairs.push((key, value));
    }
    Ok(PackValue::Map(pairs))
}

fn read_ext(r: &mut Reader<'_>, len: usize, depth: usize) -> Result<PackValue, MsgPackError> {
    let kind = r.i8()?;
    if kind < 0 {
        return Err(MsgPackError::ReservedExtension(kind));
    }
    check_size(r, len, 1)?;
    let mut payload = Reader::new(r.buf(len)?);
    let val = read_any(&mut payload, depth + 1)?;
    if !payload.is_empty() {
        return Err(MsgPackError::TrailingBytes(payload.size()));
    }
    Ok(PackValue::Extension(PackExtension::new(
        TypeTag::Code(kind as u32),
        val,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msgpack::MsgPackEncoder;

    fn decode(bytes: &[u8]) -> Result<PackValue, MsgPackError> {
        MsgPackDecoder::new().decode(bytes)
    }

    #[test]
    fn decodes_what_the_encoder_writes() {
        let ext = PackExtension::new(
            TypeTag::Code(20),
            PackValue::Map(vec![(PackValue::Str("name".into()), PackValue::Str("blah".into()))]),
        );
        let value = PackValue::Array(vec![
            PackValue::Extension(ext),
            PackValue::Integer(-40_000),
            PackValue::Float(1.666),
            PackValue::Bytes(vec![1, 2, 3]),
        ]);
        let bytes = MsgPackEncoder::new().encode(&value).unwrap();
        assert_eq!(decode(&bytes), Ok(value));
    }

    #[test]
    fn negative_fixint() {
        assert_eq!(decode(&[0xe0]), Ok(PackValue::Integer(-32)));
    }

    #[test]
    fn reserved_ext_types_are_rejected() {
        // timestamp (-1)
        assert_eq!(
            decode(&[0xd6, 0xff, 0, 0, 0, 0]),
            Err(MsgPackError::ReservedExtension(-1))
        );
    }

    #[test]
    fn ext_payload_must_be_one_item() {
        assert_eq!(decode(&[0xd5, 0x01, 0x01, 0x02]), Err(MsgPackError::TrailingBytes(1)));
    }

    #[test]
    fn nesting_is_bounded() {
        let mut deep = vec![0x91; MAX_DEPTH];
        deep.push(0x00);
        assert!(decode(&deep).is_ok());

        let mut too_deep = vec![0x91; 500_000];
        too_deep.push(0x00);
        assert_eq!(decode(&too_deep), Err(MsgPackError::TooDeep));
    }

    #[test]
    fn ext_payloads_count_towards_depth() {
        // 65 ext levels, each wrapping a one-element array: 130 levels
        let mut nested = vec![0x00];
        for _ in 0..65 {
            let len = u16::try_from(nested.len() + 1).unwrap();
            let mut outer = vec![0xc8];
            outer.extend_from_slice(&len.to_be_bytes());
            outer.extend_from_slice(&[0x01, 0x91]);
            outer.extend_from_slice(&nested);
            nested = outer;
        }
        assert_eq!(decode(&nested), Err(MsgPackError::TooDeep));
    }

    #[test]
    fn malformed_input() {
        assert_eq!(decode(&[0xc1]), Err(MsgPackError::InvalidByte(0xc1)));
        assert_eq!(decode(&[0xa3, b'a']), Err(MsgPackError::InvalidSize));
        assert_eq!(decode(&[0xdd, 0xff, 0xff, 0xff, 0xff]), Err(MsgPackError::InvalidSize));
        assert_eq!(decode(&[0xcb, 0x00]), Err(MsgPackError::UnexpectedEof));
        assert_eq!(decode(&[0xc0, 0xc0]), Err(MsgPackError::TrailingBytes(1)));
    }
}
