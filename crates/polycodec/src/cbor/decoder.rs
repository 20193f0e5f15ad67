//! `CborDecoder`: CBOR decoder producing [`PackValue`] trees.

use polycodec_buffers::Reader;

use super::constants::*;
use super::CborError;
use crate::registry::TypeTag;
use crate::{PackExtension, PackValue, MAX_DEPTH};

/// Decodes exactly one definite-length CBOR data item.
///
/// Indefinite-length items, half-precision floats and tags other than
/// [`TAG_TYPED_OBJECT`] are rejected, as is nesting deeper than
/// [`MAX_DEPTH`].
#[derive(Debug, Default, Clone, Copy)]
pub struct CborDecoder;

impl CborDecoder {
    pub fn new() -> Self {
        Self
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<PackValue, CborError> {
        let mut reader = Reader::new(bytes);
        let value = read_any(&mut reader, 0)?;
        if !reader.is_empty() {
            return Err(CborError::TrailingBytes(reader.size()));
        }
        Ok(value)
    }
}

fn read_any(r: &mut Reader<'_>, depth: usize) -> Result<PackValue, CborError> {
    if depth > MAX_DEPTH {
        return Err(CborError::TooDeep);
    }
    let octet = r.u8()?;
    let major = octet >> 5;
    let minor = octet & MINOR_MASK;
    match major {
        MAJOR_UIN => {
            let uint = read_arg(r, minor)?;
            i64::try_from(uint)
                .map(PackValue::Integer)
                .map_err(|_| CborError::IntegerOverflow)
        }
        MAJOR_NIN => {
            let uint = read_arg(r, minor)?;
            let n = i64::try_from(uint).map_err(|_| CborError::IntegerOverflow)?;
            Ok(PackValue::Integer(-1 - n))
        }
        MAJOR_BIN => {
            let len = read_len(r, minor, 1)?;
            Ok(PackValue::Bytes(r.buf(len)?.to_vec()))
        }
        MAJOR_STR => {
            let len = read_len(r, minor, 1)?;
            Ok(PackValue::Str(r.utf8(len)?.to_owned()))
        }
        MAJOR_ARR => {
            let len = read_len(r, minor, 1)?;
            let mut arr = Vec::with_capacity(len);
            for _ in 0..len {
                arr.push(read_any(r, depth + 1)?);
            }
            Ok(PackValue::Array(arr))
        }
        MAJOR_MAP => {
            let len = read_len(r, minor, 2)?;
            let mut pairs = Vec::with_capacity(len);
            for _ in 0..len {
                let key = read_any(r, depth + 1)?;
                let value = read_any(r, depth + 1)?;
                pairs.push((key, value));
            }
            Ok(PackValue::Map(pairs))
        }
        MAJOR_TAG => {
            let tag = read_arg(r, minor)?;
            if tag != TAG_TYPED_OBJECT {
                return Err(CborError::UnexpectedTag(tag));
            }
            read_typed_object(r, depth + 1)
        }
        _ => read_token(r, octet),
    }
}

fn read_token(r: &mut Reader<'_>, octet: u8) -> Result<PackValue, CborError> {
    debug_assert_eq!(octet >> 5, MAJOR_TKN);
    match octet {
        TKN_FALSE => Ok(PackValue::Bool(false)),
        TKN_TRUE => Ok(PackValue::Bool(true)),
        TKN_NULL | TKN_UNDEFINED => Ok(PackValue::Null),
        TKN_F32 => Ok(PackValue::Float(f64::from(r.f32()?))),
        TKN_F64 => Ok(PackValue::Float(r.f64()?)),
        TKN_F16 => Err(CborError::Unsupported("half-precision float")),
        _ if octet & MINOR_MASK == MINOR_INDEFINITE => Err(CborError::Unsupported("break")),
        _ => Err(CborError::UnexpectedMinor(octet & MINOR_MASK)),
    }
}

fn read_typed_object(r: &mut Reader<'_>, depth: usize) -> Result<PackValue, CborError> {
    let mut items = match read_any(r, depth)? {
        PackValue::Array(items) if items.len() == 2 => items,
        _ => return Err(CborError::InvalidTypedObject),
    };
    let val = items.pop().ok_or(CborError::InvalidTypedObject)?;
    // Types are registered with CBOR by name only.
    let tag = match items.pop() {
        Some(PackValue::Str(name)) => TypeTag::Name(name),
        _ => return Err(CborError::InvalidTypedObject),
    };
    Ok(PackValue::Extension(PackExtension::new(tag, val)))
}

fn read_arg(r: &mut Reader<'_>, minor: u8) -> Result<u64, CborError> {
    match minor {
        0..=23 => Ok(u64::from(minor)),
        MINOR_U8 => Ok(u64::from(r.u8()?)),
        MINOR_U16 => Ok(u64::from(r.u16()?)),
        MINOR_U32 => Ok(u64::from(r.u32()?)),
        MINOR_U64 => Ok(r.u64()?),
        MINOR_INDEFINITE => Err(CborError::Unsupported("indefinite length")),
        _ => Err(CborError::UnexpectedMinor(minor)),
    }
}

/// Reads a length and rejects it up front when the remaining input cannot
/// hold `len * min_item_size` bytes.
fn read_len(r: &mut Reader<'_>, minor: u8, min_item_size: usize) -> Result<usize, CborError> {
    let len = read_arg(r, minor)?;
    usize::try_from(len)
        .ok()
        .filter(|len| len.saturating_mul(min_item_size) <= r.size())
        .ok_or(CborError::InvalidSize)
}
