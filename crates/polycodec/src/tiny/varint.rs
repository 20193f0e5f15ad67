//! LEB128 varints and zigzag mapping.

use polycodec_buffers::{Reader, Writer};

use super::TinyError;

pub fn write_uvarint(w: &mut Writer, mut v: u64) {
    while v >= 0x80 {
        w.u8(v as u8 | 0x80);
        v >>= 7;
    }
    w.u8(v as u8);
}

pub fn read_uvarint(r: &mut Reader<'_>) -> Result<u64, TinyError> {
    let mut result = 0u64;
    let mut shift = 0u32;
    loop {
        let byte = r.u8()?;
        // The tenth byte may only contribute the top bit.
        if shift == 63 && byte > 1 {
            return Err(TinyError::VarintOverflow);
        }
        result |= u64::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            return Ok(result);
        }
        shift += 7;
    }
}

pub fn zigzag(v: i64) -> u64 {
    ((v << 1) ^ (v >> 63)) as u64
}

pub fn unzigzag(v: u64) -> i64 {
    ((v >> 1) as i64) ^ -((v & 1) as i64)
}
