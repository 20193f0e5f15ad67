//! CBOR constants.

// MAJOR type values (bits 7-5 of the initial byte)
pub const MAJOR_UIN: u8 = 0b000;
pub const MAJOR_NIN: u8 = 0b001;
pub const MAJOR_BIN: u8 = 0b010;
pub const MAJOR_STR: u8 = 0b011;
pub const MAJOR_ARR: u8 = 0b100;
pub const MAJOR_MAP: u8 = 0b101;
pub const MAJOR_TAG: u8 = 0b110;
pub const MAJOR_TKN: u8 = 0b111;

pub const MINOR_MASK: u8 = 0b11111;

// Additional-information values
pub const MINOR_U8: u8 = 24;
pub const MINOR_U16: u8 = 25;
pub const MINOR_U32: u8 = 26;
pub const MINOR_U64: u8 = 27;
pub const MINOR_INDEFINITE: u8 = 31;

// Simple values / floats (major 7)
pub const TKN_FALSE: u8 = 0xf4;
pub const TKN_TRUE: u8 = 0xf5;
pub const TKN_NULL: u8 = 0xf6;
pub const TKN_UNDEFINED: u8 = 0xf7;
pub const TKN_F16: u8 = 0xf9;
pub const TKN_F32: u8 = 0xfa;
pub const TKN_F64: u8 = 0xfb;

/// Tag 27: serialised language-independent object, `[typename, *args]`.
pub const TAG_TYPED_OBJECT: u64 = 27;
