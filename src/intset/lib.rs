use std::fmt;

use crate::intset::{
    INT16_MAX, INT16_MIN, INT32_MAX, INT32_MIN, INTSET_ENC_INT16, INTSET_ENC_INT32,
    INTSET_ENC_INT64, INTSET_HEADER_SIZE,
};

/// Width used to store every element of a set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u32)]
pub enum Encoding {
    Int16 = INTSET_ENC_INT16,
    Int32 = INTSET_ENC_INT32,
    Int64 = INTSET_ENC_INT64,
}

impl Encoding {
    /// Smallest encoding able to hold `v`.
    pub fn for_value(v: i64) -> Self {
        if !(INT32_MIN..=INT32_MAX).contains(&v) {
            Encoding::Int64
        } else if !(INT16_MIN..=INT16_MAX).contains(&v) {
            Encoding::Int32
        } else {
            Encoding::Int16
        }
    }

    pub fn from_u32(raw: u32) -> Option<Self> {
        match raw {
            INTSET_ENC_INT16 => Some(Encoding::Int16),
            INTSET_ENC_INT32 => Some(Encoding::Int32),
            INTSET_ENC_INT64 => Some(Encoding::Int64),
            _ => None,
        }
    }

    /// Element size in bytes.
    #[inline]
    pub fn width(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Int16 => write!(f, "int16"),
            Encoding::Int32 => write!(f, "int32"),
            Encoding::Int64 => write!(f, "int64"),
        }
    }
}

pub fn intset_value_encoding(v: i64) -> Encoding {
    Encoding::for_value(v)
}

/// Byte offset of logical index `pos` inside a blob.
#[inline]
pub fn element_offset(pos: usize, enc: Encoding) -> usize {
    INTSET_HEADER_SIZE + pos * enc.width()
}

/// Reads the element at `pos` from a whole blob (header included).
pub fn decode(buf: &[u8], pos: usize, enc: Encoding) -> i64 {
    let offset = element_offset(pos, enc);
    match enc {
        Encoding::Int64 => {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(&buf[offset..offset + 8]);
            i64::from_le_bytes(bytes)
        }
        Encoding::Int32 => {
            let mut bytes = [0u8; 4];
            bytes.copy_from_slice(&buf[offset..offset + 4]);
            i32::from_le_bytes(bytes) as i64
        }
        Encoding::Int16 => {
            let mut bytes = [0u8; 2];
            bytes.copy_from_slice(&buf[offset..offset + 2]);
            i16::from_le_bytes(bytes) as i64
        }
    }
}

/// Writes `value` at `pos`. The caller guarantees `value` fits `enc`.
pub fn encode(buf: &mut [u8], pos: usize, enc: Encoding, value: i64) {
    debug_assert!(Encoding::for_value(value) <= enc);
    let offset = element_offset(pos, enc);
    match enc {
        Encoding::Int64 => buf[offset..offset + 8].copy_from_slice(&value.to_le_bytes()),
        Encoding::Int32 => buf[offset..offset + 4].copy_from_slice(&(value as i32).to_le_bytes()),
        Encoding::Int16 => buf[offset..offset + 2].copy_from_slice(&(value as i16).to_le_bytes()),
    }
}

pub fn read_u32(buf: &[u8], offset: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&buf[offset..offset + 4]);
    u32::from_le_bytes(bytes)
}

pub fn write_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}
