//! Sorted set of signed integers stored in a single packed blob.
//!
//! The blob starts with an 8 byte header (`encoding`, `length`, both u32
//! little-endian) followed by `length` elements of `encoding` bytes each.
//! Elements are kept ascending without duplicates. The width only ever
//! grows: `2 -> 4 -> 8`.

pub mod error;
pub mod intset;
pub mod iter;
pub mod lib;

pub const INTSET_ENC_INT16: u32 = 2;
pub const INTSET_ENC_INT32: u32 = 4;
pub const INTSET_ENC_INT64: u32 = 8;

/// encoding (u32) + length (u32)
pub const INTSET_HEADER_SIZE: usize = 8;

const INT16_MIN: i64 = i16::MIN as i64;
const INT16_MAX: i64 = i16::MAX as i64;
const INT32_MIN: i64 = i32::MIN as i64;
const INT32_MAX: i64 = i32::MAX as i64;
