//! Tag value types
//!
//! This module defines the closed set of value types that can be stored in
//! integer-keyed tag maps (TIFF custom tags, JPEG custom EXIF tags).

use std::fmt;

/// Size charged for a [`TagValue::Opaque`] value
pub const OPAQUE_VALUE_SIZE: u64 = 16;

/// Heterogeneous tag value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TagValue {
    /// ASCII / UTF-8 string value
    Str(String),
    /// Raw BYTE or UNDEFINED payload
    Bytes(Vec<u8>),
    /// SHORT array
    Shorts(Vec<u16>),
    /// SLONG array
    Ints(Vec<i32>),
    /// LONG array
    Longs(Vec<u32>),
    /// RATIONAL array (numerator, denominator)
    Rationals(Vec<(u32, u32)>),
    /// DOUBLE array
    Doubles(Vec<f64>),
    /// A value whose layout is not modelled
    Opaque,
}

impl TagValue {
    /// Serialized size of the value in bytes
    pub fn byte_size(&self) -> u64 {
        match self {
            TagValue::Str(s) => s.len() as u64,
            TagValue::Bytes(b) => b.len() as u64,
            TagValue::Shorts(v) => v.len() as u64 * 2,
            TagValue::Ints(v) => v.len() as u64 * 4,
            TagValue::Longs(v) => v.len() as u64 * 4,
            TagValue::Rationals(v) => v.len() as u64 * 8,
            TagValue::Doubles(v) => v.len() as u64 * 8,
            TagValue::Opaque => OPAQUE_VALUE_SIZE,
        }
    }

    /// Number of elements (characters for strings, bytes for payloads)
    pub fn count(&self) -> usize {
        match self {
            TagValue::Str(s) => s.len(),
            TagValue::Bytes(b) => b.len(),
            TagValue::Shorts(v) => v.len(),
            TagValue::Ints(v) => v.len(),
            TagValue::Longs(v) => v.len(),
            TagValue::Rationals(v) => v.len(),
            TagValue::Doubles(v) => v.len(),
            TagValue::Opaque => 0,
        }
    }

    /// Get the value as a string, if it is a string type
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TagValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as a byte slice, if it is a byte payload
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            TagValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Get the first integer of a numeric array, widened to `i64`
    pub fn first_int(&self) -> Option<i64> {
        match self {
            TagValue::Shorts(v) => v.first().map(|x| *x as i64),
            TagValue::Ints(v) => v.first().map(|x| *x as i64),
            TagValue::Longs(v) => v.first().map(|x| *x as i64),
            _ => None,
        }
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Str(s) => write!(f, "{}", s),
            TagValue::Bytes(b) => write!(f, "[{} bytes]", b.len()),
            TagValue::Shorts(v) => write!(f, "{:?}", v),
            TagValue::Ints(v) => write!(f, "{:?}", v),
            TagValue::Longs(v) => write!(f, "{:?}", v),
            TagValue::Rationals(v) => {
                let parts: Vec<String> = v.iter().map(|(n, d)| format!("{}/{}", n, d)).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            TagValue::Doubles(v) => write!(f, "{:?}", v),
            TagValue::Opaque => write!(f, "[Opaque]"),
        }
    }
}

impl From<String> for TagValue {
    fn from(s: String) -> Self {
        TagValue::Str(s)
    }
}

impl From<&str> for TagValue {
    fn from(s: &str) -> Self {
        TagValue::Str(s.to_string())
    }
}

impl From<Vec<u8>> for TagValue {
    fn from(b: Vec<u8>) -> Self {
        TagValue::Bytes(b)
    }
}

impl From<Vec<u16>> for TagValue {
    fn from(v: Vec<u16>) -> Self {
        TagValue::Shorts(v)
    }
}

impl From<Vec<i32>> for TagValue {
    fn from(v: Vec<i32>) -> Self {
        TagValue::Ints(v)
    }
}

impl From<Vec<u32>> for TagValue {
    fn from(v: Vec<u32>) -> Self {
        TagValue::Longs(v)
    }
}

impl From<Vec<f64>> for TagValue {
    fn from(v: Vec<f64>) -> Self {
        TagValue::Doubles(v)
    }
}
