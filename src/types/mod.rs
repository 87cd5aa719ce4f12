//! Tag value types
//!
//! This module defines the value types stored in per-tag maps.

pub mod value;

pub use value::TagValue;
