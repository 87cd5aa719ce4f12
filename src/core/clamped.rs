//! Range-clamped integer scalars
//!
//! Encoder settings such as quality or compression level are stored as
//! [`Clamped`] values. Every way of producing one (construction, `set`,
//! `From<i32>`, deserialization) clamps into `LO..=HI`, so an
//! out-of-range value can never be observed.

use std::fmt;

/// An `i32` that is always within `LO..=HI`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "i32", into = "i32"))]
pub struct Clamped<const LO: i32, const HI: i32>(i32);

/// Encoder quality, 0 (worst) to 100 (best)
pub type Quality = Clamped<0, 100>;

/// Compression effort, 0 (fastest) to 9 (smallest)
pub type CompressionLevel = Clamped<0, 9>;

impl<const LO: i32, const HI: i32> Clamped<LO, HI> {
    /// Lower bound of the range
    pub const MIN: i32 = LO;
    /// Upper bound of the range
    pub const MAX: i32 = HI;

    /// Create a new value, clamping `value` into the range
    pub fn new(value: i32) -> Self {
        Self(value.clamp(LO, HI))
    }

    /// Assign a new value, clamping it into the range
    pub fn set(&mut self, value: i32) {
        self.0 = value.clamp(LO, HI);
    }

    /// Get the stored value
    pub fn get(self) -> i32 {
        self.0
    }

    /// Check whether the stored value lies within the range
    ///
    /// Always `true` for values built through this type's API.
    pub fn in_range(self) -> bool {
        (LO..=HI).contains(&self.0)
    }
}

impl<const LO: i32, const HI: i32> From<i32> for Clamped<LO, HI> {
    fn from(value: i32) -> Self {
        Self::new(value)
    }
}

impl<const LO: i32, const HI: i32> From<Clamped<LO, HI>> for i32 {
    fn from(value: Clamped<LO, HI>) -> Self {
        value.0
    }
}

impl<const LO: i32, const HI: i32> fmt::Display for Clamped<LO, HI> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
