//! Fixed-point number formats.
//!
//! Envelope levels are stored as plain bytes ([`Q8n0`]), but ramps are
//! computed in [`Q15n16`] so that per-sample increments smaller than one
//! level step still accumulate. Conversions between the two are exact in the
//! upward direction and truncating (then saturating) in the downward one.

use core::ops::{Add, Sub};

/// Unsigned 8-bit integer level, 0-255.
pub type Q8n0 = u8;

/// Number of fractional bits in [`Q15n16`].
pub const Q16_FRACTIONAL_BITS: u32 = 16;

/// Signed fixed-point value with 15 integer bits and 16 fractional bits.
///
/// # Example
///
/// ```rust
/// use expenv_core::Q15n16;
///
/// let level = Q15n16::from_q8n0(200);
/// assert_eq!(level.raw(), 200 << 16);
/// assert_eq!(level.to_q8n0(), 200);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Q15n16(i32);

impl Q15n16 {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Largest representable 8-bit level, 255.0.
    pub const FULL_SCALE: Self = Self((u8::MAX as i32) << Q16_FRACTIONAL_BITS);

    /// Wrap a raw fixed-point bit pattern.
    #[inline]
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// The raw fixed-point bit pattern.
    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Widen an 8-bit level into fixed point.
    #[inline]
    pub const fn from_q8n0(level: Q8n0) -> Self {
        Self((level as i32) << Q16_FRACTIONAL_BITS)
    }

    /// Integer part as an 8-bit level.
    ///
    /// The fractional part is truncated; values outside 0-255 saturate.
    #[inline]
    pub const fn to_q8n0(self) -> Q8n0 {
        let whole = self.0 >> Q16_FRACTIONAL_BITS;
        if whole < 0 {
            0
        } else if whole > u8::MAX as i32 {
            u8::MAX
        } else {
            whole as u8
        }
    }
}

impl From<Q8n0> for Q15n16 {
    fn from(level: Q8n0) -> Self {
        Self::from_q8n0(level)
    }
}

impl Add for Q15n16 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0.wrapping_add(rhs.0))
    }
}

impl Sub for Q15n16 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0.wrapping_sub(rhs.0))
    }
}
