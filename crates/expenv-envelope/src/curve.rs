//! Exponential decay shaping by table lookup.
//!
//! The interpolator only ever produces straight lines. During the decay phase
//! each sampled value is used as an index into a 256-entry table that maps
//! the linear ramp onto an exponential-looking curve: a steep drop followed
//! by a long tail, like the decay of an analog drum voice.
//!
//! Two tables are provided:
//!
//! - [`POWER_LAW_TABLE`]: `y = 255^(x/255)`, the steepest shape.
//! - [`SOFT_TABLE`]: `y = round(275 * 1.01^(x - 255)) - 22`, a gentler
//!   curve with headroom at the top.
//!
//! A [`DecayCurve`] pairs a table with the compensation applied to decay
//! times. For the soft curve the caller's decay time is stretched by
//! `256 / ten_percent_index` so that the configured time is the time to
//! fall to 10% of full scale rather than to the floor.

use libm::{exp, log, pow, round};

/// Number of entries in a curve table.
pub const CURVE_TABLE_LEN: usize = 256;

/// A 256-entry mapping from a linear level to a shaped level.
///
/// Tables are monotonically non-decreasing.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CurveTable([u8; CURVE_TABLE_LEN]);

impl CurveTable {
    /// Wrap a table.
    pub const fn new(entries: [u8; CURVE_TABLE_LEN]) -> Self {
        Self(entries)
    }

    /// Shaped value for a linear level.
    #[inline]
    pub const fn lookup(&self, linear: u8) -> u8 {
        self.0[linear as usize]
    }

    /// All entries.
    pub const fn entries(&self) -> &[u8; CURVE_TABLE_LEN] {
        &self.0
    }

    /// Smallest index whose entry is at least `value`.
    ///
    /// Returns `None` if no entry reaches `value`.
    pub fn first_index_at_least(&self, value: u8) -> Option<usize> {
        self.0.iter().position(|&e| e >= value)
    }

    /// Check that no entry is smaller than the one before it.
    pub fn is_monotonic(&self) -> bool {
        self.0.windows(2).all(|w| w[0] <= w[1])
    }
}

impl core::fmt::Debug for CurveTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CurveTable")
            .field("first", &self.0[0])
            .field("last", &self.0[CURVE_TABLE_LEN - 1])
            .finish()
    }
}

/// Pure power-law table, `255^(x/255)`; entry 150 is the 10% point.
pub static POWER_LAW_TABLE: CurveTable = CurveTable::new([
    0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, //
    1, 1, 1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, //
    2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 3, 3, 3, 3, 3, //
    3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 4, 4, 4, 4, 4, 4, //
    4, 4, 4, 4, 4, 4, 5, 5, 5, 5, 5, 5, 5, 5, 5, 6, //
    6, 6, 6, 6, 6, 6, 6, 7, 7, 7, 7, 7, 7, 8, 8, 8, //
    8, 8, 8, 9, 9, 9, 9, 9, 10, 10, 10, 10, 10, 11, 11, 11, //
    11, 12, 12, 12, 12, 13, 13, 13, 14, 14, 14, 14, 15, 15, 15, 16, //
    16, 16, 17, 17, 18, 18, 18, 19, 19, 20, 20, 21, 21, 21, 22, 22, //
    23, 23, 24, 24, 25, 25, 26, 27, 27, 28, 28, 29, 30, 30, 31, 32, //
    32, 33, 34, 35, 35, 36, 37, 38, 39, 39, 40, 41, 42, 43, 44, 45, //
    46, 47, 48, 49, 50, 51, 52, 53, 55, 56, 57, 58, 59, 61, 62, 63, //
    65, 66, 68, 69, 71, 72, 74, 76, 77, 79, 81, 82, 84, 86, 88, 90, //
    92, 94, 96, 98, 100, 102, 105, 107, 109, 112, 114, 117, 119, 122, 124, 127, //
    130, 133, 136, 139, 142, 145, 148, 151, 155, 158, 162, 165, 169, 172, 176, 180, //
    184, 188, 192, 196, 201, 205, 210, 214, 219, 224, 229, 234, 239, 244, 250, 255, //
]);

/// Softened table built on base 1.01; tops out at 253.
pub static SOFT_TABLE: CurveTable = CurveTable::new([
    0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, //
    3, 4, 4, 4, 5, 5, 5, 5, 6, 6, 6, 6, 7, 7, 7, 8, //
    8, 8, 9, 9, 9, 9, 10, 10, 10, 11, 11, 11, 12, 12, 12, 13, //
    13, 13, 14, 14, 14, 15, 15, 16, 16, 16, 17, 17, 18, 18, 18, 19, //
    19, 20, 20, 20, 21, 21, 22, 22, 23, 23, 23, 24, 24, 25, 25, 26, //
    26, 27, 27, 28, 28, 29, 29, 30, 30, 31, 31, 32, 32, 33, 33, 34, //
    35, 35, 36, 36, 37, 37, 38, 39, 39, 40, 40, 41, 42, 42, 43, 44, //
    44, 45, 46, 46, 47, 48, 48, 49, 50, 50, 51, 52, 53, 53, 54, 55, //
    56, 56, 57, 58, 59, 60, 60, 61, 62, 63, 64, 65, 66, 66, 67, 68, //
    69, 70, 71, 72, 73, 74, 75, 76, 77, 78, 79, 80, 81, 82, 83, 84, //
    85, 86, 87, 88, 89, 90, 91, 93, 94, 95, 96, 97, 98, 100, 101, 102, //
    103, 105, 106, 107, 108, 110, 111, 112, 114, 115, 116, 118, 119, 121, 122, 123, //
    125, 126, 128, 129, 131, 132, 134, 136, 137, 139, 140, 142, 144, 145, 147, 149, //
    150, 152, 154, 155, 157, 159, 161, 163, 165, 166, 168, 170, 172, 174, 176, 178, //
    180, 182, 184, 186, 188, 190, 192, 195, 197, 199, 201, 203, 206, 208, 210, 213, //
    215, 217, 220, 222, 224, 227, 229, 232, 234, 237, 240, 242, 245, 248, 250, 253, //
]);

/// Distance from the top of the soft table to its 10% point.
pub const SOFT_TEN_PERCENT_INDEX: u32 = 191;

/// Closed form of [`POWER_LAW_TABLE`] entry `index`.
///
/// Entry 0 of the stored table is pinned to 0 so a fully decayed voice is
/// silent; the formula gives 1 there.
pub fn power_law_entry(index: u8) -> u8 {
    let base = exp(log(255.0) / 255.0);
    round(pow(base, f64::from(index))) as u8
}

/// Closed form of [`SOFT_TABLE`] entry `index`.
pub fn soft_entry(index: u8) -> u8 {
    let y = round(275.0 * pow(1.01, f64::from(index) - 255.0)) - 22.0;
    y.clamp(0.0, 255.0) as u8
}

/// Which decay table an engine uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CurveKind {
    /// [`SOFT_TABLE`] with 10% decay-time compensation.
    #[default]
    Soft,
    /// [`POWER_LAW_TABLE`] with decay times used as given.
    PowerLaw,
}

impl CurveKind {
    /// Lowercase name used in patch files and on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            CurveKind::Soft => "soft",
            CurveKind::PowerLaw => "power",
        }
    }
}

/// A decay table paired with its decay-time compensation.
///
/// Chosen once when the engine is built.
///
/// # Example
///
/// ```rust
/// use expenv_envelope::DecayCurve;
///
/// let curve = DecayCurve::SOFT;
/// // 191 ms to 10% becomes 256 ms to the floor
/// assert_eq!(curve.compensate_decay_ms(191), 256);
/// assert_eq!(DecayCurve::POWER_LAW.compensate_decay_ms(191), 191);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecayCurve {
    kind: CurveKind,
    table: &'static CurveTable,
    ten_percent_index: Option<u32>,
}

impl DecayCurve {
    /// Soft table, decay time measured to the 10% point.
    pub const SOFT: Self = Self {
        kind: CurveKind::Soft,
        table: &SOFT_TABLE,
        ten_percent_index: Some(SOFT_TEN_PERCENT_INDEX),
    };

    /// Power-law table, decay time measured to the floor.
    pub const POWER_LAW: Self = Self {
        kind: CurveKind::PowerLaw,
        table: &POWER_LAW_TABLE,
        ten_percent_index: None,
    };

    /// Curve for a [`CurveKind`].
    pub const fn from_kind(kind: CurveKind) -> Self {
        match kind {
            CurveKind::Soft => Self::SOFT,
            CurveKind::PowerLaw => Self::POWER_LAW,
        }
    }

    /// Which table this is.
    pub const fn kind(&self) -> CurveKind {
        self.kind
    }

    /// The lookup table.
    pub const fn table(&self) -> &'static CurveTable {
        self.table
    }

    /// Compensation divisor, if any.
    pub const fn ten_percent_index(&self) -> Option<u32> {
        self.ten_percent_index
    }

    /// Shape a linearly interpolated level.
    #[inline]
    pub const fn apply(&self, linear: u8) -> u8 {
        self.table.lookup(linear)
    }

    /// Stretch a decay time so it means "time to 10%".
    ///
    /// Saturates at `u32::MAX`.
    pub const fn compensate_decay_ms(&self, msec: u32) -> u32 {
        match self.ten_percent_index {
            Some(index) if index > 0 => {
                let scaled = msec as u64 * 256 / index as u64;
                if scaled > u32::MAX as u64 {
                    u32::MAX
                } else {
                    scaled as u32
                }
            }
            _ => msec,
        }
    }
}

impl Default for DecayCurve {
    fn default() -> Self {
        Self::SOFT
    }
}

impl From<CurveKind> for DecayCurve {
    fn from(kind: CurveKind) -> Self {
        Self::from_kind(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_monotonic() {
        assert!(POWER_LAW_TABLE.is_monotonic());
        assert!(SOFT_TABLE.is_monotonic());
    }

    #[test]
    fn table_endpoints() {
        assert_eq!(POWER_LAW_TABLE.lookup(0), 0);
        assert_eq!(POWER_LAW_TABLE.lookup(255), 255);
        assert_eq!(SOFT_TABLE.lookup(0), 0);
        assert_eq!(SOFT_TABLE.lookup(255), 253);
    }

    #[test]
    fn power_law_ten_percent_point() {
        // 26 is 10% of full scale
        assert_eq!(POWER_LAW_TABLE.lookup(150), 26);
        assert_eq!(POWER_LAW_TABLE.first_index_at_least(26), Some(150));
    }

    #[test]
    fn stored_tables_match_closed_forms() {
        for i in 1..=255u8 {
            let p = i16::from(power_law_entry(i));
            let s = i16::from(soft_entry(i));
            assert!(
                (p - i16::from(POWER_LAW_TABLE.lookup(i))).abs() <= 1,
                "power law entry {i}: formula {p}, table {}",
                POWER_LAW_TABLE.lookup(i)
            );
            assert!(
                (s - i16::from(SOFT_TABLE.lookup(i))).abs() <= 1,
                "soft entry {i}: formula {s}, table {}",
                SOFT_TABLE.lookup(i)
            );
        }
    }

    #[test]
    fn compensation() {
        assert_eq!(DecayCurve::SOFT.compensate_decay_ms(0), 0);
        assert_eq!(DecayCurve::SOFT.compensate_decay_ms(1000), 1340);
        assert_eq!(DecayCurve::POWER_LAW.compensate_decay_ms(1000), 1000);
        assert_eq!(DecayCurve::SOFT.compensate_decay_ms(u32::MAX), u32::MAX);
    }

    #[test]
    fn curve_kind_roundtrip() {
        for kind in [CurveKind::Soft, CurveKind::PowerLaw] {
            assert_eq!(DecayCurve::from_kind(kind).kind(), kind);
        }
        assert_eq!(DecayCurve::default(), DecayCurve::SOFT);
    }

    #[test]
    fn apply_is_direct_lookup() {
        for i in 0..=255u8 {
            assert_eq!(DecayCurve::SOFT.apply(i), SOFT_TABLE.lookup(i));
            assert_eq!(DecayCurve::POWER_LAW.apply(i), POWER_LAW_TABLE.lookup(i));
        }
    }
}
