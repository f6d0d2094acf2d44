use std::fmt::Debug;

/// Coordinate type usable for region boxes.
///
/// Conversions saturate, so rectangles reaching past the representable range are clamped to the
/// edge instead of wrapping around.
pub trait RegionCoord: Copy + Ord + Debug + Default {
    /// Smallest representable coordinate.
    const MIN: i64;
    /// Largest representable coordinate.
    const MAX: i64;

    /// Convert with saturation into `[MIN, MAX]`.
    fn saturating_from(v: i64) -> Self;

    /// Widen to `i64`.
    fn widen(self) -> i64;
}

impl RegionCoord for i16 {
    const MIN: i64 = i16::MIN as i64;
    const MAX: i64 = i16::MAX as i64;

    fn saturating_from(v: i64) -> Self {
        v.clamp(<Self as RegionCoord>::MIN, <Self as RegionCoord>::MAX) as i16
    }

    fn widen(self) -> i64 {
        i64::from(self)
    }
}

impl RegionCoord for i32 {
    const MIN: i64 = i32::MIN as i64;
    const MAX: i64 = i32::MAX as i64;

    fn saturating_from(v: i64) -> Self {
        v.clamp(<Self as RegionCoord>::MIN, <Self as RegionCoord>::MAX) as i32
    }

    fn widen(self) -> i64 {
        i64::from(self)
    }
}
