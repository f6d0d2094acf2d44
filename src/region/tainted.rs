use crate::foundation::core::IntRect;
use crate::region::tracker::{Overlap, Region};

/// Tainted area of one bitmap, with the coordinate width chosen once at creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TaintedRegion {
    /// 16-bit boxes, for bitmaps whose largest dimension fits `i16`.
    Narrow(Region<i16>),
    /// 32-bit boxes, for larger bitmaps.
    Wide(Region<i32>),
}

macro_rules! dispatch {
    ($self:expr, $r:ident => $body:expr) => {
        match $self {
            TaintedRegion::Narrow($r) => $body,
            TaintedRegion::Wide($r) => $body,
        }
    };
}

impl TaintedRegion {
    /// Pick the coordinate width for a bitmap of `width` x `height`.
    pub fn for_size(width: i32, height: i32) -> Self {
        let limit = i32::from(i16::MAX);
        if width > limit || height > limit {
            Self::Wide(Region::new())
        } else {
            Self::Narrow(Region::new())
        }
    }

    /// `true` for the 32-bit variant.
    pub fn is_wide(&self) -> bool {
        matches!(self, Self::Wide(_))
    }

    /// Mark `rect` as painted.
    pub fn add(&mut self, rect: IntRect) {
        dispatch!(self, r => r.add(rect))
    }

    /// Mark `rect` as transparent.
    pub fn subtract(&mut self, rect: IntRect) {
        dispatch!(self, r => r.subtract(rect))
    }

    /// Forget every painted area.
    pub fn clear(&mut self) {
        dispatch!(self, r => r.clear())
    }

    /// Three-way classification of `rect`.
    pub fn overlap(&self, rect: IntRect) -> Overlap {
        dispatch!(self, r => r.overlap(rect))
    }

    /// `true` unless `rect` is fully outside the painted area.
    pub fn touches(&self, rect: IntRect) -> bool {
        dispatch!(self, r => r.touches(rect))
    }

    /// `true` when nothing is painted.
    pub fn is_empty(&self) -> bool {
        dispatch!(self, r => r.is_empty())
    }

    /// Number of painted pixels.
    pub fn area(&self) -> i64 {
        dispatch!(self, r => r.area())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/region/tainted.rs"]
mod tests;
