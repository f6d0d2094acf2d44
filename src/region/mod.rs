//! Tainted-region tracking: the set of bitmap pixels known to be not fully transparent.
//!
//! Regions are disjoint rectangle unions stored with a coordinate width fixed at bitmap
//! creation. Small bitmaps use 16-bit boxes; bitmaps with a dimension beyond `i16::MAX` switch
//! to 32-bit boxes.

pub(crate) mod coord;
pub(crate) mod tainted;
pub(crate) mod tracker;

pub use coord::RegionCoord;
pub use tainted::TaintedRegion;
pub use tracker::{Overlap, Region, RegionBox};
