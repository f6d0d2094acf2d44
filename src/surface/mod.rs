//! CPU-resident pixel surfaces: mega backing stores and readback caches.

pub(crate) mod sample;
pub(crate) mod surface;

pub use sample::{AxisMap, BlitMode};
pub use surface::Surface;
