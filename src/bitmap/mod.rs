//! Bitmap engine: storage, lifecycle and every drawing operation.
//!
//! An [`Engine`] owns all bitmaps and the [`GpuDevice`](crate::gpu::GpuDevice) they live on.
//! Each bitmap is backed by one texture, a CPU surface (a "mega" bitmap, for sizes beyond the
//! texture limit) or a list of frame textures. Operations are split by concern across the
//! submodules but all hang off `Engine`.

pub(crate) mod blit;
pub(crate) mod child;
pub(crate) mod engine;
pub(crate) mod fill;
pub(crate) mod filters;
pub(crate) mod frames;
pub(crate) mod hires;
pub(crate) mod pixels;
pub(crate) mod store;

pub use engine::{Engine, FrameSelect, Sampling};
pub use store::{BackingKind, BitmapId, Font};
