//! megabitmap is a hybrid GPU/CPU bitmap engine.
//!
//! Bitmaps live in an [`Engine`] and are backed by a device texture, by a CPU surface when
//! they exceed the texture limit ("mega" bitmaps), or by a list of frame textures for
//! animations. On top of that storage the engine provides:
//!
//! - Blits with flipping, clipping and opacity, picking a copy or blend path from the painted
//!   ("tainted") area of the destination
//! - Fills, gradients, blur, hue rotation and radial blur, tiled for mega bitmaps
//! - Frame sequencing driven by a per-frame run time
//! - Hi-res twins that mirror every mutation at a scaled resolution
//! - Child bitmaps that show a texture-sized window of a mega parent
//!
//! Device work goes through the [`GpuDevice`] trait; [`SoftwareGpu`] implements it on CPU
//! surfaces.
#![forbid(unsafe_code)]

pub(crate) mod animation;
pub(crate) mod assets;
pub(crate) mod bitmap;
pub(crate) mod config;
pub(crate) mod effects;
pub(crate) mod foundation;
/// Device contract and the software reference device.
pub mod gpu;
/// Painted-area tracking.
pub mod region;
pub(crate) mod surface;
pub(crate) mod viewport;

pub use crate::animation::Sequencer;
pub use crate::assets::{Decoded, ImageFormat, decode_image, encode_image};
pub use crate::bitmap::{BackingKind, BitmapId, Engine, Font, FrameSelect, Sampling};
pub use crate::config::EngineConfig;
pub use crate::foundation::core::{Color, IntRect, Vec2, Vec2i};
pub use crate::foundation::error::{BitmapError, BitmapResult};
pub use crate::gpu::{GpuDevice, SoftwareGpu, SoftwareGpuOpts, SoftwareGpuStats, TexFbo, TexId};
pub use crate::region::TaintedRegion;
pub use crate::surface::{BlitMode, Surface};
pub use crate::viewport::{
    ChildParams, ChildPlan, ChildReport, ChildState, ChildViewport, ConsumerKind,
};
