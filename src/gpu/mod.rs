//! Texture pool and shader services consumed by the bitmap engine.
//!
//! [`GpuDevice`] is the contract; [`SoftwareGpu`] is a CPU reference implementation whose
//! textures are plain [`crate::Surface`]s, so every path the engine takes can be inspected
//! pixel by pixel.

pub(crate) mod device;
pub(crate) mod pool;
pub(crate) mod software;

pub use device::{CompositeSource, GpuDevice, TexFbo, TexId};
pub use pool::{TexturePoolOpts, TexturePoolStats};
pub use software::{SoftwareGpu, SoftwareGpuOpts, SoftwareGpuStats};
