use crate::foundation::core::{Color, IntRect};
use crate::foundation::error::BitmapResult;
use crate::surface::Surface;

/// Opaque texture identity assigned by a [`GpuDevice`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TexId(pub u64);

/// Texture plus framebuffer pair borrowed from a device pool.
///
/// Neither `Clone` nor `Copy`: [`GpuDevice::release`] consumes the handle, so a texture can be
/// returned at most once.
#[derive(Debug, PartialEq, Eq)]
pub struct TexFbo {
    id: TexId,
    width: u32,
    height: u32,
}

impl TexFbo {
    /// Build a handle. Only devices should mint these.
    pub fn new(id: TexId, width: u32, height: u32) -> Self {
        Self { id, width, height }
    }

    /// Device-side identity.
    pub fn id(&self) -> TexId {
        self.id
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bounds anchored at the origin.
    pub fn rect(&self) -> IntRect {
        IntRect::from_size(self.width as i32, self.height as i32)
    }
}

/// Source of a shader composite: another texture or a CPU surface uploaded on the fly.
#[derive(Clone, Copy, Debug)]
pub enum CompositeSource<'a> {
    /// Sample a device texture.
    Texture(&'a TexFbo),
    /// Sample CPU pixels (a mega surface or readback).
    Surface(&'a Surface),
}

/// Texture pool and quad/shader services.
///
/// Rectangles passed to drawing calls may carry negative extents; a negative extent on exactly
/// one of source/destination mirrors along that axis. Sampling uses nearest filtering and skips
/// source positions outside the source.
pub trait GpuDevice {
    /// Largest width or height a single texture may have.
    fn max_texture_size(&self) -> u32;

    /// Borrow a `width` x `height` texture from the pool. Contents are transparent.
    fn request(&mut self, width: u32, height: u32) -> BitmapResult<TexFbo>;

    /// Return a texture to the pool.
    fn release(&mut self, tex: TexFbo);

    /// Number of textures currently borrowed.
    fn live_textures(&self) -> usize;

    /// Overwrite `rect` of `tex` with `pixels`, which must be exactly `rect`'s size.
    fn upload(&mut self, tex: &TexFbo, rect: IntRect, pixels: &Surface) -> BitmapResult<()>;

    /// Read the whole texture back into CPU memory.
    fn read_pixels(&self, tex: &TexFbo) -> BitmapResult<Surface>;

    /// Scissored clear to `color`; `None` clears the whole texture.
    fn clear_rect(&mut self, tex: &TexFbo, rect: Option<IntRect>, color: Color)
    -> BitmapResult<()>;

    /// Non-blended framebuffer copy. `src` may be `dst`.
    fn blit(
        &mut self,
        dst: &TexFbo,
        dst_rect: IntRect,
        src: &TexFbo,
        src_rect: IntRect,
    ) -> BitmapResult<()>;

    /// Blend-shader draw of `src_rect` of `src` into `dst_rect` of `dst`, sampling the current
    /// destination contents, at normalized `opacity`.
    fn composite(
        &mut self,
        dst: &TexFbo,
        dst_rect: IntRect,
        src: CompositeSource<'_>,
        src_rect: IntRect,
        opacity: f32,
    ) -> BitmapResult<()>;

    /// Colored quad with per-vertex interpolation between `c1` and `c2`.
    fn gradient_quad(
        &mut self,
        dst: &TexFbo,
        rect: IntRect,
        c1: Color,
        c2: Color,
        vertical: bool,
    ) -> BitmapResult<()>;

    /// Two-pass separable blur of `tex` in place, using `aux` (same size) as the intermediate.
    fn blur(&mut self, tex: &TexFbo, aux: &TexFbo) -> BitmapResult<()>;

    /// Render `src` into `dst` with its hue rotated by `degrees`.
    fn hue_shift(&mut self, src: &TexFbo, dst: &TexFbo, degrees: i32) -> BitmapResult<()>;

    /// Render an additive fan of rotated copies of `src` into `dst`.
    fn radial_blur(
        &mut self,
        src: &TexFbo,
        dst: &TexFbo,
        angle: i32,
        divisions: i32,
    ) -> BitmapResult<()>;
}
