use std::collections::HashMap;

use crate::effects::blur::{BlurAxis, blur_pass};
use crate::effects::composite::blt_shader;
use crate::effects::gradient::fill_gradient;
use crate::effects::hue::hue_rotate_in_place;
use crate::effects::radial::radial_blur_rgba8;
use crate::foundation::core::{Color, IntRect};
use crate::foundation::error::{BitmapError, BitmapResult};
use crate::gpu::device::{CompositeSource, GpuDevice, TexFbo, TexId};
use crate::gpu::pool::{TexturePool, TexturePoolOpts, TexturePoolStats};
use crate::surface::sample::{BlitMode, for_each_mapped};
use crate::surface::Surface;

/// Limits of the software device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SoftwareGpuOpts {
    /// Largest texture width or height; larger bitmaps become mega surfaces.
    pub max_texture_size: u32,
    /// Maximum number of simultaneously borrowed textures.
    pub max_textures: usize,
    /// Retention limits of released storage.
    pub pool: TexturePoolOpts,
}

impl Default for SoftwareGpuOpts {
    fn default() -> Self {
        Self {
            max_texture_size: 4096,
            max_textures: 1024,
            pool: TexturePoolOpts::default(),
        }
    }
}

impl SoftwareGpuOpts {
    /// Return options with a different texture size limit.
    pub fn with_max_texture_size(mut self, size: u32) -> Self {
        self.max_texture_size = size;
        self
    }

    /// Return options with a different live texture cap.
    pub fn with_max_textures(mut self, count: usize) -> Self {
        self.max_textures = count;
        self
    }

    /// Return options with different pool retention limits.
    pub fn with_pool(mut self, pool: TexturePoolOpts) -> Self {
        self.pool = pool;
        self
    }
}

/// Texture accounting of a [`SoftwareGpu`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SoftwareGpuStats {
    /// Textures currently borrowed.
    pub live: usize,
    /// Successful requests so far.
    pub requested: u64,
    /// Releases of live textures so far.
    pub released: u64,
    /// Storage reuse counters.
    pub pool: TexturePoolStats,
}

/// CPU reference implementation of [`GpuDevice`].
pub struct SoftwareGpu {
    opts: SoftwareGpuOpts,
    textures: HashMap<TexId, Surface>,
    pool: TexturePool,
    next_id: u64,
    requested: u64,
    released: u64,
}

impl Default for SoftwareGpu {
    fn default() -> Self {
        Self::new(SoftwareGpuOpts::default())
    }
}

fn unknown(tex: &TexFbo) -> BitmapError {
    BitmapError::invalid(format!("unknown texture {:?}", tex.id()))
}

fn same_size(a: &TexFbo, b: &TexFbo, what: &str) -> BitmapResult<()> {
    if a.width() != b.width() || a.height() != b.height() {
        return Err(BitmapError::invalid(format!(
            "{what} needs equally sized textures, got {}x{} and {}x{}",
            a.width(),
            a.height(),
            b.width(),
            b.height()
        )));
    }
    Ok(())
}

/// Blend-shader draw of `src_rect` of `src` into `dst_rect` of `target`.
fn composite_surface(
    target: &mut Surface,
    dst_rect: IntRect,
    src: &Surface,
    src_rect: IntRect,
    opacity: f32,
) {
    let (w, h) = (target.width() as i32, target.height() as i32);
    for_each_mapped(dst_rect, src_rect, w, h, |dx, dy, sx, sy| {
        let Some(s) = src.px(sx, sy) else {
            return;
        };
        let d = target.px(dx, dy).unwrap_or([0; 4]);
        target.put_px(dx, dy, blt_shader(d, s, opacity));
    });
}

impl SoftwareGpu {
    /// Build a device with the given limits.
    pub fn new(opts: SoftwareGpuOpts) -> Self {
        Self {
            opts,
            textures: HashMap::new(),
            pool: TexturePool::new(opts.pool),
            next_id: 1,
            requested: 0,
            released: 0,
        }
    }

    /// Current accounting.
    pub fn stats(&self) -> SoftwareGpuStats {
        SoftwareGpuStats {
            live: self.textures.len(),
            requested: self.requested,
            released: self.released,
            pool: self.pool.stats(),
        }
    }

    fn tex(&self, tex: &TexFbo) -> BitmapResult<&Surface> {
        self.textures.get(&tex.id()).ok_or_else(|| unknown(tex))
    }

    /// Run `f` on the storage of `dst`, with the storage of `src` as a read-only input.
    ///
    /// When `src` is `dst`, `f` sees a snapshot taken before the call.
    fn with_target<R>(
        &mut self,
        dst: &TexFbo,
        src: Option<&TexFbo>,
        f: impl FnOnce(&mut Surface, Option<&Surface>) -> BitmapResult<R>,
    ) -> BitmapResult<R> {
        let mut target = self.textures.remove(&dst.id()).ok_or_else(|| unknown(dst))?;
        let out = match src {
            Some(s) if s.id() == dst.id() => {
                let snapshot = target.clone();
                f(&mut target, Some(&snapshot))
            }
            Some(s) => match self.textures.get(&s.id()) {
                Some(src_surface) => f(&mut target, Some(src_surface)),
                None => Err(unknown(s)),
            },
            None => f(&mut target, None),
        };
        self.textures.insert(dst.id(), target);
        out
    }
}

impl GpuDevice for SoftwareGpu {
    fn max_texture_size(&self) -> u32 {
        self.opts.max_texture_size
    }

    fn request(&mut self, width: u32, height: u32) -> BitmapResult<TexFbo> {
        if width == 0 || height == 0 {
            return Err(BitmapError::invalid(format!(
                "texture size {width}x{height} must be positive"
            )));
        }
        let max = self.opts.max_texture_size;
        if width > max || height > max {
            return Err(BitmapError::exhausted(format!(
                "texture {width}x{height} exceeds the {max}px limit"
            )));
        }
        if self.textures.len() >= self.opts.max_textures {
            return Err(BitmapError::exhausted(format!(
                "texture pool is at its {} texture limit",
                self.opts.max_textures
            )));
        }
        let surface = self.pool.take(width, height)?;
        let id = TexId(self.next_id);
        self.next_id += 1;
        self.textures.insert(id, surface);
        self.requested += 1;
        tracing::trace!(?id, width, height, "texture requested");
        Ok(TexFbo::new(id, width, height))
    }

    fn release(&mut self, tex: TexFbo) {
        match self.textures.remove(&tex.id()) {
            Some(surface) => {
                self.released += 1;
                self.pool.give_back(surface);
                tracing::trace!(id = ?tex.id(), "texture released");
            }
            None => tracing::warn!(id = ?tex.id(), "release of a texture that is not live"),
        }
    }

    fn live_textures(&self) -> usize {
        self.textures.len()
    }

    fn upload(&mut self, tex: &TexFbo, rect: IntRect, pixels: &Surface) -> BitmapResult<()> {
        let n = rect.normalized();
        if n.w as u32 != pixels.width() || n.h as u32 != pixels.height() {
            return Err(BitmapError::invalid(format!(
                "upload of {}x{} pixels into a {}x{} rect",
                pixels.width(),
                pixels.height(),
                n.w,
                n.h
            )));
        }
        self.with_target(tex, None, |t, _| {
            t.blit(pixels, pixels.rect(), n, BlitMode::COPY);
            Ok(())
        })
    }

    fn read_pixels(&self, tex: &TexFbo) -> BitmapResult<Surface> {
        Ok(self.tex(tex)?.clone())
    }

    fn clear_rect(
        &mut self,
        tex: &TexFbo,
        rect: Option<IntRect>,
        color: Color,
    ) -> BitmapResult<()> {
        self.with_target(tex, None, |t, _| {
            let r = rect.unwrap_or_else(|| t.rect());
            t.fill_rect(r, color);
            Ok(())
        })
    }

    fn blit(
        &mut self,
        dst: &TexFbo,
        dst_rect: IntRect,
        src: &TexFbo,
        src_rect: IntRect,
    ) -> BitmapResult<()> {
        self.with_target(dst, Some(src), |t, s| {
            if let Some(s) = s {
                t.blit(s, src_rect, dst_rect, BlitMode::COPY);
            }
            Ok(())
        })
    }

    fn composite(
        &mut self,
        dst: &TexFbo,
        dst_rect: IntRect,
        src: CompositeSource<'_>,
        src_rect: IntRect,
        opacity: f32,
    ) -> BitmapResult<()> {
        match src {
            CompositeSource::Texture(src) => self.with_target(dst, Some(src), |t, s| {
                if let Some(s) = s {
                    composite_surface(t, dst_rect, s, src_rect, opacity);
                }
                Ok(())
            }),
            CompositeSource::Surface(s) => self.with_target(dst, None, |t, _| {
                composite_surface(t, dst_rect, s, src_rect, opacity);
                Ok(())
            }),
        }
    }

    fn gradient_quad(
        &mut self,
        dst: &TexFbo,
        rect: IntRect,
        c1: Color,
        c2: Color,
        vertical: bool,
    ) -> BitmapResult<()> {
        self.with_target(dst, None, |t, _| {
            fill_gradient(t, rect, c1, c2, vertical);
            Ok(())
        })
    }

    fn blur(&mut self, tex: &TexFbo, aux: &TexFbo) -> BitmapResult<()> {
        same_size(tex, aux, "blur")?;
        let (w, h) = (tex.width(), tex.height());
        self.with_target(aux, Some(tex), |a, t| {
            if let Some(t) = t {
                blur_pass(t.as_bytes(), a.as_bytes_mut(), w, h, BlurAxis::Horizontal);
            }
            Ok(())
        })?;
        self.with_target(tex, Some(aux), |t, a| {
            if let Some(a) = a {
                blur_pass(a.as_bytes(), t.as_bytes_mut(), w, h, BlurAxis::Vertical);
            }
            Ok(())
        })
    }

    fn hue_shift(&mut self, src: &TexFbo, dst: &TexFbo, degrees: i32) -> BitmapResult<()> {
        same_size(src, dst, "hue_shift")?;
        self.with_target(dst, Some(src), |t, s| {
            if let Some(s) = s {
                t.as_bytes_mut().copy_from_slice(s.as_bytes());
                hue_rotate_in_place(t.as_bytes_mut(), degrees as f32);
            }
            Ok(())
        })
    }

    fn radial_blur(
        &mut self,
        src: &TexFbo,
        dst: &TexFbo,
        angle: i32,
        divisions: i32,
    ) -> BitmapResult<()> {
        same_size(src, dst, "radial_blur")?;
        let (w, h) = (src.width(), src.height());
        self.with_target(dst, Some(src), |t, s| {
            if let Some(s) = s {
                let out = radial_blur_rgba8(s.as_bytes(), w, h, angle, divisions);
                t.as_bytes_mut().copy_from_slice(&out);
            }
            Ok(())
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gpu/software.rs"]
mod tests;
