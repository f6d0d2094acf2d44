use crate::bitmap::engine::Engine;
use crate::bitmap::store::{Backing, BitmapData, BitmapId};
use crate::foundation::core::IntRect;
use crate::foundation::error::{BitmapError, BitmapResult};
use crate::gpu::{CompositeSource, GpuDevice, TexFbo};
use crate::surface::{BlitMode, Surface};

/// Clip the span `[pos, pos + len)` (either sign of `len`) against `[0, extent)`, moving the
/// other span proportionally. Returns `false` when the span misses the extent entirely.
///
/// With `normalize` the clipped span is written back with a positive length and the other
/// span absorbs the flip.
fn clip_span(
    pos: &mut f32,
    len: &mut f32,
    extent: i32,
    other_pos: &mut f32,
    other_len: &mut f32,
    normalize: bool,
) -> bool {
    let extent = extent as f32;
    let mut start = if *len > 0.0 { *pos } else { *len + *pos };
    let mut end = if *len > 0.0 { *len + *pos } else { *pos };
    let mut length = end - start;
    if start >= extent || end < 0.0 {
        return false;
    }

    let mut o_start = if *other_len > 0.0 {
        *other_pos
    } else {
        *other_len + *other_pos
    };
    let mut o_end = if *other_len > 0.0 {
        *other_len + *other_pos
    } else {
        *other_pos
    };
    let mut o_length = o_end - o_start;

    let delta = end - extent;
    if delta > 0.0 {
        let o_delta = (delta / length) * o_length;
        length -= delta;
        end = extent;
        o_end -= o_delta;
        o_length -= o_delta;
    }
    if start < 0.0 {
        let o_delta = (start / length) * o_length;
        length += start;
        start = 0.0;
        o_start -= o_delta;
        o_length += o_delta;
    }

    let forward = *len > 0.0;
    let other_forward = *other_len > 0.0;
    if normalize {
        let same = forward == other_forward;
        *other_pos = if same { o_start } else { o_end };
        *other_len = if same { o_length } else { -o_length };
        *pos = start;
        *len = length;
    } else {
        *pos = if forward { start } else { end };
        *len = if forward { length } else { -length };
        *other_pos = if other_forward { o_start } else { o_end };
        *other_len = if other_forward { o_length } else { -o_length };
    }
    true
}

/// Clip one axis of a blit: the source span against the source extent (normalizing it to a
/// positive length), then the destination span against the destination extent.
///
/// Returns `None` when nothing is left to draw.
pub(crate) fn clip_axis(
    src: (i32, i32),
    src_extent: i32,
    dst: (i32, i32),
    dst_extent: i32,
) -> Option<((i32, i32), (i32, i32))> {
    let (mut sp, mut sl) = (src.0 as f32, src.1 as f32);
    let (mut dp, mut dl) = (dst.0 as f32, dst.1 as f32);
    let visible = clip_span(&mut sp, &mut sl, src_extent, &mut dp, &mut dl, true)
        && clip_span(&mut dp, &mut dl, dst_extent, &mut sp, &mut sl, false);
    let src = (sp.round() as i32, sl.round() as i32);
    let dst = (dp.round() as i32, dl.round() as i32);
    (visible && src.1 != 0 && dst.1 != 0).then_some((src, dst))
}

/// Clip both axes of a blit of `src_rect` (in a `src_size` bitmap) to `dst_rect` (in a
/// `dst_size` bitmap). The returned source rectangle has positive extents.
pub(crate) fn clip_blit(
    dst_rect: IntRect,
    dst_size: (i32, i32),
    src_rect: IntRect,
    src_size: (i32, i32),
) -> Option<(IntRect, IntRect)> {
    let ((sx, sw), (dx, dw)) = clip_axis(
        (src_rect.x, src_rect.w),
        src_size.0,
        (dst_rect.x, dst_rect.w),
        dst_size.0,
    )?;
    let ((sy, sh), (dy, dh)) = clip_axis(
        (src_rect.y, src_rect.h),
        src_size.1,
        (dst_rect.y, dst_rect.h),
        dst_size.1,
    )?;
    Some((IntRect::new(dx, dy, dw, dh), IntRect::new(sx, sy, sw, sh)))
}

/// Copy `rect` of the source's pixels into CPU memory.
fn source_region(
    device: &dyn GpuDevice,
    src: &BitmapData,
    rect: IntRect,
) -> BitmapResult<Surface> {
    match &src.backing {
        Backing::Mega(s) => s.crop(rect),
        other => {
            if let (Backing::Texture(_), Some(cache)) = (other, &src.cache) {
                return cache.crop(rect);
            }
            let tex = other
                .texture()
                .ok_or_else(|| BitmapError::unsupported("source has no texture"))?;
            device.read_pixels(tex)?.crop(rect)
        }
    }
}

/// CPU blit into a mega surface. `pixels` is the already clipped source region.
fn blit_into_mega(
    surface: &mut Surface,
    pixels: Surface,
    dst_rect: IntRect,
    touches: bool,
    opacity: u8,
) -> BitmapResult<()> {
    let flip_x = dst_rect.w < 0;
    let flip_y = dst_rect.h < 0;
    let (pixels, dst_rect) = if flip_x || flip_y {
        (
            pixels.flipped(pixels.rect(), flip_x, flip_y)?,
            dst_rect.normalized(),
        )
    } else {
        (pixels, dst_rect)
    };
    let mode = if touches {
        BlitMode::BLEND
    } else {
        BlitMode::COPY
    };
    surface.blit(&pixels, pixels.rect(), dst_rect, mode.with_alpha_mod(opacity));
    Ok(())
}

/// Draw CPU pixels into a texture: direct upload when nothing needs blending or scaling, an
/// intermediate texture when it only needs scaling, the blend shader otherwise.
#[allow(clippy::too_many_arguments)]
fn blit_surface_into_texture(
    device: &mut dyn GpuDevice,
    dst: &TexFbo,
    dst_rect: IntRect,
    surface: &Surface,
    src_rect: IntRect,
    mut opacity: u8,
    touches: bool,
    sub_image_fix: bool,
) -> BitmapResult<()> {
    let max = device.max_texture_size();
    let rect_too_big = src_rect.w as u32 > max || src_rect.h as u32 > max;
    let surface_too_big = surface.width() > max || surface.height() > max;

    let staged: Surface;
    let (surface, src_rect) = if rect_too_big || surface_too_big {
        let mode = BlitMode::COPY.with_alpha_mod(opacity);
        let size = if rect_too_big {
            dst_rect.normalized()
        } else {
            src_rect
        };
        let mut tmp = Surface::new(size.w as u32, size.h as u32)?;
        tmp.blit(surface, src_rect, tmp.rect(), mode);
        opacity = 255;
        staged = tmp;
        (&staged, staged.rect())
    } else {
        (surface, src_rect)
    };

    if opacity == 255 && !touches {
        let exact = surface.rect() == src_rect
            && src_rect.w == dst_rect.w
            && src_rect.h == dst_rect.h;
        if exact && !sub_image_fix {
            return device.upload(dst, dst_rect, surface);
        }
        let tmp = device.request(surface.width(), surface.height())?;
        let out = device
            .upload(&tmp, tmp.rect(), surface)
            .and_then(|()| device.blit(dst, dst_rect, &tmp, src_rect));
        device.release(tmp);
        return out;
    }
    device.composite(
        dst,
        dst_rect,
        CompositeSource::Surface(surface),
        src_rect,
        f32::from(opacity) / 255.0,
    )
}

/// Paint already clipped rectangles of `src` (`None` = `dst` itself) into `dst`.
fn paint(
    device: &mut dyn GpuDevice,
    dst: &mut BitmapData,
    src: Option<&BitmapData>,
    dst_rect: IntRect,
    src_rect: IntRect,
    opacity: u8,
    sub_image_fix: bool,
) -> BitmapResult<()> {
    let touches = dst.tainted.touches(dst_rect);

    if dst.backing.mega().is_some() {
        let pixels = source_region(device, src.unwrap_or(&*dst), src_rect)?;
        if let Backing::Mega(surface) = &mut dst.backing {
            blit_into_mega(surface, pixels, dst_rect, touches, opacity)?;
        }
        return Ok(());
    }

    let target = dst
        .backing
        .texture()
        .ok_or_else(|| BitmapError::unsupported("destination has no texture"))?;
    let src = src.unwrap_or(&*dst);
    match &src.backing {
        Backing::Mega(surface) => blit_surface_into_texture(
            device,
            target,
            dst_rect,
            surface,
            src_rect,
            opacity,
            touches,
            sub_image_fix,
        ),
        other => {
            let src_tex = other
                .texture()
                .ok_or_else(|| BitmapError::unsupported("source has no texture"))?;
            if opacity == 255 && !touches {
                device.blit(target, dst_rect, src_tex, src_rect)
            } else {
                device.composite(
                    target,
                    dst_rect,
                    CompositeSource::Texture(src_tex),
                    src_rect,
                    f32::from(opacity) / 255.0,
                )
            }
        }
    }
}

impl<D: GpuDevice> Engine<D> {
    /// Copy `rect` of `src` to `(x, y)` of `dst` at `opacity` (0..=255).
    ///
    /// A disposed `src` is skipped silently.
    pub fn blt(
        &mut self,
        dst: BitmapId,
        x: i32,
        y: i32,
        src: BitmapId,
        rect: IntRect,
        opacity: i32,
    ) -> BitmapResult<()> {
        if self.is_disposed(src) {
            return Ok(());
        }
        self.stretch_blt(dst, IntRect::new(x, y, rect.w, rect.h), src, rect, opacity)
    }

    /// Scale `src_rect` of `src` into `dst_rect` of `dst` at `opacity` (clamped to 0..=255).
    ///
    /// Negative extents flip. Rectangles may reach outside either bitmap; only the visible part
    /// is drawn. A hi-res twin of `dst` receives the same blit, sourced from the twin of `src`
    /// when it has one.
    pub fn stretch_blt(
        &mut self,
        dst: BitmapId,
        dst_rect: IntRect,
        src: BitmapId,
        src_rect: IntRect,
        opacity: i32,
    ) -> BitmapResult<()> {
        self.data(dst)?;
        if self.is_disposed(src) {
            return Ok(());
        }
        if let Some(map) = self.twin_of(dst)? {
            let (hsrc, hrect) = match self.twin_of(src)? {
                Some(s) => (s.twin, s.rect(src_rect)),
                None => (src, src_rect),
            };
            self.blit_single(map.twin, map.rect(dst_rect), hsrc, hrect, opacity)?;
        }
        self.blit_single(dst, dst_rect, src, src_rect, opacity)
    }

    /// One bitmap's share of [`Engine::stretch_blt`]: clip, pick a path, paint, taint.
    pub(crate) fn blit_single(
        &mut self,
        dst: BitmapId,
        dst_rect: IntRect,
        src: BitmapId,
        src_rect: IntRect,
        opacity: i32,
    ) -> BitmapResult<()> {
        let opacity = opacity.clamp(0, 255) as u8;
        if opacity == 0 {
            return Ok(());
        }
        let dst_size = self.data(dst)?.backing.size();
        let Ok(src_data) = self.data(src) else {
            return Ok(());
        };
        let src_size = src_data.backing.size();
        let Some((dst_rect, src_rect)) = clip_blit(dst_rect, dst_size, src_rect, src_size) else {
            return Ok(());
        };
        let sub_image_fix = self.config.sub_image_fix;
        self.with_pair(dst, src, |device, d, s| {
            paint(device, d, s, dst_rect, src_rect, opacity, sub_image_fix)
        })?;
        self.data_mut(dst)?.tainted.add(dst_rect);
        self.modified(dst, true)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bitmap/blit.rs"]
mod tests;
