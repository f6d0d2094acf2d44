use crate::effects::composite::{copy_modulated, over_straight};
use crate::foundation::core::{Color, IntRect};
use crate::foundation::error::{BitmapError, BitmapResult};
use crate::surface::sample::{BlitMode, for_each_mapped};

/// Tightly packed straight-alpha RGBA8 pixel buffer, row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

fn byte_len(width: u32, height: u32) -> BitmapResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| BitmapError::too_large(format!("surface {width}x{height} overflows")))
}

impl Surface {
    /// Allocate a fully transparent surface.
    pub fn new(width: u32, height: u32) -> BitmapResult<Self> {
        let len = byte_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    /// Wrap existing RGBA8 bytes, which must be exactly `width * height * 4` long.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> BitmapResult<Self> {
        let len = byte_len(width, height)?;
        if data.len() != len {
            return Err(BitmapError::invalid(format!(
                "pixel data is {} bytes, {width}x{height} needs {len}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
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

    /// Raw RGBA8 bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw RGBA8 bytes.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the surface and return its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(((y as usize) * (self.width as usize) + (x as usize)) * 4)
    }

    /// Pixel at `(x, y)`, `None` outside the surface.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        let i = self.index(x, y)?;
        Some(Color::rgba(
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ))
    }

    pub(crate) fn px(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        let i = self.index(x, y)?;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Overwrite one pixel. Out-of-range writes are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.data[i..i + 4].copy_from_slice(&color.to_array());
        }
    }

    pub(crate) fn put_px(&mut self, x: i32, y: i32, px: [u8; 4]) {
        if let Some(i) = self.index(x, y) {
            self.data[i..i + 4].copy_from_slice(&px);
        }
    }

    /// Overwrite every pixel of `rect` (normalized, clipped) with `color`.
    pub fn fill_rect(&mut self, rect: IntRect, color: Color) {
        let Some(r) = rect.intersect(self.rect()) else {
            return;
        };
        let px = color.to_array();
        let stride = self.width as usize * 4;
        for y in r.y..r.y + r.h {
            let row = y as usize * stride;
            let start = row + r.x as usize * 4;
            let end = start + r.w as usize * 4;
            for chunk in self.data[start..end].chunks_exact_mut(4) {
                chunk.copy_from_slice(&px);
            }
        }
    }

    /// Overwrite the whole surface with transparent black.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Copy `rect` (normalized) into a new surface. Pixels outside `self` stay transparent.
    pub fn crop(&self, rect: IntRect) -> BitmapResult<Surface> {
        let r = rect.normalized();
        let mut out = Surface::new(r.w.max(0) as u32, r.h.max(0) as u32)?;
        out.blit(self, r, out.rect(), BlitMode::COPY);
        Ok(out)
    }

    /// Copy `rect` (normalized) into a new surface, mirrored on the requested axes.
    pub fn flipped(&self, rect: IntRect, flip_x: bool, flip_y: bool) -> BitmapResult<Surface> {
        let r = rect.normalized();
        let mut out = Surface::new(r.w.max(0) as u32, r.h.max(0) as u32)?;
        let dst = IntRect::new(
            if flip_x { r.w } else { 0 },
            if flip_y { r.h } else { 0 },
            if flip_x { -r.w } else { r.w },
            if flip_y { -r.h } else { r.h },
        );
        out.blit(self, r, dst, BlitMode::COPY);
        Ok(out)
    }

    /// Nearest-neighbour resize of the whole surface.
    pub fn scaled(&self, width: u32, height: u32) -> BitmapResult<Surface> {
        let mut out = Surface::new(width, height)?;
        out.blit(self, self.rect(), out.rect(), BlitMode::COPY);
        Ok(out)
    }

    /// Blit `src_rect` of `src` into `dst_rect` of `self`, scaling with nearest sampling.
    ///
    /// Signed extents mirror. Destination pixels whose sample falls outside `src` are left
    /// untouched, as are pixels outside `self`.
    pub fn blit(&mut self, src: &Surface, src_rect: IntRect, dst_rect: IntRect, mode: BlitMode) {
        let (w, h) = (self.width as i32, self.height as i32);
        for_each_mapped(dst_rect, src_rect, w, h, |dx, dy, sx, sy| {
            let Some(s) = src.px(sx, sy) else {
                return;
            };
            let out = if mode.blend {
                let d = self.px(dx, dy).unwrap_or([0; 4]);
                over_straight(d, s, mode.alpha_mod)
            } else {
                copy_modulated(s, mode.alpha_mod)
            };
            self.put_px(dx, dy, out);
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/surface.rs"]
mod tests;
