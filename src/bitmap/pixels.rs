use crate::assets::{ImageFormat, encode_image};
use crate::bitmap::engine::{Engine, slot_data, slot_data_mut};
use crate::bitmap::store::{Backing, BitmapId};
use crate::foundation::core::{Color, IntRect};
use crate::foundation::error::{BitmapError, BitmapResult};
use crate::gpu::GpuDevice;
use crate::surface::Surface;

fn in_bounds(size: (i32, i32), x: i32, y: i32) -> bool {
    x >= 0 && y >= 0 && x < size.0 && y < size.1
}

impl<D: GpuDevice> Engine<D> {
    /// Read back a texture bitmap into its CPU cache if the cache is stale.
    fn fill_cache(&mut self, id: BitmapId) -> BitmapResult<()> {
        let data = slot_data_mut(&mut self.slots, id)?;
        if data.cache.is_none()
            && let Backing::Texture(tex) = &data.backing
        {
            data.cache = Some(self.device.read_pixels(tex)?);
            tracing::trace!(?id, "pixel cache filled");
        }
        Ok(())
    }

    /// CPU view of a static bitmap: the mega surface or the filled cache.
    fn cpu_pixels(&mut self, id: BitmapId) -> BitmapResult<&Surface> {
        self.ensure_static(id, "pixel access")?;
        self.fill_cache(id)?;
        let data = self.data(id)?;
        match &data.backing {
            Backing::Mega(s) => Ok(s),
            _ => data
                .cache
                .as_ref()
                .ok_or_else(|| BitmapError::unsupported("bitmap has no pixel cache")),
        }
    }

    /// Color at `(x, y)`; transparent outside the bitmap.
    ///
    /// With a hi-res twin the answer is the average of the twin block covering the pixel: alpha
    /// over the whole block, color over its non-transparent pixels only.
    pub fn get_pixel(&mut self, id: BitmapId, x: i32, y: i32) -> BitmapResult<Color> {
        self.ensure_static(id, "get_pixel")?;
        let size = self.data(id)?.backing.size();
        let Some(map) = self.twin_of(id)? else {
            if !in_bounds(size, x, y) {
                return Ok(Color::transparent());
            }
            return Ok(self
                .cpu_pixels(id)?
                .pixel(x, y)
                .unwrap_or(Color::transparent()));
        };

        tracing::warn!(?id, "get_pixel on a bitmap with a hi-res twin averages the twin");
        if !in_bounds(size, x, y) {
            return Ok(Color::transparent());
        }
        let (hx, hy) = map.point(x, y);
        let (bw, bh) = map.block();
        let (bw, bh) = (bw.max(1), bh.max(1));
        let twin = self.cpu_pixels(map.twin)?;
        let mut rgb = [0u32; 3];
        let mut alpha = 0u32;
        let mut opaque = 0u32;
        for py in hy..hy + bh {
            for px in hx..hx + bw {
                let Some(c) = twin.pixel(px, py) else {
                    continue;
                };
                alpha += u32::from(c.a);
                if c.a != 0 {
                    rgb[0] += u32::from(c.r);
                    rgb[1] += u32::from(c.g);
                    rgb[2] += u32::from(c.b);
                    opaque += 1;
                }
            }
        }
        let n = (bw * bh) as u32;
        let avg = |sum: u32| if opaque == 0 { 0 } else { (sum / opaque) as u8 };
        Ok(Color::rgba(
            avg(rgb[0]),
            avg(rgb[1]),
            avg(rgb[2]),
            (alpha / n) as u8,
        ))
    }

    /// Overwrite one pixel. Writes outside the bitmap are ignored.
    ///
    /// The CPU cache is patched in place instead of being dropped. With a hi-res twin the whole
    /// corresponding twin block is set.
    pub fn set_pixel(&mut self, id: BitmapId, x: i32, y: i32, color: Color) -> BitmapResult<()> {
        self.ensure_static(id, "set_pixel")?;
        let size = self.data(id)?.backing.size();
        if !in_bounds(size, x, y) {
            return Ok(());
        }
        if let Some(map) = self.twin_of(id)? {
            let (hx, hy) = map.point(x, y);
            let (bw, bh) = map.block();
            for py in hy..hy + bh.max(1) {
                for px in hx..hx + bw.max(1) {
                    self.set_pixel(map.twin, px, py, color)?;
                }
            }
        }

        let one = IntRect::new(x, y, 1, 1);
        let data = slot_data_mut(&mut self.slots, id)?;
        match &mut data.backing {
            Backing::Mega(s) => s.set_pixel(x, y, color),
            other => {
                let tex = other
                    .texture()
                    .ok_or_else(|| BitmapError::unsupported("bitmap has no texture"))?;
                let px = Surface::from_rgba8(1, 1, color.to_array().to_vec())?;
                self.device.upload(tex, one, &px)?;
                if let Some(cache) = data.cache.as_mut() {
                    cache.set_pixel(x, y, color);
                }
            }
        }
        data.tainted.add(one);
        self.modified(id, false)
    }

    /// Tightly packed RGBA8 bytes of the bitmap, or of the current frame of an animation.
    pub fn get_raw(&self, id: BitmapId) -> BitmapResult<Vec<u8>> {
        let data = slot_data(&self.slots, id)?;
        if data.hires.is_some() {
            tracing::warn!(?id, "get_raw returns the low-res pixels of a bitmap with a twin");
        }
        match (&data.backing, &data.cache) {
            (Backing::Mega(s), _) => Ok(s.as_bytes().to_vec()),
            (Backing::Texture(_), Some(cache)) => Ok(cache.as_bytes().to_vec()),
            (other, _) => {
                let tex = other
                    .texture()
                    .ok_or_else(|| BitmapError::unsupported("bitmap has no texture"))?;
                Ok(self.device.read_pixels(tex)?.into_bytes())
            }
        }
    }

    /// Replace every pixel (of the current frame, for animations) with `bytes`.
    ///
    /// `bytes` must hold exactly `width * height * 4` bytes. The whole bitmap counts as painted
    /// afterwards.
    pub fn replace_raw(&mut self, id: BitmapId, bytes: &[u8]) -> BitmapResult<()> {
        let data = slot_data_mut(&mut self.slots, id)?;
        let (w, h) = data.backing.size();
        let expected = (w as usize) * (h as usize) * 4;
        if bytes.len() != expected {
            return Err(BitmapError::invalid(format!(
                "raw buffer is {} bytes, {w}x{h} needs {expected}",
                bytes.len()
            )));
        }
        match &mut data.backing {
            Backing::Mega(s) => s.as_bytes_mut().copy_from_slice(bytes),
            other => {
                let tex = other
                    .texture()
                    .ok_or_else(|| BitmapError::unsupported("bitmap has no texture"))?;
                let surface = Surface::from_rgba8(w as u32, h as u32, bytes.to_vec())?;
                self.device.upload(tex, tex.rect(), &surface)?;
            }
        }
        data.tainted.add(IntRect::from_size(w, h));
        self.modified(id, true)
    }

    /// Encode the bitmap (current frame for animations) as `format`.
    pub fn export(&self, id: BitmapId, format: ImageFormat) -> BitmapResult<Vec<u8>> {
        let (w, h) = self.data(id)?.backing.size();
        let surface = Surface::from_rgba8(w as u32, h as u32, self.get_raw(id)?)?;
        encode_image(&surface, format)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bitmap/pixels.rs"]
mod tests;
