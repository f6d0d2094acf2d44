use crate::bitmap::engine::{Engine, slot_data, slot_data_mut};
use crate::bitmap::store::{Backing, BackingKind, BitmapId};
use crate::effects::hue::normalize_hue;
use crate::effects::radial::clamp_radial_params;
use crate::foundation::core::IntRect;
use crate::foundation::error::{BitmapError, BitmapResult};
use crate::gpu::{GpuDevice, TexFbo};

/// Pixels of context kept around each blur tile so the seams match an untiled blur.
const BLUR_TILE_BORDER: i32 = 5;

/// Row-major tiles of at most `tw` x `th` covering `w` x `h`.
pub(crate) fn tiles(w: i32, h: i32, tw: i32, th: i32) -> Vec<IntRect> {
    let (tw, th) = (tw.max(1), th.max(1));
    let mut out = Vec::new();
    let mut y = 0;
    while y < h {
        let mut x = 0;
        while x < w {
            out.push(IntRect::new(x, y, tw.min(w - x), th.min(h - y)));
            x += tw;
        }
        y += th;
    }
    out
}

/// Even split of `len` into `ceil(len / max)` parts.
fn even_tile(len: i32, max: i32) -> i32 {
    let parts = (len + max - 1) / max.max(1);
    (len + parts - 1) / parts.max(1)
}

impl<D: GpuDevice> Engine<D> {
    /// Run `per_tile` on a temporary texture bitmap for each tile of the mega bitmap `id`.
    ///
    /// Each temporary holds the tile grown by `border` (clipped to the bitmap); only the tile
    /// itself is copied back. Borders are read from a snapshot taken before the first tile so
    /// they never see processed neighbours. The painted area of `id` is restored afterwards,
    /// since the copy-back blits would otherwise mark every tile painted.
    fn for_each_mega_tile(
        &mut self,
        id: BitmapId,
        tile_w: i32,
        tile_h: i32,
        border: i32,
        mut per_tile: impl FnMut(&mut Self, BitmapId) -> BitmapResult<()>,
    ) -> BitmapResult<()> {
        let data = self.data(id)?;
        let saved = data.tainted.clone();
        let source = match (&data.backing, border > 0) {
            (Backing::Mega(s), true) => {
                let snapshot = Backing::Mega(s.clone());
                self.insert(snapshot)
            }
            (Backing::Mega(_), false) => id,
            _ => return Err(BitmapError::unsupported("tiling needs a mega bitmap")),
        };
        let out = self.run_tiles(id, source, tile_w, tile_h, border, &mut per_tile);
        if source != id {
            self.dispose(source);
        }
        if let Ok(data) = self.data_mut(id) {
            data.tainted = saved;
        }
        out
    }

    #[allow(clippy::too_many_arguments)]
    fn run_tiles(
        &mut self,
        id: BitmapId,
        source: BitmapId,
        tile_w: i32,
        tile_h: i32,
        border: i32,
        per_tile: &mut impl FnMut(&mut Self, BitmapId) -> BitmapResult<()>,
    ) -> BitmapResult<()> {
        let bounds = self.data(id)?.rect();
        for tile in tiles(bounds.w, bounds.h, tile_w, tile_h) {
            let grown = IntRect::new(
                tile.x - border,
                tile.y - border,
                tile.w + 2 * border,
                tile.h + 2 * border,
            );
            let Some(src) = grown.intersect(bounds) else {
                continue;
            };
            let inner = IntRect::new(tile.x - src.x, tile.y - src.y, tile.w, tile.h);
            let tmp = self.create_hires(src.w, src.h)?;
            self.data_mut(id)?.tainted.clear();
            let mut out =
                self.blit_single(tmp, IntRect::from_size(src.w, src.h), source, src, 255);
            if out.is_ok() {
                out = per_tile(self, tmp);
            }
            if out.is_ok() {
                out = self.blit_single(id, tile, tmp, inner, 255);
            }
            self.dispose(tmp);
            out?;
        }
        Ok(())
    }

    fn blur_texture(&mut self, id: BitmapId) -> BitmapResult<()> {
        let (w, h) = self.data(id)?.backing.size();
        let aux = self.device.request(w as u32, h as u32)?;
        let out = match slot_data(&self.slots, id)?.backing.texture() {
            Some(tex) => self.device.blur(tex, &aux),
            None => Err(BitmapError::unsupported("bitmap has no texture")),
        };
        self.device.release(aux);
        out
    }

    /// Separable 3-tap blur of the whole bitmap.
    ///
    /// Mega bitmaps are blurred tile by tile through temporary textures, with a border of
    /// context around each tile so the result matches an untiled blur.
    #[tracing::instrument(skip(self))]
    pub fn blur(&mut self, id: BitmapId) -> BitmapResult<()> {
        self.ensure_static(id, "blur")?;
        self.on_twin(id, |e, m| e.blur(m.twin))?;
        if self.is_mega(id)? {
            let max = self.device.max_texture_size() as i32;
            let border = BLUR_TILE_BORDER.min((max - 1) / 2).max(0);
            let step = max - 2 * border;
            self.for_each_mega_tile(id, step, step, border, |e, tmp| e.blur_texture(tmp))?;
        } else {
            self.blur_texture(id)?;
        }
        self.modified(id, true)
    }

    /// Replace the texture of `id` with one rendered by `draw` from the old texture.
    fn replace_texture(
        &mut self,
        id: BitmapId,
        draw: impl FnOnce(&mut D, &TexFbo, &TexFbo) -> BitmapResult<()>,
    ) -> BitmapResult<()> {
        let (w, h) = self.data(id)?.backing.size();
        let fresh = self.device.request(w as u32, h as u32)?;
        let data = match slot_data_mut(&mut self.slots, id) {
            Ok(d) => d,
            Err(e) => {
                self.device.release(fresh);
                return Err(e);
            }
        };
        let Backing::Texture(tex) = &mut data.backing else {
            self.device.release(fresh);
            return Err(BitmapError::unsupported(
                "texture replacement needs a static texture bitmap",
            ));
        };
        if let Err(e) = draw(&mut self.device, tex, &fresh) {
            self.device.release(fresh);
            return Err(e);
        }
        let old = std::mem::replace(tex, fresh);
        self.device.release(old);
        data.cache = None;
        Ok(())
    }

    /// Rotate the hue of every pixel by `hue` degrees. Whole turns are no-ops.
    ///
    /// Mega bitmaps are processed in texture-sized tiles.
    #[tracing::instrument(skip(self))]
    pub fn hue_change(&mut self, id: BitmapId, hue: i32) -> BitmapResult<()> {
        self.ensure_static(id, "hue_change")?;
        self.on_twin(id, |e, m| e.hue_change(m.twin, hue))?;
        let Some(degrees) = normalize_hue(hue) else {
            return Ok(());
        };
        if self.is_mega(id)? {
            let (w, h) = self.data(id)?.backing.size();
            let max = self.device.max_texture_size() as i32;
            let (tw, th) = (even_tile(w, max), even_tile(h, max));
            self.for_each_mega_tile(id, tw, th, 0, |e, tmp| {
                e.replace_texture(tmp, |dev, old, fresh| dev.hue_shift(old, fresh, degrees))
            })?;
        } else {
            self.replace_texture(id, |dev, old, fresh| dev.hue_shift(old, fresh, degrees))?;
        }
        self.modified(id, true)
    }

    /// Additive fan of `divisions` copies rotated across `angle` degrees around the center.
    ///
    /// `angle` is clamped to `[0, 359]` and `divisions` to `[2, 100]`. Not defined for mega
    /// bitmaps.
    #[tracing::instrument(skip(self))]
    pub fn radial_blur(&mut self, id: BitmapId, angle: i32, divisions: i32) -> BitmapResult<()> {
        if self.data(id)?.backing.kind() == BackingKind::Mega {
            return Err(BitmapError::unsupported(
                "radial_blur is not defined for mega bitmaps",
            ));
        }
        self.ensure_static(id, "radial_blur")?;
        self.on_twin(id, |e, m| e.radial_blur(m.twin, angle, divisions))?;
        let (angle, divisions) = clamp_radial_params(angle, divisions);
        self.replace_texture(id, |dev, old, fresh| {
            dev.radial_blur(old, fresh, angle, divisions)
        })?;
        self.modified(id, true)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bitmap/filters.rs"]
mod tests;
