use crate::bitmap::engine::{Engine, slot_data_mut};
use crate::bitmap::store::{Backing, BitmapId};
use crate::effects::fill_gradient;
use crate::foundation::core::{Color, IntRect};
use crate::foundation::error::{BitmapError, BitmapResult};
use crate::gpu::GpuDevice;

impl<D: GpuDevice> Engine<D> {
    pub(crate) fn fill_single(&mut self, id: BitmapId, rect: IntRect, color: Color) -> BitmapResult<()> {
        let data = slot_data_mut(&mut self.slots, id)?;
        match &mut data.backing {
            Backing::Mega(s) => {
                s.fill_rect(rect, color);
                Ok(())
            }
            other => {
                let tex = other
                    .texture()
                    .ok_or_else(|| BitmapError::unsupported("bitmap has no texture"))?;
                self.device.clear_rect(tex, Some(rect), color)
            }
        }
    }

    /// Overwrite `rect` with `color`. A fully transparent color marks the area unpainted.
    pub fn fill_rect(&mut self, id: BitmapId, rect: IntRect, color: Color) -> BitmapResult<()> {
        self.ensure_static(id, "fill_rect")?;
        self.on_twin(id, |e, m| e.fill_rect(m.twin, m.rect(rect), color))?;
        self.fill_single(id, rect, color)?;
        let data = self.data_mut(id)?;
        if color.a == 0 {
            data.tainted.subtract(rect);
        } else {
            data.tainted.add(rect);
        }
        self.modified(id, true)
    }

    /// Make `rect` transparent.
    pub fn clear_rect(&mut self, id: BitmapId, rect: IntRect) -> BitmapResult<()> {
        self.ensure_static(id, "clear_rect")?;
        self.on_twin(id, |e, m| e.clear_rect(m.twin, m.rect(rect)))?;
        self.fill_single(id, rect, Color::transparent())?;
        self.data_mut(id)?.tainted.subtract(rect);
        self.modified(id, true)
    }

    /// Make the whole bitmap transparent.
    pub fn clear(&mut self, id: BitmapId) -> BitmapResult<()> {
        self.ensure_static(id, "clear")?;
        self.on_twin(id, |e, m| e.clear(m.twin))?;
        let rect = self.data(id)?.rect();
        self.fill_single(id, rect, Color::transparent())?;
        self.data_mut(id)?.tainted.clear();
        self.modified(id, true)
    }

    /// Linear gradient from `c1` to `c2` across `rect`, top to bottom when `vertical`, left to
    /// right otherwise.
    pub fn gradient_fill_rect(
        &mut self,
        id: BitmapId,
        rect: IntRect,
        c1: Color,
        c2: Color,
        vertical: bool,
    ) -> BitmapResult<()> {
        self.ensure_static(id, "gradient_fill_rect")?;
        self.on_twin(id, |e, m| {
            e.gradient_fill_rect(m.twin, m.rect(rect), c1, c2, vertical)
        })?;
        let data = slot_data_mut(&mut self.slots, id)?;
        match &mut data.backing {
            Backing::Mega(s) => fill_gradient(s, rect, c1, c2, vertical),
            other => {
                let tex = other
                    .texture()
                    .ok_or_else(|| BitmapError::unsupported("bitmap has no texture"))?;
                self.device.gradient_quad(tex, rect, c1, c2, vertical)?;
            }
        }
        self.data_mut(id)?.tainted.add(rect);
        self.modified(id, true)
    }

    /// Mark `rect` as painted without drawing, for content drawn behind the engine's back.
    pub fn taint_area(&mut self, id: BitmapId, rect: IntRect) -> BitmapResult<()> {
        self.on_twin(id, |e, m| e.taint_area(m.twin, m.rect(rect)))?;
        self.data_mut(id)?.tainted.add(rect);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bitmap/fill.rs"]
mod tests;
