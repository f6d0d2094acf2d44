use crate::bitmap::engine::Engine;
use crate::bitmap::store::BitmapId;
use crate::foundation::core::IntRect;
use crate::foundation::error::BitmapResult;
use crate::gpu::GpuDevice;

/// Coordinate mapping from a low-res bitmap onto its hi-res twin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TwinMap {
    pub(crate) twin: BitmapId,
    lo: (i32, i32),
    hi: (i32, i32),
}

impl TwinMap {
    pub(crate) fn new(twin: BitmapId, lo: (i32, i32), hi: (i32, i32)) -> Self {
        Self { twin, lo, hi }
    }

    /// `v * hi / lo` per axis, truncating.
    pub(crate) fn rect(&self, r: IntRect) -> IntRect {
        r.scaled(self.hi.0, self.lo.0, self.hi.1, self.lo.1)
    }

    pub(crate) fn point(&self, x: i32, y: i32) -> (i32, i32) {
        let r = self.rect(IntRect::new(x, y, 0, 0));
        (r.x, r.y)
    }

    /// Whole twin pixels covered by one low-res pixel.
    pub(crate) fn block(&self) -> (i32, i32) {
        (
            self.hi.0 / self.lo.0.max(1),
            self.hi.1 / self.lo.1.max(1),
        )
    }

    pub(crate) fn twin_size(&self) -> (i32, i32) {
        self.hi
    }
}

impl<D: GpuDevice> Engine<D> {
    pub(crate) fn twin_of(&self, id: BitmapId) -> BitmapResult<Option<TwinMap>> {
        let data = self.data(id)?;
        let Some(twin) = data.hires else {
            return Ok(None);
        };
        let Ok(hi) = self.data(twin) else {
            return Ok(None);
        };
        Ok(Some(TwinMap::new(
            twin,
            data.backing.size(),
            hi.backing.size(),
        )))
    }

    /// Replay a mutation on the twin of `id`, if it has one.
    pub(crate) fn on_twin(
        &mut self,
        id: BitmapId,
        op: impl FnOnce(&mut Self, &TwinMap) -> BitmapResult<()>,
    ) -> BitmapResult<()> {
        match self.twin_of(id)? {
            Some(map) => op(self, &map),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bitmap/hires.rs"]
mod tests;
