use crate::bitmap::engine::Engine;
use crate::bitmap::store::{BitmapId, ChildLink};
use crate::foundation::core::Color;
use crate::foundation::error::{BitmapError, BitmapResult};
use crate::gpu::GpuDevice;
use crate::viewport::{ChildParams, ChildReport, ChildState, ChildViewport};

fn not_a_child() -> BitmapError {
    BitmapError::unsupported("bitmap is not a child bitmap")
}

impl<D: GpuDevice> Engine<D> {
    /// Texture-sized bitmap that shows a moving window of `parent`.
    ///
    /// The child is at most [`Engine::max_size`] on each axis and is disposed together with its
    /// parent. When the parent has a hi-res twin the child gets one too, scaled by the parent's
    /// twin factor and capped at the texture limit.
    pub fn spawn_child(&mut self, parent: BitmapId) -> BitmapResult<BitmapId> {
        let (pw, ph) = self.data(parent)?.backing.size();
        let max = self.max_size();
        let (cw, ch) = (pw.min(max), ph.min(max));
        let child = self.create_hires(cw, ch)?;
        if let Some(map) = self.twin_of(parent)? {
            let (tw, th) = map.twin_size();
            let factor = (f64::from(tw) / f64::from(pw)).max(f64::from(th) / f64::from(ph));
            let factor = factor.min(f64::from(max) / f64::from(cw.max(ch)));
            let size = |v: i32| ((f64::from(v) * factor).round() as i32).clamp(1, max);
            let twin = match self.create_hires(size(cw), size(ch)) {
                Ok(t) => t,
                Err(e) => {
                    self.dispose(child);
                    return Err(e);
                }
            };
            self.link_twin(child, twin)?;
        }
        self.data_mut(child)?.child = Some(ChildLink {
            parent,
            viewport: ChildViewport::new(pw, ph, cw, ch),
            params: None,
        });
        self.data_mut(parent)?.children.push(child);
        tracing::debug!(?parent, ?child, cw, ch, "child bitmap spawned");
        Ok(child)
    }

    /// Viewing parameters used by the next [`Engine::child_update`].
    pub fn set_child_params(&mut self, child: BitmapId, params: ChildParams) -> BitmapResult<()> {
        let link = self.data_mut(child)?.child.as_mut().ok_or_else(not_a_child)?;
        link.params = Some(params);
        Ok(())
    }

    /// Re-plan the child's window for its current parameters and re-render it from the parent
    /// when the plan asks for it.
    #[tracing::instrument(skip(self))]
    pub fn child_update(&mut self, child: BitmapId) -> BitmapResult<ChildReport> {
        let (screen_w, screen_h) = (self.config.screen_width, self.config.screen_height);
        let data = self.data_mut(child)?;
        let rect = data.rect();
        let link = data.child.as_mut().ok_or_else(not_a_child)?;
        let params = link
            .params
            .ok_or_else(|| BitmapError::invalid("child has no viewing parameters"))?;
        let parent = link.parent;
        let plan = link.viewport.plan(&params, screen_w, screen_h);
        if plan.blits.is_empty() {
            return Ok(plan.report);
        }

        self.fill_single(child, rect, Color::transparent())?;
        self.data_mut(child)?.tainted.clear();
        for (dst, src) in &plan.blits {
            self.blit_single(child, *dst, parent, *src, 255)?;
        }
        if let (Some(pm), Some(cm)) = (self.twin_of(parent)?, self.twin_of(child)?) {
            let twin_rect = cm.rect(rect);
            self.fill_single(cm.twin, twin_rect, Color::transparent())?;
            self.data_mut(cm.twin)?.tainted.clear();
            for (dst, src) in &plan.blits {
                self.blit_single(cm.twin, cm.rect(*dst), pm.twin, pm.rect(*src), 255)?;
            }
        }
        tracing::trace!(?child, pieces = plan.blits.len(), "child re-rendered");
        Ok(plan.report)
    }

    /// Pan position and shrink of a child's window.
    pub fn child_state(&self, child: BitmapId) -> BitmapResult<ChildState> {
        let link = self.data(child)?.child.as_ref().ok_or_else(not_a_child)?;
        Ok(link.viewport.state())
    }

    /// Last report of a child, without re-planning.
    pub fn child_report(&self, child: BitmapId) -> BitmapResult<ChildReport> {
        let link = self.data(child)?.child.as_ref().ok_or_else(not_a_child)?;
        Ok(link.viewport.report())
    }

    /// Parent of a child bitmap; `None` for other bitmaps.
    pub fn parent(&self, id: BitmapId) -> BitmapResult<Option<BitmapId>> {
        Ok(self.data(id)?.child.as_ref().map(|l| l.parent))
    }

    /// Live children of `id`.
    pub fn children(&self, id: BitmapId) -> BitmapResult<&[BitmapId]> {
        Ok(&self.data(id)?.children)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bitmap/child.rs"]
mod tests;
