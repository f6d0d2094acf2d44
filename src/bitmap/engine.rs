use crate::animation::Sequencer;
use crate::assets::{Decoded, decode_image};
use crate::bitmap::store::{
    Animation, Backing, BackingKind, BitmapData, BitmapId, Font, Slot,
};
use crate::config::EngineConfig;
use crate::foundation::core::{Color, IntRect};
use crate::foundation::error::{BitmapError, BitmapResult};
use crate::foundation::math::round_i32;
use crate::gpu::{GpuDevice, SoftwareGpu, SoftwareGpuOpts, TexFbo, TexId};
use crate::surface::Surface;

/// Frames copied by [`Engine::duplicate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameSelect {
    /// Every frame of an animation, or the only content of a static bitmap.
    All,
    /// The frame currently displayed by an animation.
    Current,
    /// One frame of an animation, clamped into range.
    Index(i32),
}

/// What a consumer binds when drawing a bitmap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sampling {
    /// Texture to sample; the hi-res twin's when there is one.
    pub texture: TexId,
    /// Width to report to the shader, always the low-res width.
    pub width: i32,
    /// Height to report to the shader, always the low-res height.
    pub height: i32,
}

pub(crate) fn slot_data(slots: &[Slot], id: BitmapId) -> BitmapResult<&BitmapData> {
    slots
        .get(id.index as usize)
        .filter(|s| s.generation == id.generation)
        .and_then(|s| s.data.as_ref())
        .ok_or_else(|| BitmapError::disposed(format!("{id:?}")))
}

pub(crate) fn slot_data_mut(slots: &mut [Slot], id: BitmapId) -> BitmapResult<&mut BitmapData> {
    slots
        .get_mut(id.index as usize)
        .filter(|s| s.generation == id.generation)
        .and_then(|s| s.data.as_mut())
        .ok_or_else(|| BitmapError::disposed(format!("{id:?}")))
}

/// Owner of every bitmap and of the device they live on.
///
/// Bitmaps are addressed by [`BitmapId`]. All work happens on the caller's thread; the host
/// drives animation timers and child viewports once per frame through
/// [`Engine::prepare_draw`].
pub struct Engine<D: GpuDevice = SoftwareGpu> {
    pub(crate) config: EngineConfig,
    pub(crate) device: D,
    pub(crate) slots: Vec<Slot>,
    free: Vec<u32>,
    run_time: f64,
    default_font: Font,
}

impl Engine<SoftwareGpu> {
    /// Engine on a [`SoftwareGpu`] with the given limits.
    pub fn software(config: EngineConfig, opts: SoftwareGpuOpts) -> BitmapResult<Self> {
        Self::new(config, SoftwareGpu::new(opts))
    }
}

impl<D: GpuDevice> Engine<D> {
    /// Validate `config` and take ownership of `device`.
    pub fn new(config: EngineConfig, device: D) -> BitmapResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            device,
            slots: Vec::new(),
            free: Vec::new(),
            run_time: 0.0,
            default_font: Font::default(),
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The device bitmaps are rendered on.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Mutable access to the device, for hosts that draw bitmaps themselves.
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Run time passed to the last [`Engine::prepare_draw`].
    pub fn run_time(&self) -> f64 {
        self.run_time
    }

    /// Number of bitmaps not yet disposed.
    pub fn live_bitmaps(&self) -> usize {
        self.slots.iter().filter(|s| s.data.is_some()).count()
    }

    /// Font given to bitmaps created from now on.
    pub fn set_default_font(&mut self, font: Font) {
        self.default_font = font;
    }

    // ----------------------------
    // Arena
    // ----------------------------

    pub(crate) fn insert(&mut self, backing: Backing) -> BitmapId {
        let data = BitmapData::new(backing, self.default_font.clone());
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.data = Some(data);
            return BitmapId {
                index,
                generation: slot.generation,
            };
        }
        self.slots.push(Slot {
            generation: 0,
            data: Some(data),
        });
        BitmapId {
            index: (self.slots.len() - 1) as u32,
            generation: 0,
        }
    }

    fn remove(&mut self, id: BitmapId) -> Option<BitmapData> {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)?;
        let data = slot.data.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        Some(data)
    }

    pub(crate) fn data(&self, id: BitmapId) -> BitmapResult<&BitmapData> {
        slot_data(&self.slots, id)
    }

    pub(crate) fn data_mut(&mut self, id: BitmapId) -> BitmapResult<&mut BitmapData> {
        slot_data_mut(&mut self.slots, id)
    }

    /// Run `f` with `dst` mutably and `src` shared; `None` is passed when they are the same.
    pub(crate) fn with_pair<R>(
        &mut self,
        dst: BitmapId,
        src: BitmapId,
        f: impl FnOnce(&mut D, &mut BitmapData, Option<&BitmapData>) -> BitmapResult<R>,
    ) -> BitmapResult<R> {
        let slot = self
            .slots
            .get_mut(dst.index as usize)
            .filter(|s| s.generation == dst.generation)
            .ok_or_else(|| BitmapError::disposed(format!("{dst:?}")))?;
        let mut data = slot
            .data
            .take()
            .ok_or_else(|| BitmapError::disposed(format!("{dst:?}")))?;
        let out = if src == dst {
            f(&mut self.device, &mut data, None)
        } else {
            match slot_data(&self.slots, src) {
                Ok(s) => f(&mut self.device, &mut data, Some(s)),
                Err(e) => Err(e),
            }
        };
        self.slots[dst.index as usize].data = Some(data);
        out
    }

    /// Drop the readback cache (unless the caller patched it) and mark child viewports dirty.
    pub(crate) fn modified(&mut self, id: BitmapId, drop_cache: bool) -> BitmapResult<()> {
        let data = self.data_mut(id)?;
        if drop_cache {
            data.cache = None;
        }
        let children = data.children.clone();
        for child in children {
            if let Ok(c) = self.data_mut(child)
                && let Some(link) = c.child.as_mut()
            {
                link.viewport.mark_dirty();
            }
        }
        Ok(())
    }

    pub(crate) fn ensure_static(&self, id: BitmapId, op: &str) -> BitmapResult<&BitmapData> {
        let data = self.data(id)?;
        if data.backing.kind() == BackingKind::Animated {
            return Err(BitmapError::unsupported(format!(
                "{op} is not defined for animated bitmaps"
            )));
        }
        Ok(data)
    }

    // ----------------------------
    // Construction
    // ----------------------------

    fn blank_backing(&mut self, width: i32, height: i32, force_mega: bool) -> BitmapResult<Backing> {
        let max = self.device.max_texture_size() as i32;
        if force_mega || width > max || height > max {
            return Ok(Backing::Mega(Surface::new(width as u32, height as u32)?));
        }
        let tex = self.device.request(width as u32, height as u32)?;
        if let Err(e) = self.device.clear_rect(&tex, None, Color::transparent()) {
            self.device.release(tex);
            return Err(e);
        }
        Ok(Backing::Texture(tex))
    }

    fn surface_backing(&mut self, surface: Surface, force_mega: bool) -> BitmapResult<Backing> {
        let max = self.device.max_texture_size();
        if force_mega || surface.width() > max || surface.height() > max {
            return Ok(Backing::Mega(surface));
        }
        let tex = self.device.request(surface.width(), surface.height())?;
        if let Err(e) = self.device.upload(&tex, tex.rect(), &surface) {
            self.device.release(tex);
            return Err(e);
        }
        Ok(Backing::Texture(tex))
    }

    pub(crate) fn link_twin(&mut self, lores: BitmapId, hires: BitmapId) -> BitmapResult<()> {
        self.data_mut(lores)?.hires = Some(hires);
        self.data_mut(hires)?.lores = Some(lores);
        Ok(())
    }

    fn create_inner(&mut self, width: i32, height: i32, twin: bool) -> BitmapResult<BitmapId> {
        if width <= 0 || height <= 0 {
            return Err(BitmapError::invalid(format!(
                "bitmap size {width}x{height} must be positive"
            )));
        }
        let hires = if twin && self.config.enable_hires {
            let f = self.config.texture_scaling_factor;
            let hw = round_i32(f * f64::from(width));
            let hh = round_i32(f * f64::from(height));
            Some(self.create_inner(hw, hh, false)?)
        } else {
            None
        };
        let force_mega = match hires {
            Some(h) => self.is_mega(h)?,
            None => false,
        };
        let backing = match self.blank_backing(width, height, force_mega) {
            Ok(b) => b,
            Err(e) => {
                if let Some(h) = hires {
                    self.dispose(h);
                }
                return Err(e);
            }
        };
        let id = self.insert(backing);
        if let Some(h) = hires {
            self.link_twin(id, h)?;
        }
        tracing::debug!(?id, width, height, mega = self.is_mega(id)?, "bitmap created");
        Ok(id)
    }

    /// Blank, transparent bitmap. Gets a hi-res twin when the configuration enables them.
    ///
    /// Sizes beyond the device texture limit produce a mega bitmap.
    pub fn create(&mut self, width: i32, height: i32) -> BitmapResult<BitmapId> {
        self.create_inner(width, height, true)
    }

    /// Blank bitmap that never gets a twin, for content already at high resolution.
    pub fn create_hires(&mut self, width: i32, height: i32) -> BitmapResult<BitmapId> {
        self.create_inner(width, height, false)
    }

    /// Bitmap from tightly packed RGBA8 bytes. The whole area counts as painted.
    pub fn from_rgba8(&mut self, pixels: Vec<u8>, width: u32, height: u32) -> BitmapResult<BitmapId> {
        if width == 0 || height == 0 {
            return Err(BitmapError::invalid(format!(
                "bitmap size {width}x{height} must be positive"
            )));
        }
        let surface = Surface::from_rgba8(width, height, pixels)?;
        self.from_surface(surface, None, false)
    }

    /// Bitmap from decoded pixels, with an optional hi-res twin built from `hires`.
    ///
    /// The bitmap is a mega bitmap when it exceeds the texture limit, when `force_mega` is set,
    /// or when its twin had to be one.
    pub fn from_surface(
        &mut self,
        surface: Surface,
        hires: Option<Surface>,
        force_mega: bool,
    ) -> BitmapResult<BitmapId> {
        let twin = match hires {
            Some(h) => Some(self.from_surface(h, None, false)?),
            None => None,
        };
        let force_mega = force_mega
            || match twin {
                Some(t) => self.is_mega(t)?,
                None => false,
            };
        let backing = match self.surface_backing(surface, force_mega) {
            Ok(b) => b,
            Err(e) => {
                if let Some(t) = twin {
                    self.dispose(t);
                }
                return Err(e);
            }
        };
        let id = self.insert(backing);
        let rect = self.data(id)?.rect();
        self.data_mut(id)?.tainted.add(rect);
        if let Some(t) = twin {
            self.link_twin(id, t)?;
        }
        tracing::debug!(?id, width = rect.w, height = rect.h, "bitmap created from pixels");
        Ok(id)
    }

    /// Decode `bytes` into a bitmap. Multi-frame GIFs become animated bitmaps.
    ///
    /// `hires` is an optional higher resolution rendition of the same image; when it cannot be
    /// decoded the bitmap is created without a twin.
    pub fn load(&mut self, bytes: &[u8], hires: Option<&[u8]>) -> BitmapResult<BitmapId> {
        let twin = match hires.map(|b| self.load(b, None)) {
            Some(Ok(t)) => Some(t),
            Some(Err(e)) => {
                tracing::debug!(error = %e, "no usable hi-res rendition");
                None
            }
            None => None,
        };
        let built = match decode_image(bytes) {
            Ok(Decoded::Still(surface)) => {
                let force_mega = match twin {
                    Some(t) => self.is_mega(t)?,
                    None => false,
                };
                self.surface_backing(surface, force_mega)
            }
            Ok(Decoded::Animation {
                frames,
                fps,
                looping,
            }) => self.animation_backing(frames, fps, looping),
            Err(e) => Err(e),
        };
        let backing = match built {
            Ok(b) => b,
            Err(e) => {
                if let Some(t) = twin {
                    self.dispose(t);
                }
                return Err(e);
            }
        };
        let id = self.insert(backing);
        let rect = self.data(id)?.rect();
        self.data_mut(id)?.tainted.add(rect);
        if let Some(t) = twin {
            self.link_twin(id, t)?;
        }
        tracing::debug!(?id, kind = ?self.backing_kind(id)?, "bitmap loaded");
        Ok(id)
    }

    fn animation_backing(
        &mut self,
        frames: Vec<Surface>,
        fps: Option<f64>,
        looping: bool,
    ) -> BitmapResult<Backing> {
        let (w, h) = frames
            .first()
            .map(|f| (f.width(), f.height()))
            .unwrap_or((0, 0));
        let max = self.device.max_texture_size();
        if w > max || h > max {
            return Err(BitmapError::too_large(format!(
                "animation {w}x{h} exceeds the {max}x{max} texture limit"
            )));
        }
        let mut textures: Vec<TexFbo> = Vec::with_capacity(frames.len());
        for frame in &frames {
            let uploaded = self.device.request(w, h).and_then(|tex| {
                match self.device.upload(&tex, tex.rect(), frame) {
                    Ok(()) => Ok(tex),
                    Err(e) => {
                        self.device.release(tex);
                        Err(e)
                    }
                }
            });
            match uploaded {
                Ok(tex) => textures.push(tex),
                Err(e) => {
                    for tex in textures {
                        self.device.release(tex);
                    }
                    return Err(e);
                }
            }
        }
        let fps = fps.filter(|f| f.is_finite() && *f > 0.0).unwrap_or(self.config.frame_rate);
        Ok(Backing::Animated(Animation {
            frames: textures,
            seq: Sequencer::new(fps, looping),
        }))
    }

    /// Copy `src` into a new bitmap. Painted area, and for animations timing, carry over.
    ///
    /// [`FrameSelect::Current`] and [`FrameSelect::Index`] require an animated source and
    /// produce a static copy of one frame.
    pub fn duplicate(&mut self, src: BitmapId, select: FrameSelect) -> BitmapResult<BitmapId> {
        let data = slot_data(&self.slots, src)?;
        if select != FrameSelect::All && data.backing.kind() != BackingKind::Animated {
            return Err(BitmapError::unsupported(
                "frame selection needs an animated bitmap",
            ));
        }
        if data.hires.is_some() {
            tracing::warn!(?src, "duplicate ignores the hi-res twin");
        }
        let tainted = data.tainted.clone();
        let backing = match (&data.backing, select) {
            (Backing::Mega(s), _) => Backing::Mega(s.clone()),
            (Backing::Texture(t), _) => Backing::Texture(copied_texture(&mut self.device, t)?),
            (Backing::Animated(a), FrameSelect::All) => {
                let mut frames = Vec::with_capacity(a.frames.len());
                for frame in &a.frames {
                    match copied_texture(&mut self.device, frame) {
                        Ok(c) => frames.push(c),
                        Err(e) => {
                            for f in frames {
                                self.device.release(f);
                            }
                            return Err(e);
                        }
                    }
                }
                Backing::Animated(Animation {
                    frames,
                    seq: Sequencer::new(a.seq.fps(), a.seq.looping()),
                })
            }
            (Backing::Animated(a), select) => {
                let frame = match select {
                    FrameSelect::Index(i) => &a.frames[(i.max(0) as usize).min(a.frames.len() - 1)],
                    _ => a.current(),
                };
                Backing::Texture(copied_texture(&mut self.device, frame)?)
            }
        };
        let id = self.insert(backing);
        self.data_mut(id)?.tainted = tainted;
        tracing::debug!(?src, ?id, ?select, "bitmap duplicated");
        Ok(id)
    }

    // ----------------------------
    // Queries
    // ----------------------------

    /// Width in pixels.
    pub fn width(&self, id: BitmapId) -> BitmapResult<i32> {
        Ok(self.data(id)?.backing.size().0)
    }

    /// Height in pixels.
    pub fn height(&self, id: BitmapId) -> BitmapResult<i32> {
        Ok(self.data(id)?.backing.size().1)
    }

    /// Bounds anchored at the origin.
    pub fn rect(&self, id: BitmapId) -> BitmapResult<IntRect> {
        Ok(self.data(id)?.rect())
    }

    /// Active backing representation.
    pub fn backing_kind(&self, id: BitmapId) -> BitmapResult<BackingKind> {
        Ok(self.data(id)?.backing.kind())
    }

    /// `true` for CPU-surface bitmaps.
    pub fn is_mega(&self, id: BitmapId) -> BitmapResult<bool> {
        Ok(self.backing_kind(id)? == BackingKind::Mega)
    }

    /// `true` for multi-frame bitmaps.
    pub fn is_animated(&self, id: BitmapId) -> BitmapResult<bool> {
        Ok(self.backing_kind(id)? == BackingKind::Animated)
    }

    /// `true` once `id` has been disposed.
    pub fn is_disposed(&self, id: BitmapId) -> bool {
        self.data(id).is_err()
    }

    /// `true` when any part of `rect` is painted.
    pub fn touches(&self, id: BitmapId, rect: IntRect) -> BitmapResult<bool> {
        Ok(self.data(id)?.tainted.touches(rect))
    }

    /// Number of painted pixels.
    pub fn tainted_area(&self, id: BitmapId) -> BitmapResult<i64> {
        Ok(self.data(id)?.tainted.area())
    }

    /// Largest size a texture-backed bitmap may have.
    pub fn max_size(&self) -> i32 {
        self.device.max_texture_size() as i32
    }

    /// Text settings of the bitmap.
    pub fn font(&self, id: BitmapId) -> BitmapResult<&Font> {
        Ok(&self.data(id)?.font)
    }

    /// Replace the text settings of the bitmap.
    pub fn set_font(&mut self, id: BitmapId, font: Font) -> BitmapResult<()> {
        self.data_mut(id)?.font = font;
        Ok(())
    }

    /// Texture and size a consumer should draw `id` with.
    ///
    /// A hi-res twin is sampled in place of the low-res texture, at the low-res size. Mega
    /// bitmaps cannot be sampled directly; draw them through a child.
    pub fn bind_for_sampling(&self, id: BitmapId) -> BitmapResult<Sampling> {
        let data = self.data(id)?;
        let (width, height) = data.backing.size();
        let target = match data.hires {
            Some(h) => self.data(h).unwrap_or(data),
            None => data,
        };
        let tex = target.backing.texture().ok_or_else(|| {
            BitmapError::unsupported("mega bitmaps are sampled through a child bitmap")
        })?;
        Ok(Sampling {
            texture: tex.id(),
            width,
            height,
        })
    }

    /// Texture that draws into `id` render to.
    pub fn bind_for_rendering(&self, id: BitmapId) -> BitmapResult<TexId> {
        self.data(id)?
            .backing
            .texture()
            .map(TexFbo::id)
            .ok_or_else(|| BitmapError::unsupported("mega bitmaps have no render target"))
    }

    // ----------------------------
    // Lifecycle
    // ----------------------------

    /// Pair `lores` with `hires`, replacing any previous twin links of either.
    pub fn set_hires(&mut self, lores: BitmapId, hires: BitmapId) -> BitmapResult<()> {
        self.data(hires)?;
        if let Some(old) = self.data(lores)?.hires
            && let Ok(d) = self.data_mut(old)
        {
            d.lores = None;
        }
        self.link_twin(lores, hires)
    }

    /// Twin of `id`, if any.
    pub fn hires(&self, id: BitmapId) -> BitmapResult<Option<BitmapId>> {
        Ok(self.data(id)?.hires.filter(|h| !self.is_disposed(*h)))
    }

    /// Low-res bitmap `id` is the twin of, if any.
    pub fn lores(&self, id: BitmapId) -> BitmapResult<Option<BitmapId>> {
        Ok(self.data(id)?.lores.filter(|l| !self.is_disposed(*l)))
    }

    /// `true` when `id` has a live hi-res twin.
    pub fn has_hires(&self, id: BitmapId) -> BitmapResult<bool> {
        Ok(self.hires(id)?.is_some())
    }

    /// Leave the twin alive when `id` is disposed; its owner disposes it.
    pub fn assume_external_gc(&mut self, id: BitmapId) -> BitmapResult<()> {
        self.data_mut(id)?.external_gc = true;
        Ok(())
    }

    /// Release everything `id` holds. Disposing twice is a no-op.
    ///
    /// Children go first, then the hi-res twin unless it is externally owned, then the bitmap's
    /// own textures. Links from other bitmaps to `id` are cleared.
    pub fn dispose(&mut self, id: BitmapId) {
        let Ok(data) = self.data(id) else {
            return;
        };
        let children = data.children.clone();
        let twin = data.hires;
        let external = data.external_gc;
        for child in children {
            self.dispose(child);
        }
        if let Some(t) = twin {
            if external {
                if let Ok(d) = self.data_mut(t) {
                    d.lores = None;
                }
            } else {
                self.dispose(t);
            }
        }
        let Some(data) = self.remove(id) else {
            return;
        };
        if let Some(l) = data.lores
            && let Ok(d) = self.data_mut(l)
        {
            d.hires = None;
        }
        if let Some(link) = &data.child
            && let Ok(p) = self.data_mut(link.parent)
        {
            p.children.retain(|c| *c != id);
        }
        data.backing.release(&mut self.device);
        tracing::debug!(?id, "bitmap disposed");
    }

    /// Per-frame callback: advance animation timers to `run_time` seconds and refresh every
    /// child viewport that has consumer parameters.
    pub fn prepare_draw(&mut self, run_time: f64) -> BitmapResult<()> {
        self.run_time = run_time;
        let mut children = Vec::new();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let Some(data) = slot.data.as_mut() else {
                continue;
            };
            if let Backing::Animated(a) = &mut data.backing {
                let n = a.frames.len();
                a.seq.update(run_time, n);
            }
            if data.child.as_ref().is_some_and(|c| c.params.is_some()) {
                children.push(BitmapId {
                    index: index as u32,
                    generation: slot.generation,
                });
            }
        }
        for child in children {
            if !self.is_disposed(child) {
                self.child_update(child)?;
            }
        }
        Ok(())
    }
}

/// New texture holding a copy of `src`. Nothing is leaked on failure.
pub(crate) fn copied_texture<D: GpuDevice>(device: &mut D, src: &TexFbo) -> BitmapResult<TexFbo> {
    let copy = device.request(src.width(), src.height())?;
    if let Err(e) = device.blit(&copy, copy.rect(), src, src.rect()) {
        device.release(copy);
        return Err(e);
    }
    Ok(copy)
}

#[cfg(test)]
#[path = "../../tests/unit/bitmap/engine.rs"]
mod tests;
