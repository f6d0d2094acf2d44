use crate::animation::Sequencer;
use crate::foundation::core::IntRect;
use crate::gpu::{GpuDevice, TexFbo};
use crate::region::TaintedRegion;
use crate::surface::Surface;
use crate::viewport::{ChildParams, ChildViewport};

/// Generational handle of a bitmap owned by an [`Engine`](crate::Engine).
///
/// Handles stay cheap to copy after disposal; every use checks the generation, so a stale
/// handle reports [`BitmapError::Disposed`](crate::BitmapError::Disposed) instead of reaching
/// a recycled slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct BitmapId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

/// Which representation currently backs a bitmap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BackingKind {
    /// One device texture.
    Texture,
    /// CPU surface, for content larger than a texture.
    Mega,
    /// Two or more device textures played as frames.
    Animated,
}

/// Text settings carried by a bitmap. Glyph rendering happens elsewhere.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Font {
    /// Family names in fallback order.
    pub names: Vec<String>,
    /// Pixel size.
    pub size: u32,
    /// Bold face.
    pub bold: bool,
    /// Italic face.
    pub italic: bool,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            names: vec!["Liberation Sans".to_owned()],
            size: 24,
            bold: false,
            italic: false,
        }
    }
}

#[derive(Debug)]
pub(crate) struct Animation {
    pub(crate) frames: Vec<TexFbo>,
    pub(crate) seq: Sequencer,
}

impl Animation {
    pub(crate) fn current(&self) -> &TexFbo {
        let i = self.seq.current_frame(self.frames.len());
        &self.frames[i.min(self.frames.len() - 1)]
    }
}

#[derive(Debug)]
pub(crate) enum Backing {
    Texture(TexFbo),
    Mega(Surface),
    Animated(Animation),
}

impl Backing {
    pub(crate) fn kind(&self) -> BackingKind {
        match self {
            Self::Texture(_) => BackingKind::Texture,
            Self::Mega(_) => BackingKind::Mega,
            Self::Animated(_) => BackingKind::Animated,
        }
    }

    pub(crate) fn size(&self) -> (i32, i32) {
        match self {
            Self::Texture(t) => (t.width() as i32, t.height() as i32),
            Self::Mega(s) => (s.width() as i32, s.height() as i32),
            Self::Animated(a) => a
                .frames
                .first()
                .map(|t| (t.width() as i32, t.height() as i32))
                .unwrap_or((0, 0)),
        }
    }

    /// Texture drawn into and sampled from: the plain texture or the current frame.
    pub(crate) fn texture(&self) -> Option<&TexFbo> {
        match self {
            Self::Texture(t) => Some(t),
            Self::Mega(_) => None,
            Self::Animated(a) => Some(a.current()),
        }
    }

    pub(crate) fn mega(&self) -> Option<&Surface> {
        match self {
            Self::Mega(s) => Some(s),
            _ => None,
        }
    }

    /// Turn a plain texture into a one-frame animation. Returns `false` for other backings.
    pub(crate) fn promote(&mut self, fps: f64) -> bool {
        let empty = Self::Animated(Animation {
            frames: Vec::new(),
            seq: Sequencer::new(fps, true),
        });
        match std::mem::replace(self, empty) {
            Self::Texture(t) => {
                if let Self::Animated(a) = self {
                    a.frames.push(t);
                }
                true
            }
            other => {
                *self = other;
                false
            }
        }
    }

    /// Turn a one-frame animation back into a plain texture. Returns `false` otherwise.
    pub(crate) fn demote(&mut self) -> bool {
        let frame = match self {
            Self::Animated(a) if a.frames.len() == 1 => a.frames.pop(),
            _ => None,
        };
        match frame {
            Some(t) => {
                *self = Self::Texture(t);
                true
            }
            None => false,
        }
    }

    pub(crate) fn release(self, device: &mut dyn GpuDevice) {
        match self {
            Self::Texture(t) => device.release(t),
            Self::Mega(_) => {}
            Self::Animated(a) => {
                for t in a.frames {
                    device.release(t);
                }
            }
        }
    }
}

#[derive(Debug)]
pub(crate) struct ChildLink {
    pub(crate) parent: BitmapId,
    pub(crate) viewport: ChildViewport,
    pub(crate) params: Option<ChildParams>,
}

#[derive(Debug)]
pub(crate) struct BitmapData {
    pub(crate) backing: Backing,
    pub(crate) cache: Option<Surface>,
    pub(crate) tainted: TaintedRegion,
    pub(crate) hires: Option<BitmapId>,
    pub(crate) lores: Option<BitmapId>,
    pub(crate) external_gc: bool,
    pub(crate) child: Option<ChildLink>,
    pub(crate) children: Vec<BitmapId>,
    pub(crate) font: Font,
}

impl BitmapData {
    pub(crate) fn new(backing: Backing, font: Font) -> Self {
        let (w, h) = backing.size();
        Self {
            backing,
            cache: None,
            tainted: TaintedRegion::for_size(w, h),
            hires: None,
            lores: None,
            external_gc: false,
            child: None,
            children: Vec::new(),
            font,
        }
    }

    pub(crate) fn rect(&self) -> IntRect {
        let (w, h) = self.backing.size();
        IntRect::from_size(w, h)
    }
}

#[derive(Debug, Default)]
pub(crate) struct Slot {
    pub(crate) generation: u32,
    pub(crate) data: Option<BitmapData>,
}
