use kurbo::Vec2;

use crate::foundation::core::{IntRect, Vec2i};

/// Kind of visual element displaying a child bitmap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ConsumerKind {
    /// A positioned, zoomed, rotatable sprite with its own source rectangle.
    #[default]
    Sprite,
    /// An infinitely tiling plane; implies wrap-around.
    Plane,
    /// A fixed-size window; zoom and rotation do not apply.
    Window,
}

/// Viewing parameters pushed by the consumer before each frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ChildParams {
    /// Consumer kind.
    pub kind: ConsumerKind,
    /// Screen x position of the consumer.
    pub x: i32,
    /// Screen y position of the consumer.
    pub y: i32,
    /// Rotation in degrees.
    pub angle: f64,
    /// Zoom factors; only magnitudes matter.
    pub zoom: Vec2,
    /// Origin offset in parent pixels.
    pub offset: Vec2i,
    /// Sub-rectangle of the parent being displayed.
    pub src_rect: IntRect,
    /// Horizontally mirrored display.
    pub mirrored: bool,
    /// Horizontal wave displacement amplitude.
    pub wave_amp: i32,
    /// Active clip rectangle of the scene.
    pub scene_rect: IntRect,
    /// Coordinate origin of the scene.
    pub scene_orig: Vec2i,
    /// Window width, for [`ConsumerKind::Window`].
    pub width: i32,
    /// Window height, for [`ConsumerKind::Window`].
    pub height: i32,
}

impl ChildParams {
    /// Defaults for displaying the whole of a `width` x `height` parent at the origin.
    pub fn new(kind: ConsumerKind, width: i32, height: i32) -> Self {
        Self {
            kind,
            x: 0,
            y: 0,
            angle: 0.0,
            zoom: Vec2::new(1.0, 1.0),
            offset: Vec2i::default(),
            src_rect: IntRect::from_size(width, height),
            mirrored: false,
            wave_amp: 0,
            scene_rect: IntRect::from_size(i32::MAX, i32::MAX),
            scene_orig: Vec2i::default(),
            width,
            height,
        }
    }

    /// Same parameters at a different screen position.
    pub fn with_position(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Same parameters with a different origin offset.
    pub fn with_offset(mut self, ox: i32, oy: i32) -> Self {
        self.offset = Vec2i::new(ox, oy);
        self
    }

    /// Same parameters with a different zoom.
    pub fn with_zoom(mut self, zx: f64, zy: f64) -> Self {
        self.zoom = Vec2::new(zx, zy);
        self
    }

    /// Same parameters with a different rotation.
    pub fn with_angle(mut self, degrees: f64) -> Self {
        self.angle = degrees;
        self
    }

    /// Same parameters with a different source rectangle.
    pub fn with_src_rect(mut self, rect: IntRect) -> Self {
        self.src_rect = rect;
        self
    }

    /// Same parameters with mirroring toggled.
    pub fn with_mirrored(mut self, mirrored: bool) -> Self {
        self.mirrored = mirrored;
        self
    }

    /// Same parameters with a different scene clip rectangle and origin.
    pub fn with_scene(mut self, rect: IntRect, orig: Vec2i) -> Self {
        self.scene_rect = rect;
        self.scene_orig = orig;
        self
    }

    /// Same parameters with a wave amplitude.
    pub fn with_wave(mut self, amp: i32) -> Self {
        self.wave_amp = amp;
        self
    }

    /// `true` for planes, which tile the parent.
    pub fn wraps(&self) -> bool {
        self.kind == ConsumerKind::Plane
    }
}

/// Values the consumer should draw the child with.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ChildReport {
    /// Zoom to apply to the child (consumer zoom divided by the shrink factor).
    pub zoom: Vec2,
    /// Origin offset within the child.
    pub offset: Vec2,
    /// Source rectangle within the child, for sprites.
    pub src_rect: IntRect,
    /// `false` when nothing of the parent is on screen.
    pub visible: bool,
}

impl Default for ChildReport {
    fn default() -> Self {
        Self {
            zoom: Vec2::new(1.0, 1.0),
            offset: Vec2::ZERO,
            src_rect: IntRect::default(),
            visible: false,
        }
    }
}
