pub use kurbo::{Affine, Point, Rect, Vec2};

/// Integer rectangle in bitmap pixel space.
///
/// Width and height may be negative: a negative extent mirrors the rectangle along that axis,
/// which is how flipped blits are expressed.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct IntRect {
    /// Left edge (or right edge when `w < 0`).
    pub x: i32,
    /// Top edge (or bottom edge when `h < 0`).
    pub y: i32,
    /// Signed width.
    pub w: i32,
    /// Signed height.
    pub h: i32,
}

impl IntRect {
    /// Build a rectangle from position and signed size.
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle anchored at the origin.
    pub const fn from_size(w: i32, h: i32) -> Self {
        Self { x: 0, y: 0, w, h }
    }

    /// Top-left corner.
    pub fn pos(self) -> Vec2i {
        Vec2i::new(self.x, self.y)
    }

    /// Signed size.
    pub fn size(self) -> Vec2i {
        Vec2i::new(self.w, self.h)
    }

    /// Return the same area with non-negative width and height.
    ///
    /// Edges beyond the `i32` range saturate.
    pub fn normalized(self) -> Self {
        let mut out = self;
        if out.w < 0 {
            out.w = out.w.saturating_neg();
            out.x = out.x.saturating_sub(out.w);
        }
        if out.h < 0 {
            out.h = out.h.saturating_neg();
            out.y = out.y.saturating_sub(out.h);
        }
        out
    }

    /// `true` when the rectangle covers no pixels.
    pub fn is_empty(self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Exclusive right edge of the normalized rectangle.
    pub fn right(self) -> i32 {
        let n = self.normalized();
        n.x.saturating_add(n.w)
    }

    /// Exclusive bottom edge of the normalized rectangle.
    pub fn bottom(self) -> i32 {
        let n = self.normalized();
        n.y.saturating_add(n.h)
    }

    /// Intersection of two normalized rectangles, `None` when they do not overlap.
    pub fn intersect(self, other: IntRect) -> Option<IntRect> {
        let a = self.normalized();
        let b = other.normalized();
        let x0 = a.x.max(b.x);
        let y0 = a.y.max(b.y);
        let x1 = a.right().min(b.right());
        let y1 = a.bottom().min(b.bottom());
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(IntRect::new(
            x0,
            y0,
            x1.saturating_sub(x0),
            y1.saturating_sub(y0),
        ))
    }

    /// `true` when the rectangles share at least one pixel.
    pub fn intersects(self, other: IntRect) -> bool {
        self.intersect(other).is_some()
    }

    /// `true` when `other` lies completely inside `self`.
    pub fn encloses(self, other: IntRect) -> bool {
        let a = self.normalized();
        let b = other.normalized();
        b.x >= a.x && b.y >= a.y && b.right() <= a.right() && b.bottom() <= a.bottom()
    }

    /// Integer rescale `v * num / den` per axis, truncating toward zero.
    pub fn scaled(self, num_w: i32, den_w: i32, num_h: i32, den_h: i32) -> Self {
        fn s(v: i32, num: i32, den: i32) -> i32 {
            if den == 0 {
                return v;
            }
            (i64::from(v) * i64::from(num) / i64::from(den)) as i32
        }
        Self {
            x: s(self.x, num_w, den_w),
            y: s(self.y, num_h, den_h),
            w: s(self.w, num_w, den_w),
            h: s(self.h, num_h, den_h),
        }
    }
}

/// Integer 2D vector.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Vec2i {
    /// Horizontal component.
    pub x: i32,
    /// Vertical component.
    pub y: i32,
}

impl Vec2i {
    /// Build a vector.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Straight (non-premultiplied) RGBA8 color, the pixel format of every bitmap.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// Build a color from straight RGBA channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Fully transparent black.
    pub const fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Build a color from normalized float channels, clamping into `[0, 1]`.
    pub fn from_f32(r: f32, g: f32, b: f32, a: f32) -> Self {
        fn q(v: f32) -> u8 {
            (v.clamp(0.0, 1.0) * 255.0) as u8
        }
        Self::rgba(q(r), q(g), q(b), q(a))
    }

    /// Channels as a `[r, g, b, a]` array.
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Build from a `[r, g, b, a]` array.
    pub const fn from_array(px: [u8; 4]) -> Self {
        Self::rgba(px[0], px[1], px[2], px[3])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
