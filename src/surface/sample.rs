use crate::foundation::core::IntRect;

/// Per-pixel write mode of a surface blit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlitMode {
    /// Blend the source over the destination instead of overwriting it.
    pub blend: bool,
    /// Whole-surface alpha modulation applied to every source pixel.
    pub alpha_mod: u8,
}

impl BlitMode {
    /// Plain copy at full alpha.
    pub const COPY: Self = Self {
        blend: false,
        alpha_mod: 255,
    };

    /// Straight-alpha "over" at full alpha.
    pub const BLEND: Self = Self {
        blend: true,
        alpha_mod: 255,
    };

    /// Same mode with a different alpha modulation.
    pub fn with_alpha_mod(self, alpha_mod: u8) -> Self {
        Self { alpha_mod, ..self }
    }
}

/// Nearest-neighbour mapping from destination to source positions along one axis.
///
/// Either extent may be negative; mirroring happens when exactly one of them is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxisMap {
    dst_start: i32,
    dst_len: i32,
    src_start: i32,
    src_len: i32,
    flip: bool,
}

impl AxisMap {
    /// Build the mapping for signed `(pos, len)` pairs.
    pub fn new(dst_pos: i32, dst_len: i32, src_pos: i32, src_len: i32) -> Self {
        let (dst_start, dst_abs) = if dst_len < 0 {
            (dst_pos + dst_len, -dst_len)
        } else {
            (dst_pos, dst_len)
        };
        let (src_start, src_abs) = if src_len < 0 {
            (src_pos + src_len, -src_len)
        } else {
            (src_pos, src_len)
        };
        Self {
            dst_start,
            dst_len: dst_abs,
            src_start,
            src_len: src_abs,
            flip: (dst_len < 0) != (src_len < 0),
        }
    }

    /// First destination coordinate covered.
    pub fn dst_start(&self) -> i32 {
        self.dst_start
    }

    /// Number of destination pixels covered.
    pub fn dst_len(&self) -> i32 {
        self.dst_len
    }

    /// Source coordinate sampled for destination coordinate `d`.
    pub fn source_of(&self, d: i32) -> i32 {
        let i = i64::from(d - self.dst_start);
        let u = ((2 * i + 1) * i64::from(self.src_len) / (2 * i64::from(self.dst_len))) as i32;
        if self.flip {
            self.src_start + self.src_len - 1 - u
        } else {
            self.src_start + u
        }
    }

    /// Destination coordinates covered, clipped to `[0, limit)`.
    pub fn clipped_range(&self, limit: i32) -> std::ops::Range<i32> {
        let start = self.dst_start.max(0);
        let end = (self.dst_start + self.dst_len).min(limit);
        start..end.max(start)
    }
}

/// Visit every destination pixel of `dst_rect` inside `dst_w` x `dst_h`, together with the source
/// pixel it samples from `src_rect`. Source positions are not bounds-checked.
pub(crate) fn for_each_mapped(
    dst_rect: IntRect,
    src_rect: IntRect,
    dst_w: i32,
    dst_h: i32,
    mut f: impl FnMut(i32, i32, i32, i32),
) {
    if dst_rect.is_empty() || src_rect.is_empty() {
        return;
    }
    let mx = AxisMap::new(dst_rect.x, dst_rect.w, src_rect.x, src_rect.w);
    let my = AxisMap::new(dst_rect.y, dst_rect.h, src_rect.y, src_rect.h);
    let xs = mx.clipped_range(dst_w);
    for dy in my.clipped_range(dst_h) {
        let sy = my.source_of(dy);
        for dx in xs.clone() {
            f(dx, dy, mx.source_of(dx), sy);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/sample.rs"]
mod tests;
