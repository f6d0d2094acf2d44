use crate::foundation::core::{Color, IntRect};
use crate::foundation::math::lerp_u8;
use crate::surface::Surface;

/// Color of line `index` out of `len` in a linear gradient from `c1` to `c2`.
///
/// The first line is exactly `c1` and the last exactly `c2`.
pub fn gradient_step(c1: Color, c2: Color, index: i32, len: i32) -> Color {
    let t = if len <= 1 {
        0.0
    } else {
        index as f32 / (len - 1) as f32
    };
    Color::rgba(
        lerp_u8(c1.r, c2.r, t),
        lerp_u8(c1.g, c2.g, t),
        lerp_u8(c1.b, c2.b, t),
        lerp_u8(c1.a, c2.a, t),
    )
}

/// Fill `rect` with one-pixel strips interpolated from `c1` to `c2`, top to bottom when
/// `vertical`, left to right otherwise. Strips outside the surface are clipped.
pub fn fill_gradient(surface: &mut Surface, rect: IntRect, c1: Color, c2: Color, vertical: bool) {
    let r = rect.normalized();
    if r.is_empty() {
        return;
    }
    if vertical {
        for i in 0..r.h {
            let c = gradient_step(c1, c2, i, r.h);
            surface.fill_rect(IntRect::new(r.x, r.y + i, r.w, 1), c);
        }
    } else {
        for i in 0..r.w {
            let c = gradient_step(c1, c2, i, r.w);
            surface.fill_rect(IntRect::new(r.x + i, r.y, 1, r.h), c);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/gradient.rs"]
mod tests;
