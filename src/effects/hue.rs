use std::f32::consts::TAU;

use crate::effects::composite::Rgba8;

/// Rotate the hue of one pixel by `degrees` in YIQ space. Alpha is kept.
pub fn hue_rotate(px: Rgba8, degrees: f32) -> Rgba8 {
    let [r, g, b, a] = px.map(|c| f32::from(c) / 255.0);

    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let i = 0.596 * r - 0.275 * g - 0.321 * b;
    let q = 0.212 * r - 0.523 * g + 0.311 * b;

    let chroma = (i * i + q * q).sqrt();
    let hue = q.atan2(i) - degrees / 360.0 * TAU;
    let (i, q) = (chroma * hue.cos(), chroma * hue.sin());

    let out = [
        y + 0.956 * i + 0.621 * q,
        y - 0.272 * i - 0.647 * q,
        y - 1.107 * i + 1.704 * q,
    ];
    let q8 = |v: f32| (v * 255.0).round().clamp(0.0, 255.0) as u8;
    [q8(out[0]), q8(out[1]), q8(out[2]), (a * 255.0).round() as u8]
}

/// Rotate the hue of every pixel of an RGBA8 buffer in place.
pub fn hue_rotate_in_place(buf: &mut [u8], degrees: f32) {
    for px in buf.chunks_exact_mut(4) {
        let out = hue_rotate([px[0], px[1], px[2], px[3]], degrees);
        px.copy_from_slice(&out);
    }
}

/// Reduce a hue adjustment to `[0, 360)`, `None` when it is a whole number of turns.
pub fn normalize_hue(hue: i32) -> Option<i32> {
    let h = hue.rem_euclid(360);
    (h != 0).then_some(h)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/hue.rs"]
mod tests;
