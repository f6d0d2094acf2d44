use kurbo::{Affine, Point};
use rayon::prelude::*;

use crate::effects::composite::{add_weighted, resolve_accum};

/// Clamp radial blur parameters to their supported ranges: angle to `[0, 359]`, divisions to
/// `[2, 100]`.
pub fn clamp_radial_params(angle: i32, divisions: i32) -> (i32, i32) {
    (angle.clamp(0, 359), divisions.clamp(2, 100))
}

/// Reflect `v` into `[0, len)` as if the image were tiled with mirrored copies.
fn mirror_coord(v: i32, len: i32) -> i32 {
    let period = 2 * len;
    let m = v.rem_euclid(period);
    if m < len { m } else { period - 1 - m }
}

/// Additive fan of `divisions` rotated copies of `src` spread over `angle` degrees around the
/// image center, each at `1 / divisions` opacity. Edges sample mirrored copies of the image.
///
/// Parameters are clamped with [`clamp_radial_params`].
pub fn radial_blur_rgba8(src: &[u8], width: u32, height: u32, angle: i32, divisions: i32) -> Vec<u8> {
    let (angle, divisions) = clamp_radial_params(angle, divisions);
    let w = width as i32;
    let h = height as i32;
    let mut out = vec![0u8; src.len()];
    if w == 0 || h == 0 {
        return out;
    }

    let step = angle as f64 / f64::from(divisions - 1);
    let base = -(angle as f64) / 2.0;
    let opacity = 1.0 / divisions as f32;
    let center = Point::new(f64::from(w) / 2.0, f64::from(h) / 2.0);
    let inverse: Vec<Affine> = (0..divisions)
        .map(|i| {
            let deg = base + f64::from(i) * step;
            Affine::rotate_about(deg.to_radians(), center).inverse()
        })
        .collect();

    let stride = width as usize * 4;
    out.par_chunks_mut(stride).enumerate().for_each(|(y, row)| {
        for x in 0..w {
            let p = Point::new(f64::from(x) + 0.5, y as f64 + 0.5);
            let mut acc = [0.0f32; 4];
            for inv in &inverse {
                let s = *inv * p;
                let sx = mirror_coord(s.x.floor() as i32, w);
                let sy = mirror_coord(s.y.floor() as i32, h);
                let i = ((sy * w + sx) as usize) * 4;
                add_weighted(&mut acc, [src[i], src[i + 1], src[i + 2], src[i + 3]], opacity);
            }
            let o = x as usize * 4;
            row[o..o + 4].copy_from_slice(&resolve_accum(acc));
        }
    });
    out
}

#[cfg(test)]
#[path = "../../tests/unit/effects/radial.rs"]
mod tests;
