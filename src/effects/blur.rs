use rayon::prelude::*;

use crate::foundation::error::{BitmapError, BitmapResult};

/// Three-tap box kernel in q16 fixed point; weights sum to `1 << 16`.
const BOX3_Q16: [u32; 3] = [21845, 21846, 21845];

/// One separable blur pass direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlurAxis {
    /// Sample left and right neighbours.
    Horizontal,
    /// Sample upper and lower neighbours.
    Vertical,
}

fn expected_len(width: u32, height: u32) -> BitmapResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| BitmapError::too_large("blur buffer size overflow"))
}

/// Full two-pass blur of an RGBA8 buffer (horizontal, then vertical), clamped at the edges.
pub fn blur_rgba8(src: &[u8], width: u32, height: u32) -> BitmapResult<Vec<u8>> {
    let len = expected_len(width, height)?;
    if src.len() != len {
        return Err(BitmapError::invalid(
            "blur_rgba8 expects src matching width*height*4",
        ));
    }
    let mut tmp = vec![0u8; len];
    let mut out = vec![0u8; len];
    blur_pass(src, &mut tmp, width, height, BlurAxis::Horizontal);
    blur_pass(&tmp, &mut out, width, height, BlurAxis::Vertical);
    Ok(out)
}

/// One separable pass from `src` into `dst`. Both buffers must be `width * height * 4` long.
pub fn blur_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, axis: BlurAxis) {
    let w = width as i32;
    let h = height as i32;
    if w == 0 || h == 0 {
        return;
    }
    let stride = width as usize * 4;
    dst.par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as i32;
            for x in 0..w {
                let mut acc = [0u64; 4];
                for (ki, &kw) in BOX3_Q16.iter().enumerate() {
                    let d = ki as i32 - 1;
                    let (sx, sy) = match axis {
                        BlurAxis::Horizontal => ((x + d).clamp(0, w - 1), y),
                        BlurAxis::Vertical => (x, (y + d).clamp(0, h - 1)),
                    };
                    let idx = ((sy * w + sx) as usize) * 4;
                    for c in 0..4 {
                        acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                    }
                }
                let o = x as usize * 4;
                for c in 0..4 {
                    row[o + c] = q16_to_u8(acc[c]);
                }
            }
        });
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    v.min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
