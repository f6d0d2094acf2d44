use crate::foundation::math::mul_div255_u8;

/// Straight (non-premultiplied) RGBA8 pixel.
pub type Rgba8 = [u8; 4];

/// Legacy surface blend: straight-alpha "over" with a whole-surface alpha modulation.
///
/// A source whose modulated alpha is zero leaves the destination untouched.
pub fn over_straight(dst: Rgba8, src: Rgba8, alpha_mod: u8) -> Rgba8 {
    let sa = mul_div255_u8(u16::from(src[3]), u16::from(alpha_mod));
    if sa == 0 {
        return dst;
    }
    let inv = 255u16 - u16::from(sa);
    let mut out = [0u8; 4];
    for i in 0..3 {
        let v = (u32::from(src[i]) * u32::from(sa) + u32::from(dst[i]) * u32::from(inv) + 127) / 255;
        out[i] = v.min(255) as u8;
    }
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));
    out
}

/// Legacy surface copy: source color with its alpha scaled by `alpha_mod`.
pub fn copy_modulated(src: Rgba8, alpha_mod: u8) -> Rgba8 {
    [
        src[0],
        src[1],
        src[2],
        mul_div255_u8(u16::from(src[3]), u16::from(alpha_mod)),
    ]
}

/// Blend-shader composite of `src` onto `dst` at normalized `opacity`.
///
/// `co1 = sa * opacity`, `co2 = da * (1 - co1)`, result alpha is `co1 + co2` and the color is the
/// alpha-weighted mix, falling back to the source color when the result is fully transparent.
pub fn blt_shader(dst: Rgba8, src: Rgba8, opacity: f32) -> Rgba8 {
    let op = opacity.clamp(0.0, 1.0);
    let sa = f32::from(src[3]) / 255.0;
    let da = f32::from(dst[3]) / 255.0;
    let co1 = sa * op;
    let co2 = da * (1.0 - co1);
    let ra = co1 + co2;
    let mut out = [0u8; 4];
    for i in 0..3 {
        out[i] = if ra <= 0.0 {
            src[i]
        } else {
            let v = (co1 * f32::from(src[i]) + co2 * f32::from(dst[i])) / ra;
            v.round().clamp(0.0, 255.0) as u8
        };
    }
    out[3] = (ra * 255.0).round().clamp(0.0, 255.0) as u8;
    out
}

/// Additive accumulation used by the radial blur fan: color weighted by source alpha, alpha
/// summed, both scaled by `opacity`.
pub fn add_weighted(acc: &mut [f32; 4], src: Rgba8, opacity: f32) {
    let a = f32::from(src[3]) / 255.0 * opacity;
    for i in 0..3 {
        acc[i] += f32::from(src[i]) * a;
    }
    acc[3] += f32::from(src[3]) * opacity;
}

/// Quantize an additive accumulator back to RGBA8, saturating each channel.
pub fn resolve_accum(acc: [f32; 4]) -> Rgba8 {
    acc.map(|v| v.round().clamp(0.0, 255.0) as u8)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
