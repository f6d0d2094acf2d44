pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Wrap `value` into `[0, extent)`. A non-positive extent leaves the value untouched.
pub(crate) fn wrap_range(value: i32, extent: i32) -> i32 {
    if extent <= 0 {
        return value;
    }
    value.rem_euclid(extent)
}

pub(crate) fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    let t = t.clamp(0.0, 1.0);
    (f32::from(a) * (1.0 - t) + f32::from(b) * t).round() as u8
}

/// Round half away from zero, matching C `round`.
pub(crate) fn round_i32(v: f64) -> i32 {
    v.round() as i32
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
