use super::*;

#[test]
fn over_straight_with_opaque_source_replaces() {
    assert_eq!(
        over_straight([0, 0, 255, 255], [255, 0, 0, 255], 255),
        [255, 0, 0, 255]
    );
}

#[test]
fn over_straight_half_alpha_mixes() {
    let out = over_straight([0, 0, 0, 255], [255, 255, 255, 255], 128);
    assert_eq!(out[3], 255);
    assert!((i32::from(out[0]) - 128).abs() <= 1);
}

#[test]
fn over_straight_zero_alpha_is_noop() {
    let dst = [1, 2, 3, 4];
    assert_eq!(over_straight(dst, [255, 255, 255, 0], 255), dst);
    assert_eq!(over_straight(dst, [255, 255, 255, 255], 0), dst);
}

#[test]
fn copy_modulated_scales_alpha_only() {
    assert_eq!(copy_modulated([9, 8, 7, 255], 51), [9, 8, 7, 51]);
}

#[test]
fn blt_shader_full_opacity_over_transparent_copies() {
    assert_eq!(blt_shader([0, 0, 0, 0], [10, 20, 30, 255], 1.0), [10, 20, 30, 255]);
    assert_eq!(blt_shader([0, 0, 0, 0], [10, 20, 30, 77], 1.0), [10, 20, 30, 77]);
}

#[test]
fn blt_shader_is_idempotent_for_opaque_sources() {
    let src = [40, 50, 60, 255];
    let once = blt_shader([200, 100, 0, 255], src, 1.0);
    let twice = blt_shader(once, src, 1.0);
    assert_eq!(once, twice);
    assert_eq!(once, src);
}

#[test]
fn blt_shader_fully_transparent_result_keeps_source_color() {
    assert_eq!(blt_shader([0, 0, 0, 0], [5, 6, 7, 0], 1.0), [5, 6, 7, 0]);
}

#[test]
fn blt_shader_half_opacity_on_opaque_dst() {
    let out = blt_shader([0, 0, 0, 255], [255, 255, 255, 255], 0.5);
    assert_eq!(out[3], 255);
    assert!((i32::from(out[0]) - 128).abs() <= 1);
}

#[test]
fn additive_accumulation_saturates() {
    let mut acc = [0.0f32; 4];
    for _ in 0..4 {
        add_weighted(&mut acc, [200, 0, 0, 255], 0.5);
    }
    assert_eq!(resolve_accum(acc), [255, 0, 0, 255]);
}
