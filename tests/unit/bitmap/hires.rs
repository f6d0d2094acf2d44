use super::*;
use crate::config::EngineConfig;
use crate::foundation::core::Color;
use crate::gpu::SoftwareGpuOpts;

fn engine() -> Engine {
    Engine::software(
        EngineConfig::default().with_hires(2.0),
        SoftwareGpuOpts::default().with_max_texture_size(32),
    )
    .unwrap()
}

fn map() -> TwinMap {
    TwinMap::new(
        BitmapId {
            index: 0,
            generation: 0,
        },
        (4, 3),
        (8, 6),
    )
}

#[test]
fn twin_map_scales_rects_and_points() {
    let m = map();
    assert_eq!(m.rect(IntRect::new(1, 1, 2, -1)), IntRect::new(2, 2, 4, -2));
    assert_eq!(m.point(3, 2), (6, 4));
    assert_eq!(m.block(), (2, 2));
    assert_eq!(m.twin_size(), (8, 6));
}

#[test]
fn fills_are_mirrored_at_twin_scale() {
    let mut e = engine();
    let lo = e.create(4, 4).unwrap();
    let hi = e.hires(lo).unwrap().unwrap();
    e.fill_rect(lo, IntRect::new(1, 1, 2, 2), Color::rgb(200, 0, 0))
        .unwrap();

    assert_eq!(e.get_pixel(hi, 2, 2).unwrap(), Color::rgb(200, 0, 0));
    assert_eq!(e.get_pixel(hi, 5, 5).unwrap(), Color::rgb(200, 0, 0));
    assert_eq!(e.get_pixel(hi, 1, 1).unwrap(), Color::transparent());
    assert_eq!(e.tainted_area(hi).unwrap(), 16);
    assert_eq!(e.tainted_area(lo).unwrap(), 4);
}

#[test]
fn low_res_pixel_averages_the_twin_block() {
    let mut e = engine();
    let lo = e.create(4, 4).unwrap();
    let hi = e.hires(lo).unwrap().unwrap();
    e.set_pixel(hi, 0, 0, Color::rgb(100, 40, 20)).unwrap();
    e.set_pixel(hi, 1, 0, Color::rgb(200, 60, 40)).unwrap();

    // Color over the two painted pixels, alpha over all four.
    let c = e.get_pixel(lo, 0, 0).unwrap();
    assert_eq!(c, Color::rgba(150, 50, 30, 127));
    assert_eq!(e.get_pixel(lo, 9, 0).unwrap(), Color::transparent());
}

#[test]
fn set_pixel_paints_the_whole_twin_block() {
    let mut e = engine();
    let lo = e.create(4, 4).unwrap();
    let hi = e.hires(lo).unwrap().unwrap();
    e.set_pixel(lo, 1, 2, Color::rgb(0, 0, 255)).unwrap();
    for (x, y) in [(2, 4), (3, 4), (2, 5), (3, 5)] {
        assert_eq!(e.get_pixel(hi, x, y).unwrap(), Color::rgb(0, 0, 255));
    }
    assert_eq!(e.get_pixel(hi, 4, 4).unwrap(), Color::transparent());
}

#[test]
fn blits_into_a_twin_scale_a_plain_source() {
    let mut e = engine();
    let mut px = Color::rgb(0, 255, 0).to_array().repeat(16);
    px[60..64].copy_from_slice(&[255, 0, 0, 255]);
    let src = e.from_rgba8(px, 4, 4).unwrap();
    let dst = e.create(4, 4).unwrap();
    let hi = e.hires(dst).unwrap().unwrap();

    e.blt(dst, 0, 0, src, IntRect::new(0, 0, 4, 4), 255).unwrap();
    assert_eq!(e.get_pixel(hi, 7, 7).unwrap(), Color::rgb(255, 0, 0));
    assert_eq!(e.get_pixel(hi, 5, 5).unwrap(), Color::rgb(0, 255, 0));
    assert_eq!(e.get_raw(hi).unwrap().len(), 8 * 8 * 4);
}

#[test]
fn set_hires_relinks_both_sides() {
    let mut e = engine();
    let lo = e.create(2, 2).unwrap();
    let old = e.hires(lo).unwrap().unwrap();
    let new = e.create_hires(4, 4).unwrap();
    e.set_hires(lo, new).unwrap();
    assert_eq!(e.hires(lo).unwrap(), Some(new));
    assert_eq!(e.lores(new).unwrap(), Some(lo));
    assert_eq!(e.lores(old).unwrap(), None);
}
