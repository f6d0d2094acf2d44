use super::*;
use crate::config::EngineConfig;
use crate::effects::gradient_step;
use crate::gpu::SoftwareGpuOpts;

const RED: Color = Color::rgb(255, 0, 0);

fn engine() -> Engine {
    Engine::software(
        EngineConfig::default(),
        SoftwareGpuOpts::default().with_max_texture_size(16),
    )
    .unwrap()
}

#[test]
fn fills_far_outside_the_bitmap_are_clipped_away() {
    let mut e = engine();
    let small = e.create(4, 4).unwrap();
    let mega = e.create(20, 4).unwrap();
    for id in [small, mega] {
        e.fill_rect(id, IntRect::new(i32::MIN + 1, 0, -10, 4), RED)
            .unwrap();
        e.fill_rect(id, IntRect::new(i32::MAX - 1, i32::MAX - 1, 50, 50), RED)
            .unwrap();
        e.clear_rect(id, IntRect::new(i32::MIN, i32::MIN, -1, -1))
            .unwrap();
        assert_eq!(e.tainted_area(id).unwrap(), 0);
        assert_eq!(e.get_pixel(id, 0, 0).unwrap(), Color::transparent());
    }
}

#[test]
fn opaque_fill_adds_and_transparent_fill_subtracts() {
    let mut e = engine();
    let id = e.create(4, 4).unwrap();
    e.fill_rect(id, IntRect::new(0, 0, 4, 4), RED).unwrap();
    assert_eq!(e.tainted_area(id).unwrap(), 16);

    e.fill_rect(id, IntRect::new(0, 0, 2, 4), Color::rgba(9, 9, 9, 0))
        .unwrap();
    assert_eq!(e.tainted_area(id).unwrap(), 8);
    assert_eq!(e.get_pixel(id, 1, 1).unwrap(), Color::rgba(9, 9, 9, 0));
    assert_eq!(e.get_pixel(id, 2, 1).unwrap(), RED);
}

#[test]
fn clear_rect_and_clear_forget_paint() {
    let mut e = engine();
    let id = e.create(4, 4).unwrap();
    e.fill_rect(id, IntRect::new(0, 0, 4, 4), RED).unwrap();
    e.clear_rect(id, IntRect::new(1, 1, 2, 2)).unwrap();
    assert_eq!(e.tainted_area(id).unwrap(), 12);
    assert_eq!(e.get_pixel(id, 1, 2).unwrap(), Color::transparent());
    assert!(!e.touches(id, IntRect::new(1, 1, 2, 2)).unwrap());

    e.clear(id).unwrap();
    assert_eq!(e.tainted_area(id).unwrap(), 0);
    assert_eq!(e.get_pixel(id, 0, 0).unwrap(), Color::transparent());
}

#[test]
fn mega_fills_run_on_the_cpu() {
    let mut e = engine();
    let id = e.create(40, 4).unwrap();
    e.fill_rect(id, IntRect::new(30, 0, 10, 4), RED).unwrap();
    assert_eq!(e.get_pixel(id, 39, 3).unwrap(), RED);
    assert_eq!(e.get_pixel(id, 29, 3).unwrap(), Color::transparent());
    assert_eq!(e.tainted_area(id).unwrap(), 40);
}

#[test]
fn gradients_agree_between_texture_and_mega() {
    let mut e = engine();
    let tex = e.create(8, 4).unwrap();
    let mega = e.create(20, 4).unwrap();
    let (c1, c2) = (Color::rgb(0, 0, 0), Color::rgb(255, 128, 64));
    let rect = IntRect::new(0, 0, 8, 4);
    e.gradient_fill_rect(tex, rect, c1, c2, false).unwrap();
    e.gradient_fill_rect(mega, rect, c1, c2, false).unwrap();
    for x in 0..8 {
        let want = gradient_step(c1, c2, x, 8);
        assert_eq!(e.get_pixel(tex, x, 2).unwrap(), want);
        assert_eq!(e.get_pixel(mega, x, 2).unwrap(), want);
    }
    assert_eq!(e.tainted_area(tex).unwrap(), 32);
}

#[test]
fn vertical_gradient_runs_top_to_bottom() {
    let mut e = engine();
    let id = e.create(2, 3).unwrap();
    let (c1, c2) = (Color::rgb(0, 0, 0), Color::rgb(200, 200, 200));
    e.gradient_fill_rect(id, IntRect::new(0, 0, 2, 3), c1, c2, true)
        .unwrap();
    assert_eq!(e.get_pixel(id, 1, 0).unwrap(), c1);
    assert_eq!(e.get_pixel(id, 1, 2).unwrap(), c2);
}

#[test]
fn taint_area_marks_without_drawing() {
    let mut e = Engine::software(
        EngineConfig::default().with_hires(2.0),
        SoftwareGpuOpts::default().with_max_texture_size(16),
    )
    .unwrap();
    let id = e.create(4, 4).unwrap();
    let hi = e.hires(id).unwrap().unwrap();
    e.taint_area(id, IntRect::new(0, 0, 2, 2)).unwrap();
    assert_eq!(e.tainted_area(id).unwrap(), 4);
    assert_eq!(e.tainted_area(hi).unwrap(), 16);
    assert_eq!(e.get_pixel(id, 0, 0).unwrap(), Color::transparent());
}
