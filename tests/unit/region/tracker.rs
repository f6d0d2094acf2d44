use super::*;

fn r(x: i32, y: i32, w: i32, h: i32) -> IntRect {
    IntRect::new(x, y, w, h)
}

#[test]
fn empty_region_is_always_out() {
    let reg = Region::<i16>::new();
    assert_eq!(reg.overlap(r(0, 0, 10, 10)), Overlap::Out);
    assert!(!reg.touches(r(-5, -5, 100, 100)));
}

#[test]
fn add_then_touches_for_many_rects() {
    for (x, y, w, h) in [(0, 0, 1, 1), (3, 7, 20, 2), (-4, -4, 8, 8), (100, 50, 5, 30)] {
        let mut reg = Region::<i32>::new();
        reg.add(r(x, y, w, h));
        assert_eq!(reg.overlap(r(x, y, w, h)), Overlap::In);
        assert!(reg.touches(r(x, y, w, h)));
        reg.subtract(r(x, y, w, h));
        assert!(reg.is_empty());
        assert_eq!(reg.overlap(r(x, y, w, h)), Overlap::Out);
    }
}

#[test]
fn add_normalizes_negative_extents() {
    let mut reg = Region::<i16>::new();
    reg.add(r(10, 10, -5, -5));
    assert_eq!(reg.overlap(r(5, 5, 5, 5)), Overlap::In);
    assert_eq!(reg.area(), 25);
}

#[test]
fn overlapping_adds_stay_disjoint() {
    let mut reg = Region::<i16>::new();
    reg.add(r(0, 0, 10, 10));
    reg.add(r(5, 5, 10, 10));
    assert_eq!(reg.area(), 100 + 100 - 25);
    reg.add(r(2, 2, 3, 3));
    assert_eq!(reg.area(), 175);
}

#[test]
fn partial_overlap_is_reported() {
    let mut reg = Region::<i16>::new();
    reg.add(r(0, 0, 10, 10));
    assert_eq!(reg.overlap(r(5, 5, 10, 10)), Overlap::Part);
    assert_eq!(reg.overlap(r(10, 0, 5, 5)), Overlap::Out);
}

#[test]
fn subtract_punches_holes() {
    let mut reg = Region::<i16>::new();
    reg.add(r(0, 0, 10, 10));
    reg.subtract(r(3, 3, 4, 4));
    assert_eq!(reg.area(), 100 - 16);
    assert_eq!(reg.overlap(r(3, 3, 4, 4)), Overlap::Out);
    assert_eq!(reg.overlap(r(0, 0, 10, 10)), Overlap::Part);
    reg.add(r(3, 3, 4, 4));
    assert_eq!(reg.overlap(r(0, 0, 10, 10)), Overlap::In);
}

#[test]
fn subtract_outside_is_noop() {
    let mut reg = Region::<i16>::new();
    reg.add(r(0, 0, 4, 4));
    let before = reg.clone();
    reg.subtract(r(10, 10, 4, 4));
    assert_eq!(reg, before);
}

#[test]
fn adjacent_boxes_coalesce() {
    let mut reg = Region::<i16>::new();
    reg.add(r(0, 0, 4, 4));
    reg.add(r(4, 0, 4, 4));
    reg.add(r(0, 4, 8, 4));
    assert_eq!(reg.boxes().len(), 1);
    assert_eq!(reg.area(), 64);
}

#[test]
fn narrow_coordinates_saturate() {
    let mut reg = Region::<i16>::new();
    reg.add(r(32000, 0, 2000, 1));
    assert_eq!(reg.area(), i64::from(i16::MAX) - 32000);
}

#[test]
fn coordinates_narrow_by_clamping() {
    assert_eq!(i16::saturating_from(40_000), i16::MAX);
    assert_eq!(i16::saturating_from(-40_000), i16::MIN);
    assert_eq!(i16::saturating_from(-7), -7);
    assert_eq!(i32::saturating_from(i64::MAX), i32::MAX);
    assert_eq!(i32::saturating_from(i64::MIN), i32::MIN);
}
