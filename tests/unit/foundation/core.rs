use super::*;

#[test]
fn normalized_flips_negative_extents() {
    let r = IntRect::new(10, 20, -4, -6).normalized();
    assert_eq!(r, IntRect::new(6, 14, 4, 6));
    assert_eq!(IntRect::new(1, 2, 3, 4).normalized(), IntRect::new(1, 2, 3, 4));
}

#[test]
fn normalizing_at_the_i32_edge_saturates() {
    let r = IntRect::new(i32::MIN + 1, 0, -10, 4).normalized();
    assert_eq!(r, IntRect::new(i32::MIN, 0, 10, 4));
    let r = IntRect::new(0, i32::MIN, 3, i32::MIN).normalized();
    assert_eq!((r.y, r.h), (i32::MIN, i32::MAX));
}

#[test]
fn far_away_rects_intersect_without_overflow() {
    let screen = IntRect::new(0, 0, 10, 10);
    assert_eq!(screen.intersect(IntRect::new(i32::MIN + 1, 0, -10, 4)), None);
    assert_eq!(screen.intersect(IntRect::new(i32::MAX - 2, 0, 10, 4)), None);
    assert_eq!(
        IntRect::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX)
            .intersect(IntRect::new(-5, -5, i32::MAX, i32::MAX)),
        Some(IntRect::new(-5, -5, 4, 4))
    );
    assert_eq!(
        IntRect::new(i32::MIN, 0, i32::MAX, 1).intersect(IntRect::new(-3, 0, i32::MAX, 1)),
        Some(IntRect::new(-3, 0, 2, 1))
    );
}

#[test]
fn intersect_handles_touching_and_overlapping() {
    let a = IntRect::new(0, 0, 10, 10);
    assert_eq!(a.intersect(IntRect::new(10, 0, 5, 5)), None);
    assert_eq!(
        a.intersect(IntRect::new(5, -5, 10, 10)),
        Some(IntRect::new(5, 0, 5, 5))
    );
    assert_eq!(
        a.intersect(IntRect::new(8, 8, -4, -4)),
        Some(IntRect::new(4, 4, 4, 4))
    );
}

#[test]
fn encloses_is_inclusive_of_edges() {
    let a = IntRect::new(0, 0, 10, 10);
    assert!(a.encloses(IntRect::new(0, 0, 10, 10)));
    assert!(a.encloses(IntRect::new(2, 2, 3, 3)));
    assert!(!a.encloses(IntRect::new(2, 2, 9, 3)));
}

#[test]
fn scaled_truncates_like_integer_division() {
    let r = IntRect::new(3, 5, 7, -2).scaled(2, 1, 3, 2);
    assert_eq!(r, IntRect::new(6, 7, 14, -3));
}

#[test]
fn color_from_f32_clamps() {
    assert_eq!(Color::from_f32(2.0, -1.0, 0.5, 1.0), Color::rgba(255, 0, 127, 255));
}
