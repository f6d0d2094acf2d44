use super::*;

fn close(a: Rgba8, b: Rgba8, tol: i32) -> bool {
    a.iter()
        .zip(b.iter())
        .all(|(x, y)| (i32::from(*x) - i32::from(*y)).abs() <= tol)
}

#[test]
fn grey_is_unaffected() {
    let px = [128, 128, 128, 200];
    assert!(close(hue_rotate(px, 123.0), px, 1));
}

#[test]
fn full_turn_is_identity() {
    let px = [200, 40, 90, 255];
    assert!(close(hue_rotate(px, 360.0), px, 1));
}

#[test]
fn alpha_is_preserved() {
    assert_eq!(hue_rotate([255, 0, 0, 17], 90.0)[3], 17);
}

#[test]
fn opposite_rotations_cancel() {
    let px = [150, 110, 100, 255];
    let there = hue_rotate(px, 30.0);
    let back = hue_rotate(there, -30.0);
    assert!(close(back, px, 3));
}

#[test]
fn red_moves_off_red() {
    let out = hue_rotate([255, 0, 0, 255], 120.0);
    assert!(out[0] < 200);
}

#[test]
fn normalize_hue_drops_whole_turns() {
    assert_eq!(normalize_hue(0), None);
    assert_eq!(normalize_hue(720), None);
    assert_eq!(normalize_hue(-90), Some(270));
    assert_eq!(normalize_hue(370), Some(10));
}
