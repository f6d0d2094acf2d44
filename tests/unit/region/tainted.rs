use super::*;

#[test]
fn width_is_chosen_from_size() {
    assert!(!TaintedRegion::for_size(32767, 32767).is_wide());
    assert!(TaintedRegion::for_size(32768, 10).is_wide());
    assert!(TaintedRegion::for_size(10, 40000).is_wide());
}

#[test]
fn both_widths_agree_on_basic_operations() {
    for mut reg in [TaintedRegion::for_size(10, 10), TaintedRegion::for_size(40000, 10)] {
        let rect = IntRect::new(1, 1, 5, 5);
        assert!(!reg.touches(rect));
        reg.add(rect);
        assert!(reg.touches(rect));
        assert_eq!(reg.overlap(rect), Overlap::In);
        reg.subtract(rect);
        assert!(reg.is_empty());
        reg.add(rect);
        reg.clear();
        assert_eq!(reg.area(), 0);
    }
}

#[test]
fn wide_region_tracks_far_coordinates() {
    let mut reg = TaintedRegion::for_size(70000, 10);
    reg.add(IntRect::new(65000, 0, 10, 10));
    assert!(reg.touches(IntRect::new(65005, 5, 1, 1)));
    assert!(!reg.touches(IntRect::new(0, 0, 10, 10)));
}
