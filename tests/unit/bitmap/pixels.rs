use super::*;
use crate::assets::decode_image;
use crate::assets::Decoded;
use crate::config::EngineConfig;
use crate::gpu::SoftwareGpuOpts;

fn engine() -> Engine {
    Engine::software(
        EngineConfig::default(),
        SoftwareGpuOpts::default().with_max_texture_size(16),
    )
    .unwrap()
}

#[test]
fn out_of_range_reads_are_transparent_and_writes_ignored() {
    let mut e = engine();
    let id = e.from_rgba8(Color::rgb(5, 5, 5).to_array().repeat(4), 2, 2)
        .unwrap();
    assert_eq!(e.get_pixel(id, -1, 0).unwrap(), Color::transparent());
    assert_eq!(e.get_pixel(id, 0, 2).unwrap(), Color::transparent());
    e.set_pixel(id, 2, 0, Color::rgb(1, 1, 1)).unwrap();
    assert_eq!(e.get_raw(id).unwrap(), Color::rgb(5, 5, 5).to_array().repeat(4));
}

#[test]
fn set_pixel_patches_the_cache_and_the_texture() {
    let mut e = engine();
    let id = e.create(3, 3).unwrap();
    assert_eq!(e.get_pixel(id, 1, 1).unwrap(), Color::transparent());
    e.set_pixel(id, 1, 1, Color::rgb(10, 20, 30)).unwrap();
    assert_eq!(e.get_pixel(id, 1, 1).unwrap(), Color::rgb(10, 20, 30));
    assert!(e.data(id).unwrap().cache.is_some());
    assert_eq!(e.tainted_area(id).unwrap(), 1);

    let raw = e.get_raw(id).unwrap();
    let i = (3 + 1) * 4;
    assert_eq!(&raw[i..i + 4], &[10, 20, 30, 255]);
}

#[test]
fn mutations_drop_a_stale_cache() {
    let mut e = engine();
    let id = e.create(2, 2).unwrap();
    assert_eq!(e.get_pixel(id, 0, 0).unwrap(), Color::transparent());
    e.fill_rect(id, IntRect::new(0, 0, 2, 2), Color::rgb(7, 7, 7))
        .unwrap();
    assert!(e.data(id).unwrap().cache.is_none());
    assert_eq!(e.get_pixel(id, 0, 0).unwrap(), Color::rgb(7, 7, 7));
}

#[test]
fn mega_pixels_are_read_directly() {
    let mut e = engine();
    let id = e.create(30, 2).unwrap();
    e.set_pixel(id, 29, 1, Color::rgb(3, 2, 1)).unwrap();
    assert_eq!(e.get_pixel(id, 29, 1).unwrap(), Color::rgb(3, 2, 1));
    assert!(e.data(id).unwrap().cache.is_none());
}

#[test]
fn replace_raw_checks_length_and_taints_everything() {
    let mut e = engine();
    let id = e.create(2, 2).unwrap();
    assert!(matches!(
        e.replace_raw(id, &[0; 15]),
        Err(BitmapError::InvalidArgument(_))
    ));
    let px = Color::rgb(40, 50, 60).to_array().repeat(4);
    e.replace_raw(id, &px).unwrap();
    assert_eq!(e.get_raw(id).unwrap(), px);
    assert_eq!(e.tainted_area(id).unwrap(), 4);

    let mega = e.create(20, 1).unwrap();
    let wide = Color::rgb(1, 2, 3).to_array().repeat(20);
    e.replace_raw(mega, &wide).unwrap();
    assert_eq!(e.get_raw(mega).unwrap(), wide);
}

#[test]
fn export_round_trips_through_png() {
    let mut e = engine();
    let id = e.create(3, 2).unwrap();
    e.fill_rect(id, IntRect::new(0, 0, 3, 2), Color::rgb(90, 80, 70))
        .unwrap();
    let png = e.export(id, ImageFormat::Png).unwrap();
    let Decoded::Still(s) = decode_image(&png).unwrap() else {
        panic!("expected a still image");
    };
    assert_eq!((s.width(), s.height()), (3, 2));
    assert_eq!(s.pixel(2, 1), Some(Color::rgb(90, 80, 70)));
}

#[test]
fn pixel_access_on_animations_reads_the_current_frame_only_for_raw() {
    let mut e = engine();
    let a = e.create(1, 1).unwrap();
    let b = e.from_rgba8(vec![1, 2, 3, 255], 1, 1).unwrap();
    e.add_frame(a, b, -1).unwrap();
    assert!(matches!(e.get_pixel(a, 0, 0), Err(BitmapError::Unsupported(_))));
    assert_eq!(e.get_raw(a).unwrap(), vec![0, 0, 0, 0]);
    e.seek(a, 1).unwrap();
    assert_eq!(e.get_raw(a).unwrap(), vec![1, 2, 3, 255]);
}
