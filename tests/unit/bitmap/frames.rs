use super::*;
use crate::bitmap::FrameSelect;
use crate::config::EngineConfig;
use crate::foundation::core::{Color, IntRect};
use crate::gpu::SoftwareGpuOpts;
use crate::surface::Surface;

fn engine() -> Engine {
    Engine::software(
        EngineConfig::default().with_frame_rate(10.0),
        SoftwareGpuOpts::default().with_max_texture_size(16),
    )
    .unwrap()
}

fn frame(e: &mut Engine, v: u8) -> BitmapId {
    e.from_rgba8(vec![v, v, v, 255], 1, 1).unwrap()
}

/// Three-frame animation whose frames are gray levels 0, 1 and 2.
fn animation(e: &mut Engine) -> BitmapId {
    let a = frame(e, 0);
    for v in 1..3 {
        let f = frame(e, v);
        e.add_frame(a, f, -1).unwrap();
        e.dispose(f);
    }
    a
}

fn shown(e: &Engine, id: BitmapId) -> u8 {
    e.get_raw(id).unwrap()[0]
}

#[test]
fn adding_a_frame_promotes_a_static_bitmap() {
    let mut e = engine();
    let a = frame(&mut e, 0);
    assert_eq!(e.num_frames(a).unwrap(), 1);
    assert_eq!(e.current_frame(a).unwrap(), 0);
    assert!(matches!(e.play(a), Err(BitmapError::Unsupported(_))));

    let f = frame(&mut e, 9);
    assert_eq!(e.add_frame(a, f, -1).unwrap(), 2);
    assert!(e.is_animated(a).unwrap());
    assert_eq!(e.fps(a).unwrap(), 10.0);
    assert!(e.looping(a).unwrap());
    assert_eq!(e.device().live_textures(), 3);
}

#[test]
fn insertion_is_clamped_but_reports_the_requested_position() {
    let mut e = engine();
    let a = animation(&mut e);
    let f = frame(&mut e, 7);
    assert_eq!(e.add_frame(a, f, 1).unwrap(), 1);
    assert_eq!(e.add_frame(a, f, 99).unwrap(), 99);
    assert_eq!(e.num_frames(a).unwrap(), 5);
    e.seek(a, 1).unwrap();
    assert_eq!(shown(&e, a), 7);
    e.seek(a, 2).unwrap();
    assert_eq!(shown(&e, a), 1);
    e.seek(a, 4).unwrap();
    assert_eq!(shown(&e, a), 7);
}

#[test]
fn frames_must_match_in_size_and_not_be_mega() {
    let mut e = engine();
    let a = frame(&mut e, 0);
    let big = e.create(2, 1).unwrap();
    assert!(matches!(
        e.add_frame(a, big, -1),
        Err(BitmapError::InvalidArgument(_))
    ));
    let mega = e.create(20, 1).unwrap();
    let other = e.create(20, 1).unwrap();
    assert!(matches!(
        e.add_frame(mega, other, -1),
        Err(BitmapError::Unsupported(_))
    ));
}

#[test]
fn mega_source_frames_are_uploaded() {
    let mut e = engine();
    let mut px = Surface::new(1, 1).unwrap();
    px.fill_rect(px.rect(), Color::rgb(4, 4, 4));
    let mega = e.from_surface(px, None, true).unwrap();
    let a = frame(&mut e, 0);
    assert_eq!(e.add_frame(a, mega, -1).unwrap(), 2);
    e.seek(a, 1).unwrap();
    assert_eq!(shown(&e, a), 4);
}

#[test]
fn playback_follows_the_run_time() {
    let mut e = engine();
    let a = animation(&mut e);
    e.play(a).unwrap();
    e.prepare_draw(5.0).unwrap();
    assert_eq!(e.current_frame(a).unwrap(), 0);
    e.prepare_draw(5.15).unwrap();
    assert_eq!(e.current_frame(a).unwrap(), 1);
    assert_eq!(shown(&e, a), 1);
    e.prepare_draw(5.25).unwrap();
    assert_eq!(e.current_frame(a).unwrap(), 2);
    e.prepare_draw(5.35).unwrap();
    assert_eq!(e.current_frame(a).unwrap(), 0);
    assert!(e.is_playing(a).unwrap());

    e.stop(a).unwrap();
    e.prepare_draw(9.0).unwrap();
    assert_eq!(e.current_frame(a).unwrap(), 0);
    assert!(!e.is_playing(a).unwrap());
}

#[test]
fn playing_twice_does_not_rewind() {
    let mut e = engine();
    let a = animation(&mut e);
    e.play(a).unwrap();
    e.prepare_draw(1.0).unwrap();
    e.prepare_draw(1.15).unwrap();
    assert_eq!(e.current_frame(a).unwrap(), 1);
    e.play(a).unwrap();
    e.prepare_draw(1.16).unwrap();
    assert_eq!(e.current_frame(a).unwrap(), 1);
    e.prepare_draw(1.22).unwrap();
    assert_eq!(e.current_frame(a).unwrap(), 2);
}

#[test]
fn non_looping_playback_stops_on_the_last_frame() {
    let mut e = engine();
    let a = animation(&mut e);
    e.set_looping(a, false).unwrap();
    e.goto_and_play(a, 1).unwrap();
    e.prepare_draw(1.0).unwrap();
    e.prepare_draw(3.0).unwrap();
    assert_eq!(e.current_frame(a).unwrap(), 2);
    assert!(!e.is_playing(a).unwrap());
}

#[test]
fn stepping_wraps_only_when_looping() {
    let mut e = engine();
    let a = animation(&mut e);
    e.goto_and_stop(a, 2).unwrap();
    e.next_frame(a).unwrap();
    assert_eq!(e.current_frame(a).unwrap(), 0);
    e.previous_frame(a).unwrap();
    assert_eq!(e.current_frame(a).unwrap(), 2);

    e.set_looping(a, false).unwrap();
    e.next_frame(a).unwrap();
    assert_eq!(e.current_frame(a).unwrap(), 2);
    e.goto_and_stop(a, -5).unwrap();
    e.previous_frame(a).unwrap();
    assert_eq!(e.current_frame(a).unwrap(), 0);
}

#[test]
fn negative_fps_clamps_to_zero() {
    let mut e = engine();
    let a = animation(&mut e);
    e.set_fps(a, -3.0).unwrap();
    assert_eq!(e.fps(a).unwrap(), 0.0);
    e.set_fps(a, 24.0).unwrap();
    assert_eq!(e.fps(a).unwrap(), 24.0);
}

#[test]
fn removing_frames_demotes_to_a_texture() {
    let mut e = engine();
    let a = animation(&mut e);
    e.goto_and_stop(a, 2).unwrap();
    e.remove_frame(a, -1).unwrap();
    assert_eq!(e.num_frames(a).unwrap(), 2);
    assert_eq!(e.current_frame(a).unwrap(), 1);

    e.remove_frame(a, 0).unwrap();
    assert_eq!(e.backing_kind(a).unwrap(), BackingKind::Texture);
    assert_eq!(shown(&e, a), 1);
    assert_eq!(e.tainted_area(a).unwrap(), 1);
    assert_eq!(e.device().live_textures(), 1);
    assert!(matches!(
        e.remove_frame(a, 0),
        Err(BitmapError::Unsupported(_))
    ));
}

#[test]
fn duplicate_selects_frames() {
    let mut e = engine();
    let a = animation(&mut e);
    e.seek(a, 1).unwrap();

    let all = e.duplicate(a, FrameSelect::All).unwrap();
    assert_eq!(e.num_frames(all).unwrap(), 3);
    assert_eq!(e.fps(all).unwrap(), 10.0);

    let current = e.duplicate(a, FrameSelect::Current).unwrap();
    assert!(!e.is_animated(current).unwrap());
    assert_eq!(shown(&e, current), 1);

    let last = e.duplicate(a, FrameSelect::Index(40)).unwrap();
    assert_eq!(shown(&e, last), 2);
}

#[test]
fn blits_paint_the_current_frame() {
    let mut e = engine();
    let a = animation(&mut e);
    let red = e.from_rgba8(vec![255, 0, 0, 255], 1, 1).unwrap();
    e.seek(a, 2).unwrap();
    e.blt(a, 0, 0, red, IntRect::new(0, 0, 1, 1), 255).unwrap();
    assert_eq!(e.get_raw(a).unwrap(), vec![255, 0, 0, 255]);
    e.seek(a, 0).unwrap();
    assert_eq!(shown(&e, a), 0);
}
