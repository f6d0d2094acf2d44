use std::io::Cursor;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};

use super::*;
use crate::foundation::core::Color;

fn png_bytes(px: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_raw(1, 1, px.to_vec()).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn gif_bytes(colors: &[[u8; 4]], delay_ms: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    {
        let mut enc = GifEncoder::new(&mut buf);
        enc.set_repeat(Repeat::Infinite).unwrap();
        for c in colors {
            let img = RgbaImage::from_pixel(2, 2, image::Rgba(*c));
            let frame = Frame::from_parts(img, 0, 0, Delay::from_numer_denom_ms(delay_ms, 1));
            enc.encode_frame(frame).unwrap();
        }
    }
    buf
}

#[test]
fn png_decodes_straight_alpha() {
    let decoded = decode_image(&png_bytes([100, 50, 200, 128])).unwrap();
    let Decoded::Still(s) = decoded else {
        panic!("expected a still image");
    };
    assert_eq!(s.pixel(0, 0), Some(Color::rgba(100, 50, 200, 128)));
}

#[test]
fn multi_frame_gif_is_an_animation() {
    let decoded = decode_image(&gif_bytes(&[[255, 0, 0, 255], [0, 0, 255, 255]], 100)).unwrap();
    assert_eq!(decoded.size(), (2, 2));
    let Decoded::Animation { frames, fps, looping } = decoded else {
        panic!("expected an animation");
    };
    assert_eq!(frames.len(), 2);
    assert!(looping);
    let fps = fps.unwrap();
    assert!((fps - 10.0).abs() < 1e-6);
    let px = frames[1].pixel(1, 1).unwrap();
    assert!(px.b > 200 && px.r < 50);
}

#[test]
fn single_frame_gif_demotes_to_still() {
    let decoded = decode_image(&gif_bytes(&[[0, 255, 0, 255]], 50)).unwrap();
    assert!(matches!(decoded, Decoded::Still(_)));
}

#[test]
fn garbage_is_a_decode_error() {
    let err = decode_image(b"definitely not an image").unwrap_err();
    assert!(matches!(err, BitmapError::Decode(_)));
    assert!(err.to_string().starts_with("decode error: "));
}
