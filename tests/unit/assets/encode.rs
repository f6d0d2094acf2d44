use super::*;
use crate::assets::decode::{Decoded, decode_image};
use crate::foundation::core::Color;

#[test]
fn png_export_decodes_back() {
    let mut s = Surface::new(3, 2).unwrap();
    s.set_pixel(2, 1, Color::rgba(1, 2, 3, 4));
    let bytes = encode_image(&s, ImageFormat::Png).unwrap();
    let Decoded::Still(back) = decode_image(&bytes).unwrap() else {
        panic!("expected a still image");
    };
    assert_eq!(back, s);
}

#[test]
fn jpeg_export_drops_alpha() {
    let mut s = Surface::new(4, 4).unwrap();
    s.fill_rect(s.rect(), Color::rgba(200, 10, 10, 100));
    let bytes = encode_image(&s, ImageFormat::Jpeg).unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
}
