use std::io::Cursor;

use crate::foundation::error::{BitmapError, BitmapResult};
use crate::surface::Surface;

pub use image::ImageFormat;

/// Encode `surface` as `format`. Formats without alpha drop it.
pub fn encode_image(surface: &Surface, format: ImageFormat) -> BitmapResult<Vec<u8>> {
    let rgba = image::RgbaImage::from_raw(
        surface.width(),
        surface.height(),
        surface.as_bytes().to_vec(),
    )
    .ok_or_else(|| BitmapError::invalid("surface bytes do not match its size"))?;
    let img = match format {
        ImageFormat::Jpeg => image::DynamicImage::ImageRgb8(image::DynamicImage::ImageRgba8(rgba).to_rgb8()),
        _ => image::DynamicImage::ImageRgba8(rgba),
    };
    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), format)
        .map_err(|e| BitmapError::decode(format!("encode {format:?}: {e}")))?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/encode.rs"]
mod tests;
