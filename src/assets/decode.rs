use std::io::Cursor;

use image::AnimationDecoder;

use crate::foundation::error::{BitmapError, BitmapResult};
use crate::surface::Surface;

/// Result of decoding an image file.
#[derive(Debug)]
pub enum Decoded {
    /// A single image.
    Still(Surface),
    /// Two or more equally sized frames.
    Animation {
        /// Frames in display order, each a full canvas.
        frames: Vec<Surface>,
        /// Playback rate derived from the first frame's delay, `None` when the file has none.
        fps: Option<f64>,
        /// Whether playback wraps around.
        looping: bool,
    },
}

impl Decoded {
    /// Canvas size in pixels.
    pub fn size(&self) -> (u32, u32) {
        match self {
            Self::Still(s) => (s.width(), s.height()),
            Self::Animation { frames, .. } => frames
                .first()
                .map(|f| (f.width(), f.height()))
                .unwrap_or((0, 0)),
        }
    }
}

/// Decode a still image or a GIF animation from memory.
///
/// A GIF with a single frame decodes as [`Decoded::Still`].
pub fn decode_image(bytes: &[u8]) -> BitmapResult<Decoded> {
    let format = image::guess_format(bytes)
        .map_err(|e| BitmapError::decode(format!("unrecognized image data: {e}")))?;
    if format == image::ImageFormat::Gif {
        return decode_gif(bytes);
    }
    let dyn_img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| BitmapError::decode(format!("decode {format:?} image: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (w, h) = rgba.dimensions();
    Ok(Decoded::Still(Surface::from_rgba8(w, h, rgba.into_raw())?))
}

fn decode_gif(bytes: &[u8]) -> BitmapResult<Decoded> {
    let decoder = image::codecs::gif::GifDecoder::new(Cursor::new(bytes))
        .map_err(|e| BitmapError::decode(format!("open gif: {e}")))?;
    let frames = decoder
        .into_frames()
        .collect_frames()
        .map_err(|e| BitmapError::decode(format!("decode gif frames: {e}")))?;

    let fps = frames.first().and_then(|f| {
        let (num, den) = f.delay().numer_denom_ms();
        (num > 0 && den > 0).then(|| 1000.0 * f64::from(den) / f64::from(num))
    });

    let mut surfaces = Vec::with_capacity(frames.len());
    for frame in frames {
        let buf = frame.into_buffer();
        let (w, h) = buf.dimensions();
        surfaces.push(Surface::from_rgba8(w, h, buf.into_raw())?);
    }

    match surfaces.len() {
        0 => Err(BitmapError::decode("gif contains no frames")),
        1 => Ok(Decoded::Still(surfaces.remove(0))),
        _ => Ok(Decoded::Animation {
            frames: surfaces,
            fps,
            looping: true,
        }),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
