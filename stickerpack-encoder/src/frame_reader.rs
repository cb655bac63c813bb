//! Source decoding: still images, GIF frames, and normalized stickers

use crate::{Error, Result};
use image::codecs::gif::GifDecoder;
use image::codecs::webp::WebPDecoder;
use image::{AnimationDecoder, DynamicImage, ImageError, ImageReader, RgbaImage};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// One decoded animation step
#[derive(Debug, Clone)]
pub struct SourceFrame {
    /// Fully composited RGBA pixels for this step
    pub image: RgbaImage,
    /// Display duration in milliseconds
    pub duration_ms: u32,
}

/// Decodes a still image into RGBA, sniffing the actual format from its content
pub fn read_still(path: &Path) -> Result<RgbaImage> {
    let reader = ImageReader::open(path)
        .map_err(|e| Error::decode(path, ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| Error::decode(path, ImageError::IoError(e)))?;

    let image = reader.decode().map_err(|e| Error::decode(path, e))?;
    Ok(image.to_rgba8())
}

/// Decodes every frame of a GIF in display order
pub fn read_gif_frames(path: &Path) -> Result<Vec<SourceFrame>> {
    let file = File::open(path).map_err(|e| Error::decode(path, ImageError::IoError(e)))?;
    let decoder = GifDecoder::new(BufReader::new(file)).map_err(|e| Error::decode(path, e))?;

    let frames = decoder
        .into_frames()
        .collect_frames()
        .map_err(|e| Error::decode(path, e))?;

    if frames.is_empty() {
        return Err(Error::EmptyAnimation(path.to_path_buf()));
    }

    Ok(frames
        .into_iter()
        .map(|frame| {
            let (numer, denom) = frame.delay().numer_denom_ms();
            let duration_ms = if denom == 0 { 0 } else { (numer + denom / 2) / denom };
            SourceFrame {
                image: frame.into_buffer(),
                duration_ms,
            }
        })
        .collect())
}

/// Decodes the first frame of a normalized sticker, animated or still
pub fn read_first_frame(path: &Path) -> Result<RgbaImage> {
    let file = File::open(path).map_err(|e| Error::decode(path, ImageError::IoError(e)))?;
    let decoder = WebPDecoder::new(BufReader::new(file)).map_err(|e| Error::decode(path, e))?;

    if !decoder.has_animation() {
        let image = DynamicImage::from_decoder(decoder).map_err(|e| Error::decode(path, e))?;
        return Ok(image.to_rgba8());
    }

    let frame = decoder
        .into_frames()
        .next()
        .ok_or_else(|| Error::EmptyAnimation(path.to_path_buf()))?
        .map_err(|e| Error::decode(path, e))?;
    Ok(frame.into_buffer())
}
