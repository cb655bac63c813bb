//! Lossless WebP encoding functionality

use crate::Result;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use stickerpack_core::container::{self, AnimationFrame, AnimationHeader, WebPAnimation};

/// Encodes an RGBA image to a still lossless WebP file
pub fn encode_lossless(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    WebPEncoder::new_lossless(&mut data).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(data)
}

/// Encodes an RGBA image and returns only its `VP8L` bitstream
pub fn encode_bitstream(image: &RgbaImage) -> Result<Vec<u8>> {
    let file = encode_lossless(image)?;
    Ok(container::extract_vp8l(&file)?)
}

/// Encodes `(frame, duration_ms)` pairs as an infinitely looping animation
/// whose frames replace each other and are cleared to transparent after display
pub fn encode_animation(frames: &[(RgbaImage, u32)]) -> Result<Vec<u8>> {
    let (width, height) = frames
        .first()
        .map(|(image, _)| image.dimensions())
        .ok_or(stickerpack_core::Error::EmptyAnimation)?;

    let mut encoded = Vec::with_capacity(frames.len());
    for (image, duration_ms) in frames {
        let bitstream = encode_bitstream(image)?;
        encoded.push(AnimationFrame::replacing(bitstream, *duration_ms)?);
    }

    let animation = WebPAnimation::new(AnimationHeader::new(width, height), encoded);
    let mut data = Vec::new();
    animation.write(&mut data)?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::webp::WebPDecoder;
    use image::metadata::LoopCount;
    use image::{AnimationDecoder, Rgba};
    use std::io::Cursor;

    fn checker(size: u32) -> RgbaImage {
        RgbaImage::from_fn(size, size, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([255, 0, 128, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        })
    }

    #[test]
    fn test_still_is_lossless() {
        let image = checker(16);
        let data = encode_lossless(&image).unwrap();
        let decoded = image::load_from_memory(&data).unwrap().to_rgba8();
        assert_eq!(decoded, image);
    }

    #[test]
    fn test_animation_frames_decode_back() {
        let first = checker(8);
        let second = RgbaImage::from_pixel(8, 8, Rgba([10, 20, 30, 255]));
        let data = encode_animation(&[(first.clone(), 80), (second.clone(), 120)]).unwrap();

        let decoder = WebPDecoder::new(Cursor::new(data)).unwrap();
        assert!(decoder.has_animation());
        assert!(matches!(decoder.loop_count(), LoopCount::Infinite));

        let frames = decoder.into_frames().collect_frames().unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].delay().numer_denom_ms(), (80, 1));
        assert_eq!(frames[1].delay().numer_denom_ms(), (120, 1));
        assert_eq!(frames[0].buffer(), &first);
        assert_eq!(frames[1].buffer(), &second);
    }

    #[test]
    fn test_transparent_pixels_do_not_show_previous_frame() {
        let left = RgbaImage::from_fn(8, 8, |x, _| {
            if x < 4 {
                Rgba([200, 0, 0, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        });
        let right = RgbaImage::from_fn(8, 8, |x, _| {
            if x >= 4 {
                Rgba([0, 200, 0, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        });
        let data = encode_animation(&[(left.clone(), 50), (right.clone(), 50)]).unwrap();

        let frames = WebPDecoder::new(Cursor::new(data))
            .unwrap()
            .into_frames()
            .collect_frames()
            .unwrap();
        assert_eq!(frames[0].buffer(), &left);
        assert_eq!(frames[1].buffer(), &right);
        assert_eq!(frames[1].buffer().get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_empty_animation_is_an_error() {
        assert!(encode_animation(&[]).is_err());
    }
}
