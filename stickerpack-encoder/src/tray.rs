//! Tray icon derivation

use crate::{frame_reader, webp_encoder, Result};
use image::imageops::{self, FilterType};
use std::fs;
use std::path::{Path, PathBuf};
use stickerpack_core::TRAY_SIZE;
use tracing::info;

/// The small square icon representing a pack in the picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrayIcon {
    /// Path of the icon file
    pub path: PathBuf,
    /// Bare file name of the icon
    pub file_name: String,
}

/// Resamples a normalized sticker down to `TRAY_SIZE` square and rewrites
/// it in place as a still lossless WebP.
///
/// Animated stickers contribute their first frame. The 512x512 version at
/// `asset_path` is replaced by the icon.
pub fn derive_tray_icon(asset_path: &Path) -> Result<TrayIcon> {
    let image = frame_reader::read_first_frame(asset_path)?;
    let icon = imageops::resize(&image, TRAY_SIZE, TRAY_SIZE, FilterType::Lanczos3);
    let data = webp_encoder::encode_lossless(&icon)?;
    fs::write(asset_path, data)?;

    info!("Resized for tray icon: {}", asset_path.display());

    Ok(TrayIcon {
        path: asset_path.to_path_buf(),
        file_name: asset_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use image::{Rgba, RgbaImage};
    use tempfile::tempdir;

    #[test]
    fn test_still_becomes_96_square() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("first.webp");
        let sticker = RgbaImage::from_pixel(512, 512, Rgba([0, 120, 240, 255]));
        fs::write(&path, webp_encoder::encode_lossless(&sticker).unwrap()).unwrap();

        let icon = derive_tray_icon(&path).unwrap();
        assert_eq!(icon.file_name, "first.webp");
        assert_eq!(icon.path, path);

        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (96, 96));
        assert_eq!(decoded.get_pixel(48, 48), &Rgba([0, 120, 240, 255]));
    }

    #[test]
    fn test_non_square_input_is_squashed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("odd.webp");
        let sticker = RgbaImage::from_pixel(300, 40, Rgba([5, 5, 5, 255]));
        fs::write(&path, webp_encoder::encode_lossless(&sticker).unwrap()).unwrap();

        derive_tray_icon(&path).unwrap();
        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (96, 96));
    }

    #[test]
    fn test_animated_sticker_uses_first_frame() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("anim.webp");
        let first = RgbaImage::from_pixel(512, 512, Rgba([250, 0, 0, 255]));
        let second = RgbaImage::from_pixel(512, 512, Rgba([0, 0, 250, 255]));
        let data = webp_encoder::encode_animation(&[(first, 100), (second, 100)]).unwrap();
        fs::write(&path, data).unwrap();

        derive_tray_icon(&path).unwrap();
        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (96, 96));
        assert_eq!(decoded.get_pixel(10, 10), &Rgba([250, 0, 0, 255]));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let dir = tempdir().unwrap();
        let result = derive_tray_icon(&dir.path().join("nope.webp"));
        assert!(matches!(result, Err(Error::Decode { .. })));
    }
}
