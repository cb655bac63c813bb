//! Stickerpack Encoder Library
//!
//! This library turns still images and GIF animations into normalized
//! 512x512 lossless WebP stickers and derives the 96x96 pack tray icon.

pub mod frame_reader;
pub mod geometry;
pub mod normalizer;
pub mod progress_tracker;
pub mod tray;
pub mod webp_encoder;

pub use normalizer::{NormalizedAsset, Normalizer};
pub use tray::{derive_tray_icon, TrayIcon};

use std::path::PathBuf;

/// Result type for stickerpack-encoder operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for stickerpack-encoder operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Stickerpack core error: {0}")]
    Core(#[from] stickerpack_core::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode {}: {message}", .path.display())]
    Encode { path: PathBuf, message: String },

    #[error("Image {} has zero width or height", .0.display())]
    EmptyImage(PathBuf),

    #[error("Animation {} has no frames", .0.display())]
    EmptyAnimation(PathBuf),
}

impl Error {
    /// Wraps an image error raised while reading `path`
    pub(crate) fn decode(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Error::Decode {
            path: path.into(),
            source,
        }
    }
}

/// Normalizer configuration
#[derive(Debug, Clone)]
pub struct NormalizerConfig {
    /// Number of worker threads (1 = sequential, 0 = one per logical CPU)
    pub jobs: usize,
}

impl NormalizerConfig {
    /// Resolves the effective number of workers
    pub fn worker_count(&self) -> usize {
        if self.jobs == 0 {
            num_cpus::get()
        } else {
            self.jobs
        }
    }
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self { jobs: 1 }
    }
}
