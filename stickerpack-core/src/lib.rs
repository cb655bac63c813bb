//! Stickerpack Core Library
//!
//! This library provides the core data structures for sticker packs and the
//! animated WebP container format used for normalized stickers.

pub mod asset;
pub mod container;
pub mod manifest;

pub use asset::{AssetKind, SourceAsset};
pub use container::{AnimationFrame, AnimationHeader, WebPAnimation};
pub use manifest::{PackManifest, StickerEntry};

/// Side length of a normalized sticker canvas in pixels
pub const CANVAS_SIZE: u32 = 512;

/// Side length of the pack tray icon in pixels
pub const TRAY_SIZE: u32 = 96;

/// File extension of every normalized asset
pub const STICKER_EXTENSION: &str = "webp";

/// Result type for stickerpack-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for stickerpack-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid magic bytes, expected 'RIFF....WEBP'")]
    InvalidMagic,

    #[error("Missing {0} chunk")]
    MissingChunk(&'static str),

    #[error("Invalid {0} chunk")]
    InvalidChunk(&'static str),

    #[error("Frame {width}x{height} does not fit the container limits")]
    FrameTooLarge { width: u32, height: u32 },

    #[error("Animation has no frames")]
    EmptyAnimation,
}
