//! Stickerpack Pack Library
//!
//! This library assembles normalized stickers into a `.wastickers` archive and
//! drives the whole folder-to-pack pipeline.

pub mod archive;
pub mod assembler;
pub mod layout;
pub mod pipeline;

pub use assembler::{PackArchive, PackAssembler};
pub use layout::PackLayout;
pub use pipeline::{PackReport, PipelineConfig, SkippedSource, StickerPipeline};

use std::path::PathBuf;
use stickerpack_core::manifest::MANIFEST_VERSION;

/// Publisher written when none is configured
pub const DEFAULT_PUBLISHER: &str = "Sticker_Packer";

/// Result type for stickerpack-pack operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for stickerpack-pack operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Stickerpack core error: {0}")]
    Core(#[from] stickerpack_core::Error),

    #[error("Encoder error: {0}")]
    Encoder(#[from] stickerpack_encoder::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Folder '{}' not found", .0.display())]
    MissingInputFolder(PathBuf),

    #[error("Pack folder {} would replace the input folder", .0.display())]
    PackFolderConflict(PathBuf),

    #[error("No images found in {}", .0.display())]
    NoAssets(PathBuf),

    #[error("Failed to create tray icon from {}: {source}", .path.display())]
    TrayIcon {
        path: PathBuf,
        #[source]
        source: stickerpack_encoder::Error,
    },

    #[error("Tray icon {0} is not among the processed stickers")]
    MissingTrayIcon(String),
}

/// Metadata protocol written next to the stickers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputProtocol {
    /// `contents.json` manifest
    #[default]
    Manifest,
    /// `title.txt` and `author.txt`
    TextFiles,
}

/// Pack metadata and output configuration
#[derive(Debug, Clone)]
pub struct PackConfig {
    /// Human readable pack name, also the pack folder and archive name
    pub name: String,
    /// Publisher / author
    pub publisher: String,
    /// Manifest identifier
    pub identifier: String,
    /// Manifest version
    pub version: u32,
    /// Metadata protocol
    pub protocol: OutputProtocol,
    /// Emoji tags applied to every sticker entry
    pub emojis: Vec<String>,
}

impl PackConfig {
    /// Creates a configuration with default publisher, derived identifier
    /// and the manifest protocol
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            identifier: slugify(&name),
            name,
            publisher: DEFAULT_PUBLISHER.to_string(),
            version: MANIFEST_VERSION,
            protocol: OutputProtocol::default(),
            emojis: Vec::new(),
        }
    }

    /// Returns the archive file name, `<name>.wastickers`
    pub fn archive_file_name(&self) -> String {
        format!("{}.{}", self.name, assembler::ARCHIVE_EXTENSION)
    }
}

/// Lowercases ASCII alphanumerics and joins every other run of characters with `_`
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    let slug = slug.trim_end_matches('_');
    if slug.is_empty() {
        "sticker_pack".to_string()
    } else {
        slug.to_string()
    }
}
