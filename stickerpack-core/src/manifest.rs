//! Pack manifest (`contents.json`) data structures

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Current manifest format version
pub const MANIFEST_VERSION: u32 = 1;

/// One sticker listed in the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StickerEntry {
    /// Bare file name of the sticker inside the archive
    pub image_file: String,
    /// Emoji tags, may be empty
    pub emojis: Vec<String>,
}

impl StickerEntry {
    /// Creates a new sticker entry
    pub fn new(image_file: impl Into<String>, emojis: Vec<String>) -> Self {
        Self {
            image_file: image_file.into(),
            emojis,
        }
    }
}

/// Metadata describing a whole sticker pack
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackManifest {
    /// Pack identifier
    pub identifier: String,
    /// Human readable pack name
    pub name: String,
    /// Publisher / author
    pub publisher: String,
    /// Bare file name of the tray icon
    pub tray_image: String,
    /// Manifest format version
    pub version: u32,
    /// Stickers in pack order
    pub stickers: Vec<StickerEntry>,
}

impl PackManifest {
    /// Creates a manifest with no stickers
    pub fn new(
        identifier: impl Into<String>,
        name: impl Into<String>,
        publisher: impl Into<String>,
        tray_image: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            publisher: publisher.into(),
            tray_image: tray_image.into(),
            version: MANIFEST_VERSION,
            stickers: Vec::new(),
        }
    }

    /// Appends a sticker entry
    pub fn push_sticker(&mut self, entry: StickerEntry) {
        self.stickers.push(entry);
    }

    /// Returns true if `file_name` is listed as a sticker
    pub fn references(&self, file_name: &str) -> bool {
        self.stickers.iter().any(|s| s.image_file == file_name)
    }

    /// Serializes the manifest as pretty-printed JSON
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
