//! Source asset discovery and naming

use crate::STICKER_EXTENSION;
use std::path::{Path, PathBuf};

/// Suffixes accepted as sticker sources (case-sensitive)
pub const SUPPORTED_SUFFIXES: [&str; 4] = [".jpg", ".jpeg", ".png", ".gif"];

/// Kind of a source file, inferred from its suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// Single-frame raster image (JPEG, PNG)
    StillImage,
    /// Multi-frame animation (GIF)
    AnimatedImage,
}

/// A read-only input file discovered by a directory scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceAsset {
    /// Path to the source file
    pub path: PathBuf,
    /// Inferred kind
    pub kind: AssetKind,
}

impl SourceAsset {
    /// Classifies a path by its file name suffix.
    ///
    /// Returns `None` for names that do not end in one of
    /// [`SUPPORTED_SUFFIXES`]; the match is case-sensitive, so `photo.PNG`
    /// is ignored.
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let name = path.file_name()?.to_str()?;

        if !SUPPORTED_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)) {
            return None;
        }

        let kind = if name.ends_with(".gif") {
            AssetKind::AnimatedImage
        } else {
            AssetKind::StillImage
        };

        Some(Self { path, kind })
    }

    /// Returns the bare file name of the source
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Returns the name of the normalized output file: the source name with
    /// its extension replaced by `.webp`
    pub fn output_file_name(&self) -> String {
        let name = Path::new(self.path.file_name().unwrap_or_default());
        name.with_extension(STICKER_EXTENSION)
            .to_string_lossy()
            .into_owned()
    }

    /// Returns true for animated sources
    pub fn is_animated(&self) -> bool {
        self.kind == AssetKind::AnimatedImage
    }
}
