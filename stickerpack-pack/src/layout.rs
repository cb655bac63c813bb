//! Pack folder layout and source discovery

use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use stickerpack_core::SourceAsset;
use tracing::info;

/// Name of the folder holding normalized stickers
pub const PROCESSED_DIR: &str = "processed_images";

/// Folders of one pack run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackLayout {
    /// `<working_dir>/<pack_name>`
    pub pack_dir: PathBuf,
    /// The input folder after it was moved into the pack folder
    pub input_dir: PathBuf,
    /// `<pack_dir>/processed_images`
    pub processed_dir: PathBuf,
}

impl PackLayout {
    /// Creates the pack folder, moves the input folder into it and creates
    /// the processed-images folder.
    ///
    /// Fails with [`Error::MissingInputFolder`] before touching the
    /// filesystem when `<working_dir>/<input_folder>` is not a directory.
    pub fn prepare(working_dir: &Path, input_folder: &str, pack_name: &str) -> Result<Self> {
        let source_dir = working_dir.join(input_folder);
        if !source_dir.is_dir() {
            return Err(Error::MissingInputFolder(source_dir));
        }

        let pack_dir = working_dir.join(pack_name);
        if pack_dir == source_dir {
            return Err(Error::PackFolderConflict(pack_dir));
        }
        fs::create_dir_all(&pack_dir)?;

        let folder_name = source_dir
            .file_name()
            .ok_or_else(|| Error::MissingInputFolder(source_dir.clone()))?;
        let input_dir = pack_dir.join(folder_name);
        fs::rename(&source_dir, &input_dir)?;
        info!(
            "Moved {} -> {}",
            source_dir.display(),
            input_dir.display()
        );

        let processed_dir = pack_dir.join(PROCESSED_DIR);
        fs::create_dir_all(&processed_dir)?;

        Ok(Self {
            pack_dir,
            input_dir,
            processed_dir,
        })
    }

    /// Lists supported source files of the input folder, sorted by file name
    pub fn scan_sources(&self) -> Result<Vec<SourceAsset>> {
        scan_sources(&self.input_dir)
    }
}

/// Lists regular files in `dir` with a supported suffix, sorted by file name
pub fn scan_sources(dir: &Path) -> Result<Vec<SourceAsset>> {
    let mut sources = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(source) = SourceAsset::from_path(entry.path()) {
            sources.push(source);
        }
    }
    sources.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    Ok(sources)
}
