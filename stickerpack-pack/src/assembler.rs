//! Pack assembly: metadata files and the `.wastickers` archive

use crate::archive::ArchiveWriter;
use crate::{Error, OutputProtocol, PackConfig, Result};
use std::fs;
use std::path::{Path, PathBuf};
use stickerpack_core::{PackManifest, StickerEntry};
use stickerpack_encoder::TrayIcon;
use tracing::info;

/// Extension of the pack archive
pub const ARCHIVE_EXTENSION: &str = "wastickers";

/// Manifest file written by [`OutputProtocol::Manifest`]
pub const MANIFEST_FILE: &str = "contents.json";

/// Title file written by [`OutputProtocol::TextFiles`]
pub const TITLE_FILE: &str = "title.txt";

/// Author file written by [`OutputProtocol::TextFiles`]
pub const AUTHOR_FILE: &str = "author.txt";

/// A finished pack archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackArchive {
    /// Path of the `.wastickers` file
    pub path: PathBuf,
    /// Entry names in archive order
    pub entries: Vec<String>,
    /// Metadata protocol used
    pub protocol: OutputProtocol,
}

/// Bundles normalized stickers, the tray icon and pack metadata
pub struct PackAssembler {
    config: PackConfig,
}

impl PackAssembler {
    /// Creates a new assembler with the given configuration
    pub fn new(config: PackConfig) -> Self {
        Self { config }
    }

    /// Writes the metadata files into `output_dir` and archives them together
    /// with the stickers named by `asset_names`, read from `processed_dir`.
    ///
    /// Only the given stickers are listed and archived, in the given order,
    /// whatever else `processed_dir` holds. The tray icon must be one of them.
    /// An existing archive at the target path is overwritten.
    pub fn assemble(
        &self,
        asset_names: &[String],
        processed_dir: &Path,
        tray_icon: &TrayIcon,
        output_dir: &Path,
    ) -> Result<PackArchive> {
        if asset_names.is_empty() {
            return Err(Error::NoAssets(processed_dir.to_path_buf()));
        }

        let manifest = self.build_manifest(asset_names, &tray_icon.file_name);
        if !manifest.references(&tray_icon.file_name) {
            return Err(Error::MissingTrayIcon(tray_icon.file_name.clone()));
        }

        let metadata_files = match self.config.protocol {
            OutputProtocol::Manifest => {
                let path = output_dir.join(MANIFEST_FILE);
                fs::write(&path, manifest.to_json()?)?;
                info!("{} created in {}", MANIFEST_FILE, output_dir.display());
                vec![path]
            }
            OutputProtocol::TextFiles => {
                let title = output_dir.join(TITLE_FILE);
                let author = output_dir.join(AUTHOR_FILE);
                fs::write(&title, &self.config.name)?;
                fs::write(&author, &self.config.publisher)?;
                info!(
                    "{} and {} created in {}",
                    TITLE_FILE,
                    AUTHOR_FILE,
                    output_dir.display()
                );
                vec![title, author]
            }
        };

        let archive_path = output_dir.join(self.config.archive_file_name());
        let mut writer = ArchiveWriter::create(&archive_path)?;
        for name in asset_names {
            writer.add_file(&processed_dir.join(name))?;
        }
        for path in &metadata_files {
            writer.add_file(path)?;
        }
        let entries = writer.finish()?;

        info!("Sticker pack created: {}", archive_path.display());

        Ok(PackArchive {
            path: archive_path,
            entries,
            protocol: self.config.protocol,
        })
    }

    /// Builds the manifest listing `asset_names` in order
    pub fn build_manifest(&self, asset_names: &[String], tray_image: &str) -> PackManifest {
        let mut manifest = PackManifest::new(
            self.config.identifier.as_str(),
            self.config.name.as_str(),
            self.config.publisher.as_str(),
            tray_image,
        );
        manifest.version = self.config.version;
        for name in asset_names {
            manifest.push_sticker(StickerEntry::new(name.as_str(), self.config.emojis.clone()));
        }
        manifest
    }
}
