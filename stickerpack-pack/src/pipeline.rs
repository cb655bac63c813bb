//! Folder-to-pack orchestration

use crate::assembler::{PackArchive, PackAssembler};
use crate::layout::PackLayout;
use crate::{Error, PackConfig, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use stickerpack_core::SourceAsset;
use stickerpack_encoder::{
    derive_tray_icon, NormalizedAsset, Normalizer, NormalizerConfig, TrayIcon,
};
use tracing::{error, info, warn};

/// Configuration of a whole pipeline run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Pack metadata and output protocol
    pub pack: PackConfig,
    /// Normalizer settings
    pub normalizer: NormalizerConfig,
}

impl PipelineConfig {
    /// Creates a configuration with defaults for everything but the pack name
    pub fn new(pack_name: impl Into<String>) -> Self {
        Self {
            pack: PackConfig::new(pack_name),
            normalizer: NormalizerConfig::default(),
        }
    }
}

/// A source that did not make it into the pack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSource {
    /// Path of the source file
    pub path: PathBuf,
    /// Human readable cause
    pub reason: String,
}

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct PackReport {
    /// Folders used by the run
    pub layout: PackLayout,
    /// Normalized stickers in scan order
    pub assets: Vec<NormalizedAsset>,
    /// Tray icon derived from the first sticker
    pub tray_icon: TrayIcon,
    /// Sources skipped because of per-file errors
    pub skipped: Vec<SkippedSource>,
    /// The written archive
    pub archive: PackArchive,
}

/// Runs normalization, tray icon derivation and assembly for one input folder
pub struct StickerPipeline {
    config: PipelineConfig,
}

impl StickerPipeline {
    /// Creates a new pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Builds the pack for `<working_dir>/<input_folder>`.
    ///
    /// Per-file decode and encode failures are logged and skipped. A missing
    /// input folder, zero successful stickers, a failed tray icon or any
    /// archive failure abort the run.
    pub fn run(&self, working_dir: &Path, input_folder: &str) -> Result<PackReport> {
        let layout = PackLayout::prepare(working_dir, input_folder, &self.config.pack.name)?;
        let sources = layout.scan_sources()?;
        info!(
            "Found {} source images in {}",
            sources.len(),
            layout.input_dir.display()
        );

        let (sources, mut skipped) = dedupe_output_names(sources);

        let normalizer = Normalizer::new(self.config.normalizer.clone());
        let results = normalizer.normalize_all(&sources, &layout.processed_dir);

        let mut assets = Vec::with_capacity(results.len());
        for (source, result) in sources.iter().zip(results) {
            match result {
                Ok(asset) => assets.push(asset),
                Err(e) => {
                    error!("Error processing {}: {}", source.path.display(), e);
                    skipped.push(SkippedSource {
                        path: source.path.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        let first = assets
            .first()
            .ok_or_else(|| Error::NoAssets(layout.input_dir.clone()))?;

        let tray_icon = derive_tray_icon(&first.path).map_err(|source| {
            error!("Error resizing for tray icon: {}", source);
            Error::TrayIcon {
                path: first.path.clone(),
                source,
            }
        })?;

        let asset_names: Vec<String> = assets.iter().map(|a| a.file_name.clone()).collect();
        let archive = PackAssembler::new(self.config.pack.clone()).assemble(
            &asset_names,
            &layout.processed_dir,
            &tray_icon,
            &layout.pack_dir,
        )?;

        Ok(PackReport {
            layout,
            assets,
            tray_icon,
            skipped,
            archive,
        })
    }
}

/// Keeps the first source for every output file name; later ones are skipped
fn dedupe_output_names(sources: Vec<SourceAsset>) -> (Vec<SourceAsset>, Vec<SkippedSource>) {
    let mut owners: HashMap<String, PathBuf> = HashMap::new();
    let mut kept = Vec::with_capacity(sources.len());
    let mut skipped = Vec::new();

    for source in sources {
        let output = source.output_file_name();
        if let Some(owner) = owners.get(&output) {
            let reason = format!(
                "{} is already produced by {}",
                output,
                owner.display()
            );
            warn!("Skipping {}: {}", source.path.display(), reason);
            skipped.push(SkippedSource {
                path: source.path,
                reason,
            });
        } else {
            owners.insert(output, source.path.clone());
            kept.push(source);
        }
    }

    (kept, skipped)
}
