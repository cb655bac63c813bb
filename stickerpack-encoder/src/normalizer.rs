//! Asset normalization onto the fixed sticker canvas

use crate::progress_tracker::ProgressTracker;
use crate::{frame_reader, geometry, webp_encoder, Error, NormalizerConfig, Result};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use stickerpack_core::{AssetKind, SourceAsset, CANVAS_SIZE};
use tracing::info;

/// A sticker written to disk in its normalized form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedAsset {
    /// Path of the encoded `.webp` file
    pub path: PathBuf,
    /// Bare file name of the encoded file
    pub file_name: String,
    /// Kind of the source it was derived from
    pub kind: AssetKind,
    /// Number of frames encoded (1 for stills)
    pub frame_count: usize,
}

/// Normalizer that maps arbitrary images onto a transparent square canvas
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    /// Creates a new normalizer with the given configuration
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Decodes, resizes, centers, and encodes one source into `output_dir`.
    ///
    /// The output file name is the source name with a `.webp` extension.
    pub fn normalize(&self, source: &SourceAsset, output_dir: &Path) -> Result<NormalizedAsset> {
        let file_name = source.output_file_name();
        let output_path = output_dir.join(&file_name);

        let (data, frame_count) = match source.kind {
            AssetKind::StillImage => {
                let image = frame_reader::read_still(&source.path)?;
                let canvas = normalize_frame(&image, &source.path)?;
                (as_encode_error(&source.path, webp_encoder::encode_lossless(&canvas))?, 1)
            }
            AssetKind::AnimatedImage => {
                let frames = frame_reader::read_gif_frames(&source.path)?
                    .into_iter()
                    .map(|frame| {
                        normalize_frame(&frame.image, &source.path)
                            .map(|canvas| (canvas, frame.duration_ms))
                    })
                    .collect::<Result<Vec<_>>>()?;
                let count = frames.len();
                (as_encode_error(&source.path, webp_encoder::encode_animation(&frames))?, count)
            }
        };

        if let Err(e) = write_output(&output_path, &data) {
            // leave no truncated sticker behind
            let _ = fs::remove_file(&output_path);
            return Err(e);
        }

        info!(
            "Processed: {} -> {}",
            source.path.display(),
            output_path.display()
        );

        Ok(NormalizedAsset {
            path: output_path,
            file_name,
            kind: source.kind,
            frame_count,
        })
    }

    /// Normalizes every source, returning one result per source in input order.
    ///
    /// With more than one worker the sources are split across scoped threads;
    /// results are still indexed by input position so the outcome matches a
    /// sequential run.
    pub fn normalize_all(
        &self,
        sources: &[SourceAsset],
        output_dir: &Path,
    ) -> Vec<Result<NormalizedAsset>> {
        let tracker = ProgressTracker::new(sources.len() as u64, "Normalized");
        let workers = self.config.worker_count().min(sources.len()).max(1);

        if workers == 1 {
            return sources
                .iter()
                .map(|source| {
                    let result = self.normalize(source, output_dir);
                    tracker.increment_and_report(1);
                    result
                })
                .collect();
        }

        let chunk_size = sources.len().div_ceil(workers);
        let mut slots: Vec<Option<Result<NormalizedAsset>>> =
            sources.iter().map(|_| None).collect();

        std::thread::scope(|scope| {
            for (chunk_slots, chunk_sources) in
                slots.chunks_mut(chunk_size).zip(sources.chunks(chunk_size))
            {
                let tracker = &tracker;
                scope.spawn(move || {
                    for (slot, source) in chunk_slots.iter_mut().zip(chunk_sources) {
                        *slot = Some(self.normalize(source, output_dir));
                        tracker.increment_and_report(1);
                    }
                });
            }
        });

        slots.into_iter().flatten().collect()
    }
}

fn write_output(path: &Path, data: &[u8]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(data)?;
    writer.flush()?;
    Ok(())
}

/// Attributes an encoder failure to the source it came from
fn as_encode_error(path: &Path, encoded: Result<Vec<u8>>) -> Result<Vec<u8>> {
    encoded.map_err(|e| match e {
        Error::Image(source) => Error::Encode {
            path: path.to_path_buf(),
            message: source.to_string(),
        },
        Error::Core(source) => Error::Encode {
            path: path.to_path_buf(),
            message: source.to_string(),
        },
        other => other,
    })
}

/// Resizes one frame so its longer side fills the canvas (Lanczos3) and
/// pastes it centered on a fully transparent `CANVAS_SIZE` square
pub fn normalize_frame(image: &RgbaImage, path: &Path) -> Result<RgbaImage> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(Error::EmptyImage(path.to_path_buf()));
    }

    let (new_width, new_height) = geometry::fit_to_square(width, height, CANVAS_SIZE);
    let resized = imageops::resize(image, new_width, new_height, FilterType::Lanczos3);

    let mut canvas = RgbaImage::from_pixel(CANVAS_SIZE, CANVAS_SIZE, Rgba([0, 0, 0, 0]));
    let (x, y) = geometry::center_offset(new_width, new_height, CANVAS_SIZE);
    imageops::replace(&mut canvas, &resized, x as i64, y as i64);

    Ok(canvas)
}
