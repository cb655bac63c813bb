//! End-to-end runs of the folder-to-pack pipeline

use image::codecs::gif::{GifEncoder, Repeat};
use image::codecs::webp::WebPDecoder;
use image::{AnimationDecoder, Delay, Frame, Rgb, RgbImage, Rgba, RgbaImage};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use stickerpack_core::PackManifest;
use stickerpack_encoder::NormalizerConfig;
use stickerpack_pack::{Error, OutputProtocol, PipelineConfig, StickerPipeline};
use tempfile::tempdir;
use zip::ZipArchive;

fn write_png(path: &Path, width: u32, height: u32) {
    RgbaImage::from_pixel(width, height, Rgba([30, 60, 90, 255]))
        .save(path)
        .unwrap();
}

fn write_gif(path: &Path, width: u32, height: u32, frames: usize) {
    let mut encoder = GifEncoder::new(File::create(path).unwrap());
    encoder.set_repeat(Repeat::Infinite).unwrap();
    for i in 0..frames {
        let color = Rgba([(i * 80) as u8, 100, 200, 255]);
        let frame = Frame::from_parts(
            RgbaImage::from_pixel(width, height, color),
            0,
            0,
            Delay::from_numer_denom_ms(60, 1),
        );
        encoder.encode_frame(frame).unwrap();
    }
}

fn archive_names(path: &Path) -> Vec<String> {
    let archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut names: Vec<String> = archive.file_names().map(String::from).collect();
    names.sort();
    names
}

/// Creates `<tmp>/pics` holding four good images and one corrupt file
fn mixed_folder(root: &Path) {
    let input = root.join("pics");
    fs::create_dir(&input).unwrap();
    write_png(&input.join("a_wide.png"), 1000, 500);
    RgbImage::from_pixel(300, 600, Rgb([10, 20, 30]))
        .save(input.join("b_tall.jpg"))
        .unwrap();
    write_gif(&input.join("c_anim.gif"), 100, 200, 3);
    fs::write(input.join("d_broken.png"), b"not an image at all").unwrap();
    write_png(&input.join("e_square.png"), 64, 64);
    fs::write(input.join("readme.txt"), b"ignored").unwrap();
}

#[test]
fn test_corrupt_file_is_skipped_and_pack_is_built() {
    let dir = tempdir().unwrap();
    mixed_folder(dir.path());

    let report = StickerPipeline::new(PipelineConfig::new("Party"))
        .run(dir.path(), "pics")
        .unwrap();

    let pack_dir = dir.path().join("Party");
    assert!(!dir.path().join("pics").exists());
    assert!(pack_dir.join("pics").join("d_broken.png").is_file());

    assert_eq!(report.assets.len(), 4);
    assert_eq!(report.skipped.len(), 1);
    assert!(report.skipped[0].path.ends_with("d_broken.png"));

    assert_eq!(report.tray_icon.file_name, "a_wide.webp");
    let tray = image::open(&report.tray_icon.path).unwrap();
    assert_eq!((tray.width(), tray.height()), (96, 96));

    let tall = image::open(pack_dir.join("processed_images").join("b_tall.webp")).unwrap();
    assert_eq!((tall.width(), tall.height()), (512, 512));

    let anim = File::open(pack_dir.join("processed_images").join("c_anim.webp")).unwrap();
    let decoder = WebPDecoder::new(BufReader::new(anim)).unwrap();
    assert!(decoder.has_animation());
    let frames = decoder.into_frames().collect_frames().unwrap();
    assert_eq!(frames.len(), 3);
    for frame in &frames {
        assert_eq!(frame.buffer().dimensions(), (512, 512));
        assert_eq!(frame.buffer().get_pixel(0, 0), &Rgba([0, 0, 0, 0]));
    }

    assert_eq!(report.archive.path, pack_dir.join("Party.wastickers"));
    assert_eq!(
        archive_names(&report.archive.path),
        vec![
            "a_wide.webp",
            "b_tall.webp",
            "c_anim.webp",
            "contents.json",
            "e_square.webp",
        ]
    );

    let manifest: PackManifest =
        serde_json::from_str(&fs::read_to_string(pack_dir.join("contents.json")).unwrap())
            .unwrap();
    assert_eq!(manifest.name, "Party");
    assert_eq!(manifest.tray_image, "a_wide.webp");
    assert_eq!(manifest.stickers.len(), 4);
    assert!(manifest.references("c_anim.webp"));
    assert!(!manifest.references("d_broken.webp"));
    assert!(manifest.stickers.iter().all(|s| s.emojis.is_empty()));
}

#[test]
fn test_leftover_stickers_are_not_packed() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("pics");
    fs::create_dir(&input).unwrap();
    write_png(&input.join("a.png"), 40, 40);

    // stickers from an earlier run under the same pack name
    let processed = dir.path().join("Party").join("processed_images");
    fs::create_dir_all(&processed).unwrap();
    fs::write(processed.join("old.webp"), b"stale sticker").unwrap();

    let report = StickerPipeline::new(PipelineConfig::new("Party"))
        .run(dir.path(), "pics")
        .unwrap();

    assert_eq!(report.assets.len(), 1);
    assert_eq!(report.archive.entries, vec!["a.webp", "contents.json"]);
    assert_eq!(
        archive_names(&report.archive.path),
        vec!["a.webp", "contents.json"]
    );

    let manifest: PackManifest = serde_json::from_str(
        &fs::read_to_string(dir.path().join("Party").join("contents.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(manifest.stickers.len(), 1);
    assert!(!manifest.references("old.webp"));
}

#[test]
fn test_text_files_protocol_run() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("imgs");
    fs::create_dir(&input).unwrap();
    write_png(&input.join("one.png"), 20, 10);
    write_png(&input.join("two.png"), 10, 20);

    let mut config = PipelineConfig::new("Texty");
    config.pack.protocol = OutputProtocol::TextFiles;
    config.pack.publisher = "Someone".to_string();

    let report = StickerPipeline::new(config).run(dir.path(), "imgs").unwrap();

    assert_eq!(
        archive_names(&report.archive.path),
        vec!["author.txt", "one.webp", "title.txt", "two.webp"]
    );
    let pack_dir = dir.path().join("Texty");
    assert_eq!(fs::read_to_string(pack_dir.join("title.txt")).unwrap(), "Texty");
    assert_eq!(fs::read_to_string(pack_dir.join("author.txt")).unwrap(), "Someone");
    assert!(!pack_dir.join("contents.json").exists());
}

#[test]
fn test_parallel_run_matches_sequential_run() {
    let sequential = tempdir().unwrap();
    let parallel = tempdir().unwrap();
    mixed_folder(sequential.path());
    mixed_folder(parallel.path());

    let seq_report = StickerPipeline::new(PipelineConfig::new("P"))
        .run(sequential.path(), "pics")
        .unwrap();

    let mut config = PipelineConfig::new("P");
    config.normalizer = NormalizerConfig { jobs: 4 };
    let par_report = StickerPipeline::new(config)
        .run(parallel.path(), "pics")
        .unwrap();

    assert_eq!(seq_report.tray_icon.file_name, par_report.tray_icon.file_name);
    assert_eq!(seq_report.archive.entries, par_report.archive.entries);
    for (a, b) in seq_report.assets.iter().zip(&par_report.assets) {
        assert_eq!(fs::read(&a.path).unwrap(), fs::read(&b.path).unwrap());
    }
    assert_eq!(
        fs::read(&seq_report.archive.path).unwrap(),
        fs::read(&par_report.archive.path).unwrap()
    );
}

#[test]
fn test_empty_folder_fails_with_no_assets() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("empty");
    fs::create_dir(&input).unwrap();
    fs::write(input.join("notes.txt"), b"no images here").unwrap();

    let result = StickerPipeline::new(PipelineConfig::new("Nothing")).run(dir.path(), "empty");

    assert!(matches!(result, Err(Error::NoAssets(_))));
    assert!(!dir.path().join("Nothing").join("Nothing.wastickers").exists());
}

#[test]
fn test_missing_folder_aborts_before_creating_anything() {
    let dir = tempdir().unwrap();
    let result = StickerPipeline::new(PipelineConfig::new("Ghost")).run(dir.path(), "absent");

    assert!(matches!(result, Err(Error::MissingInputFolder(_))));
    assert!(!dir.path().join("Ghost").exists());
}
