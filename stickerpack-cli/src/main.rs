//! Stickerpack CLI Tool
//!
//! Command-line interface for turning a folder of images and GIFs into a
//! WhatsApp `.wastickers` sticker pack.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use stickerpack_core::AssetKind;
use stickerpack_encoder::NormalizerConfig;
use stickerpack_pack::{OutputProtocol, PackReport, PipelineConfig, StickerPipeline};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stickerpack")]
#[command(about = "Build a WhatsApp sticker pack from a folder of images and GIFs")]
#[command(version)]
struct Cli {
    /// Image folder name (in the working directory)
    input_folder: String,

    /// Sticker pack name, also used for the output folder and archive
    pack_name: String,

    /// Publisher / author written into the pack metadata
    #[arg(long)]
    publisher: Option<String>,

    /// Pack identifier (defaults to a slug of the pack name)
    #[arg(long)]
    identifier: Option<String>,

    /// Metadata written next to the stickers
    #[arg(long, value_enum, default_value_t = Protocol::Manifest)]
    protocol: Protocol,

    /// Emoji tag applied to every sticker (repeatable)
    #[arg(long = "emoji")]
    emojis: Vec<String>,

    /// Worker threads for normalization (0 = one per CPU)
    #[arg(long, default_value = "1")]
    jobs: usize,

    /// Directory containing the image folder
    #[arg(long)]
    working_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Protocol {
    /// contents.json manifest
    Manifest,
    /// title.txt and author.txt
    TextFiles,
}

impl From<Protocol> for OutputProtocol {
    fn from(protocol: Protocol) -> Self {
        match protocol {
            Protocol::Manifest => OutputProtocol::Manifest,
            Protocol::TextFiles => OutputProtocol::TextFiles,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let working_dir = match cli.working_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    let mut config = PipelineConfig::new(cli.pack_name);
    config.pack.protocol = cli.protocol.into();
    config.pack.emojis = cli.emojis;
    if let Some(publisher) = cli.publisher {
        config.pack.publisher = publisher;
    }
    if let Some(identifier) = cli.identifier {
        config.pack.identifier = identifier;
    }
    config.normalizer = NormalizerConfig { jobs: cli.jobs };

    println!(
        "Building sticker pack '{}' from {}",
        config.pack.name,
        working_dir.join(&cli.input_folder).display()
    );

    let report = StickerPipeline::new(config)
        .run(&working_dir, &cli.input_folder)
        .context("Failed to build sticker pack")?;

    print_summary(&report);

    Ok(())
}

fn print_summary(report: &PackReport) {
    println!("\n=== Sticker Pack ===");
    println!("Archive: {}", report.archive.path.display());
    println!("Stickers: {}", report.assets.len());
    println!("Tray icon: {}", report.tray_icon.file_name);

    let animated = report.assets.iter().filter(|a| a.kind == AssetKind::AnimatedImage).count();
    if animated > 0 {
        println!("Animated: {}", animated);
    }

    println!("\n=== Archive entries ===");
    for entry in &report.archive.entries {
        println!("  {}", entry);
    }

    if !report.skipped.is_empty() {
        println!("\n=== Skipped ({}) ===", report.skipped.len());
        for skipped in &report.skipped {
            println!("  {}: {}", skipped.path.display(), skipped.reason);
        }
    }
}
