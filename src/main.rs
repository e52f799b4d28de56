use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{CommandFactory, Parser};
use image::{DynamicImage, GrayImage, ImageReader, RgbImage};
use tracing_subscriber::EnvFilter;

use vesselmask::{DebugDumpObserver, LightnessMode, VesselConfig, VesselExtractor};

#[derive(Parser)]
#[command(name = "vesselmask")]
#[command(about = "Extract a binary vessel mask from colour fundus photographs")]
struct Cli {
    /// Input and output image paths, given in pairs
    #[arg(value_name = "INPUT OUTPUT")]
    images: Vec<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Save every intermediate stage to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Write only the mask instead of an input|mask side-by-side image
    #[arg(long)]
    mask_only: bool,

    /// Use the raw lightness channel without the initial equalization
    #[arg(long)]
    plain_lightness: bool,

    /// Structuring-element radii, strictly increasing
    #[arg(long, value_delimiter = ',', default_values_t = vec![2u32, 5, 11])]
    radii: Vec<u32>,

    /// CLAHE clip limit
    #[arg(long, default_value_t = 3.0)]
    clip_limit: f32,

    /// Regions enclosing less area than this (pixels²) are removed
    #[arg(long, default_value_t = 25.0)]
    min_blob_area: f64,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if args.images.is_empty() {
        Cli::command().print_help()?;
        return Ok(());
    }
    if args.images.len() % 2 == 1 {
        anyhow::bail!(
            "wrong number of arguments: expected INPUT OUTPUT pairs, got {} paths",
            args.images.len()
        );
    }

    let config = VesselConfig::new()
        .with_radii(args.radii.clone())
        .with_clip_limit(args.clip_limit)
        .with_min_blob_area(args.min_blob_area)
        .with_lightness(if args.plain_lightness {
            LightnessMode::Plain
        } else {
            LightnessMode::Boosted
        });

    let mut extractor = VesselExtractor::new(config).context("invalid pipeline configuration")?;
    if let Some(debug_dir) = &args.debug_out {
        let observer = DebugDumpObserver::new(debug_dir)
            .with_context(|| format!("cannot use debug directory {}", debug_dir.display()))?;
        extractor = extractor.with_observer(observer);
    }

    let pairs: Vec<(&Path, &Path)> = args
        .images
        .chunks(2)
        .map(|pair| (pair[0].as_path(), pair[1].as_path()))
        .collect();

    let mut failures = 0;
    for (input, output) in &pairs {
        match process_image(&extractor, input, output, args.mask_only) {
            Ok(()) => tracing::info!("{} -> {}", input.display(), output.display()),
            Err(e) => {
                failures += 1;
                tracing::error!("{}: {:#}", input.display(), e);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} images failed", failures, pairs.len());
    }
    Ok(())
}

/// Read an image, extract its vessel mask and write the result
fn process_image(
    extractor: &VesselExtractor,
    input: &Path,
    output: &Path,
    mask_only: bool,
) -> anyhow::Result<()> {
    if !input.exists() {
        anyhow::bail!("input does not exist");
    }

    let img = ImageReader::open(input)?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;
    tracing::debug!("Image loaded: {}x{}", img.width(), img.height());

    let rgb = img.to_rgb8();
    let mask = extractor.extract(&rgb)?;

    let result = if mask_only {
        DynamicImage::ImageLuma8(mask)
    } else {
        DynamicImage::ImageRgb8(two_up(&rgb, &mask))
    };
    result
        .save(output)
        .with_context(|| format!("failed to write {}", output.display()))?;

    if !output.exists() {
        anyhow::bail!("failed to write {}", output.display());
    }
    Ok(())
}

/// Input on the left, mask (as RGB) on the right
fn two_up(input: &RgbImage, mask: &GrayImage) -> RgbImage {
    let mut canvas = RgbImage::new(input.width() + mask.width(), input.height().max(mask.height()));
    let mask_rgb = DynamicImage::ImageLuma8(mask.clone()).to_rgb8();
    image::imageops::overlay(&mut canvas, input, 0, 0);
    image::imageops::overlay(&mut canvas, &mask_rgb, input.width().into(), 0);
    canvas
}
