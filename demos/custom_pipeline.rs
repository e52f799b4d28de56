use image::{DynamicImage, ImageReader, Rgb, RgbImage};
use std::env;

use vesselmask::segmentation::foreground_pixels;
use vesselmask::{LightnessMode, Stage, VesselConfig, VesselExtractor};

/// Dark-red field with two darker "vessels" crossing it
fn synthetic_fundus() -> RgbImage {
    RgbImage::from_fn(256, 256, |x, y| {
        let on_vessel = (x as i32 - y as i32).abs() < 2 || (120..124).contains(&x);
        if on_vessel {
            Rgb([200, 120, 90])
        } else {
            Rgb([120, 50, 30])
        }
    })
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let img = match args.get(1) {
        Some(path) => ImageReader::open(path)?
            .decode()
            .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?
            .to_rgb8(),
        None => synthetic_fundus(),
    };

    println!("Loaded image: {}x{}", img.width(), img.height());

    // Example 1: Default configuration, printing each stage as it completes
    println!("\n=== Default Pipeline ===");
    let extractor = VesselExtractor::new(VesselConfig::default())?.with_observer(
        |stage: Stage, image: &DynamicImage| -> vesselmask::Result<()> {
            println!(
                "  {:02} {:<24} {}x{} {:?}",
                stage.index(),
                stage.name(),
                image.width(),
                image.height(),
                image.color()
            );
            Ok(())
        },
    );
    let mask = extractor.extract(&img)?;
    println!("Foreground pixels: {}", foreground_pixels(&mask));

    // Example 2: Plain lightness and a stricter blob filter
    println!("\n=== Custom Pipeline (Plain Lightness, Larger Blobs Only) ===");
    let custom = VesselExtractor::new(
        VesselConfig::new()
            .with_lightness(LightnessMode::Plain)
            .with_min_blob_area(100.0),
    )?;
    let custom_mask = custom.extract(&img)?;
    println!("Foreground pixels: {}", foreground_pixels(&custom_mask));

    // Example 3: A radius set that is not strictly increasing is rejected
    println!("\n=== Invalid Configuration ===");
    match VesselExtractor::new(VesselConfig::new().with_radii(vec![11, 5, 2])) {
        Ok(_) => println!("unexpectedly accepted"),
        Err(e) => println!("rejected: {}", e),
    }

    Ok(())
}
