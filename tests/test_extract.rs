mod common;

use common::*;
use image::{DynamicImage, GrayImage, Luma, RgbImage, RgbaImage};

#[test]
fn test_line_survives_and_speck_is_removed() -> anyhow::Result<()> {
    let img = line_and_speck_image();
    let mask = VesselExtractor::default().extract(&img)?;

    for y in 0..img.height() {
        for x in LINE_COLUMNS {
            assert_eq!(mask.get_pixel(x, y)[0], 255, "line pixel ({}, {})", x, y);
        }
    }

    let (sx, sy) = SPECK_ORIGIN;
    for y in sy..sy + 2 {
        for x in sx..sx + 2 {
            assert_eq!(mask.get_pixel(x, y)[0], 0, "speck pixel ({}, {})", x, y);
        }
    }

    // Nothing but the line is left
    assert_eq!(foreground_pixels(&mask), 3 * img.height() as usize);
    Ok(())
}

#[test]
fn test_plain_lightness_keeps_line() -> anyhow::Result<()> {
    let extractor = VesselExtractor::new(VesselConfig::new().with_lightness(LightnessMode::Plain))?;
    let mask = extractor.extract(&line_and_speck_image())?;
    assert!((0..64).all(|y| mask.get_pixel(31, y)[0] == 255));
    let (sx, sy) = SPECK_ORIGIN;
    assert_eq!(mask.get_pixel(sx, sy)[0], 0);
    Ok(())
}

#[test]
fn test_all_black_gives_empty_mask() -> anyhow::Result<()> {
    let extractor = VesselExtractor::default();
    for (w, h) in [(1, 1), (7, 3), (64, 64), (100, 37)] {
        let img = RgbImage::new(w, h);
        let mask = extractor.extract(&img)?;
        assert_eq!(mask.dimensions(), (w, h));
        assert_eq!(foreground_pixels(&mask), 0, "{}x{}", w, h);
    }
    Ok(())
}

#[test]
fn test_mask_shape_and_values() -> anyhow::Result<()> {
    let extractor = VesselExtractor::default();
    let inputs = [
        noise_image(48, 40, 7),
        noise_image(13, 29, 99),
        fundus_like_image(120, 96),
        line_and_speck_image(),
    ];
    for img in &inputs {
        let mask = extractor.extract(img)?;
        assert_eq!(mask.dimensions(), img.dimensions());
        assert!(is_binary(&mask));
    }
    Ok(())
}

#[test]
fn test_repeated_extraction_is_identical() -> anyhow::Result<()> {
    let extractor = VesselExtractor::default();
    let img = fundus_like_image(96, 96);
    let first = extractor.extract(&img)?;
    // Run something else in between to catch any carried-over state
    extractor.extract(&noise_image(50, 50, 3))?;
    let second = extractor.extract(&img)?;
    assert_eq!(first.as_raw(), second.as_raw());
    Ok(())
}

#[test]
fn test_shared_across_threads() -> anyhow::Result<()> {
    let extractor = VesselExtractor::default();
    let img = fundus_like_image(80, 64);
    let expected = extractor.extract(&img)?;

    let results: Vec<GrayImage> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| extractor.extract(&img)))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("worker panicked"))
            .collect::<Result<_, _>>()
    })?;

    assert!(results.iter().all(|mask| mask == &expected));
    Ok(())
}

#[test]
fn test_rejects_malformed_input() {
    let extractor = VesselExtractor::default();

    assert!(matches!(
        extractor.extract(&RgbImage::new(0, 0)),
        Err(VesselError::InvalidInput { .. })
    ));
    assert!(matches!(
        extractor.extract(&RgbImage::new(10, 0)),
        Err(VesselError::InvalidInput { .. })
    ));

    let gray = DynamicImage::ImageLuma8(GrayImage::from_pixel(8, 8, Luma([100])));
    assert!(matches!(
        extractor.extract_dynamic(&gray),
        Err(VesselError::InvalidInput { .. })
    ));

    let rgba = DynamicImage::ImageRgba8(RgbaImage::new(8, 8));
    assert!(matches!(
        extractor.extract_dynamic(&rgba),
        Err(VesselError::InvalidInput { .. })
    ));

    let rgb = DynamicImage::ImageRgb8(line_and_speck_image());
    assert!(extractor.extract_dynamic(&rgb).is_ok());
}

#[test]
fn test_rejects_invalid_config() {
    let unordered = VesselConfig::new().with_radii(vec![11, 5, 2]);
    assert!(matches!(
        VesselExtractor::new(unordered),
        Err(VesselError::InvalidConfig { field: "radii", .. })
    ));
    assert!(VesselExtractor::new(VesselConfig::new().with_clip_limit(-3.0)).is_err());
}
