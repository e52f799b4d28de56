use std::sync::OnceLock;

use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use imageproc::filter::median_filter;

use crate::error::{Result, VesselError};

// sRGB byte -> linear intensity in 0..1
static SRGB_TO_LINEAR: OnceLock<[f32; 256]> = OnceLock::new();

fn srgb_to_linear(value: u8) -> f32 {
    let table = SRGB_TO_LINEAR.get_or_init(|| {
        let mut table = [0.0f32; 256];
        for (i, entry) in table.iter_mut().enumerate() {
            let v = i as f32 / 255.0;
            *entry = if v <= 0.04045 {
                v / 12.92
            } else {
                ((v + 0.055) / 1.055).powf(2.4)
            };
        }
        table
    });
    table[value as usize]
}

/// Fail with `InvalidInput` if either dimension is zero
pub fn ensure_not_empty(stage: &'static str, width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(VesselError::invalid_input(
            stage,
            format!("image has zero size ({}x{})", width, height),
        ));
    }
    Ok(())
}

/// CIE L* of every pixel (D65 white), rescaled from 0..100 to 0..255
pub fn to_lightness(img: &RgbImage) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let Rgb([r, g, b]) = *img.get_pixel(x, y);
        let luminance = 0.212671 * srgb_to_linear(r)
            + 0.715160 * srgb_to_linear(g)
            + 0.072169 * srgb_to_linear(b);
        let lightness = if luminance > 0.008856 {
            116.0 * luminance.cbrt() - 16.0
        } else {
            903.3 * luminance
        };
        Luma([(lightness * 255.0 / 100.0).round().clamp(0.0, 255.0) as u8])
    })
}

/// Copy one channel into all three channels of an RGB image
pub fn replicate_channel(img: &GrayImage) -> RgbImage {
    RgbImage::from_fn(img.width(), img.height(), |x, y| {
        let v = img.get_pixel(x, y)[0];
        Rgb([v, v, v])
    })
}

/// Pull a single 8-bit channel out of a grayscale or RGB image
pub fn extract_channel(
    stage: &'static str,
    img: &DynamicImage,
    channel_index: usize,
) -> Result<GrayImage> {
    ensure_not_empty(stage, img.width(), img.height())?;
    let channels = img.color().channel_count() as usize;
    if channel_index >= channels {
        return Err(VesselError::invalid_input(
            stage,
            format!(
                "channel index {} out of range for a {}-channel image",
                channel_index, channels
            ),
        ));
    }

    match img {
        DynamicImage::ImageLuma8(gray) => Ok(gray.clone()),
        DynamicImage::ImageRgb8(rgb) => Ok(GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
            Luma([rgb.get_pixel(x, y)[channel_index]])
        })),
        other => Err(VesselError::invalid_input(
            stage,
            format!("unsupported pixel layout {:?}", other.color()),
        )),
    }
}

/// Borrow the single channel of an image, rejecting anything multi-channel
pub fn require_gray<'a>(stage: &'static str, img: &'a DynamicImage) -> Result<&'a GrayImage> {
    ensure_not_empty(stage, img.width(), img.height())?;
    img.as_luma8().ok_or_else(|| {
        VesselError::invalid_input(
            stage,
            format!(
                "expected a single-channel 8-bit image, got {:?} ({} channels)",
                img.color(),
                img.color().channel_count()
            ),
        )
    })
}

/// Square median blur; `kernel` is the (odd) window side
pub fn median_blur(img: &GrayImage, kernel: u32) -> GrayImage {
    let radius = kernel / 2;
    median_filter(img, radius, radius)
}
