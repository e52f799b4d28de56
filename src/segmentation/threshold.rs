use image::{DynamicImage, GrayImage, Luma};

use super::preprocessing::{ensure_not_empty, require_gray};
use crate::error::Result;

/// Global mean of all samples
pub fn mean_intensity(channel: &GrayImage) -> f64 {
    let count = channel.width() as u64 * channel.height() as u64;
    if count == 0 {
        return 0.0;
    }
    let sum: u64 = channel.as_raw().iter().map(|&v| v as u64).sum();
    sum as f64 / count as f64
}

/// Mean-threshold binarization.
///
/// Pixels strictly above the channel mean become 255, all others 0. A
/// uniform channel has no pixel above its own mean and yields an
/// all-background mask.
#[derive(Debug, Clone, Copy, Default)]
pub struct Binarizer;

impl Binarizer {
    pub fn binarize(&self, channel: &GrayImage) -> Result<GrayImage> {
        ensure_not_empty("binarization", channel.width(), channel.height())?;

        let threshold = mean_intensity(channel);
        let mask = GrayImage::from_fn(channel.width(), channel.height(), |x, y| {
            if channel.get_pixel(x, y)[0] as f64 > threshold {
                Luma([255])
            } else {
                Luma([0])
            }
        });

        tracing::debug!(threshold, "binarized at mean intensity");
        Ok(mask)
    }

    pub fn binarize_dynamic(&self, img: &DynamicImage) -> Result<GrayImage> {
        self.binarize(require_gray("binarization", img)?)
    }
}
