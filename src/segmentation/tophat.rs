use image::{DynamicImage, GrayImage, Luma};

use super::clahe::ContrastEnhancer;
use super::morphology::{close, open, StructuringElement};
use super::preprocessing::{ensure_not_empty, extract_channel};
use crate::error::Result;

/// Multi-scale background suppression.
///
/// Alternating open/close passes with growing square kernels build a smooth
/// background estimate. Subtracting it from the input leaves structures
/// narrower than the largest kernel, which are then re-equalized.
#[derive(Debug, Clone)]
pub struct MultiScaleTopHat {
    elements: Vec<StructuringElement>,
    enhancer: ContrastEnhancer,
}

impl MultiScaleTopHat {
    /// `radii` must already be strictly increasing (see `VesselConfig::validate`)
    pub fn new(radii: &[u32], enhancer: ContrastEnhancer) -> Self {
        Self {
            elements: radii.iter().map(|&r| StructuringElement::square(r)).collect(),
            enhancer,
        }
    }

    pub fn elements(&self) -> &[StructuringElement] {
        &self.elements
    }

    /// Smoothed background: open then close at each scale, smallest first
    pub fn estimate_background(&self, channel: &GrayImage) -> GrayImage {
        self.elements.iter().fold(channel.clone(), |working, se| {
            let opened = open(&working, se);
            close(&opened, se)
        })
    }

    pub fn suppress_background(&self, channel: &GrayImage) -> Result<GrayImage> {
        ensure_not_empty("background suppression", channel.width(), channel.height())?;

        let background = self.estimate_background(channel);
        let response = GrayImage::from_fn(channel.width(), channel.height(), |x, y| {
            let v = channel.get_pixel(x, y)[0];
            Luma([v.saturating_sub(background.get_pixel(x, y)[0])])
        });

        tracing::debug!(
            scales = self.elements.len(),
            width = channel.width(),
            height = channel.height(),
            peak_response = response.pixels().map(|p| p[0]).max().unwrap_or(0),
            "background suppressed"
        );

        Ok(self.enhancer.enhance(&response))
    }

    /// Run on one designated channel of a grayscale or RGB image
    pub fn suppress_background_in(
        &self,
        img: &DynamicImage,
        channel_index: usize,
    ) -> Result<GrayImage> {
        let channel = extract_channel("background suppression", img, channel_index)?;
        self.suppress_background(&channel)
    }
}
