pub mod clahe;
pub mod contours;
pub mod morphology;
pub mod preprocessing;
pub mod threshold;
pub mod tophat;

use image::{DynamicImage, GrayImage, RgbImage};

use crate::config::{LightnessMode, VesselConfig};
use crate::error::{Result, VesselError};
use crate::pipeline::{Stage, StageObserver};
use clahe::ContrastEnhancer;
use contours::BlobFilter;
use preprocessing::{ensure_not_empty, median_blur, replicate_channel, to_lightness};
use threshold::Binarizer;
use tophat::MultiScaleTopHat;

/// Number of non-zero pixels in a mask
pub fn foreground_pixels(mask: &GrayImage) -> usize {
    mask.as_raw().iter().filter(|&&v| v != 0).count()
}

/// Vessel extraction orchestrator.
///
/// Built once from a validated `VesselConfig`; the structuring elements and
/// equalizer settings are fixed for the lifetime of the extractor. `extract`
/// only reads `self`, so one instance can be shared across threads and
/// reused for any number of images.
pub struct VesselExtractor {
    config: VesselConfig,
    enhancer: ContrastEnhancer,
    tophat: MultiScaleTopHat,
    binarizer: Binarizer,
    blob_filter: BlobFilter,
    observer: Option<Box<dyn StageObserver>>,
}

impl VesselExtractor {
    pub fn new(config: VesselConfig) -> Result<Self> {
        config.validate()?;
        tracing::debug!(
            radii = ?config.radii,
            clip_limit = config.clip_limit,
            min_blob_area = config.min_blob_area,
            lightness = ?config.lightness,
            "vessel extractor configured"
        );
        Ok(Self::from_validated(config))
    }

    fn from_validated(config: VesselConfig) -> Self {
        let enhancer = ContrastEnhancer::new(config.clip_limit, config.tile_grid);
        Self {
            tophat: MultiScaleTopHat::new(&config.radii, enhancer.clone()),
            blob_filter: BlobFilter::new(config.min_blob_area),
            binarizer: Binarizer,
            enhancer,
            config,
            observer: None,
        }
    }

    /// Report every intermediate image to `observer`
    pub fn with_observer(mut self, observer: impl StageObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn config(&self) -> &VesselConfig {
        &self.config
    }

    /// Extract from a decoded image, which must be 8-bit RGB
    pub fn extract_dynamic(&self, image: &DynamicImage) -> Result<GrayImage> {
        ensure_not_empty("vessel extraction", image.width(), image.height())?;
        let rgb = image.as_rgb8().ok_or_else(|| {
            VesselError::invalid_input(
                "vessel extraction",
                format!(
                    "expected a 3-channel 8-bit RGB image, got {:?} ({} channels)",
                    image.color(),
                    image.color().channel_count()
                ),
            )
        })?;
        self.extract(rgb)
    }

    /// Produce a 0/255 vessel mask with the same size as `image`
    pub fn extract(&self, image: &RgbImage) -> Result<GrayImage> {
        let (width, height) = image.dimensions();
        ensure_not_empty("vessel extraction", width, height)?;
        tracing::debug!(width, height, "extracting vessels");

        let response = match self.config.lightness {
            LightnessMode::Plain => {
                let lightness = to_lightness(image);
                self.notify_gray(Stage::Lightness, &lightness)?;
                self.tophat.suppress_background(&lightness)?
            }
            LightnessMode::Boosted => {
                let equalized = self.enhancer.enhance(&to_lightness(image));
                let boosted = DynamicImage::ImageRgb8(replicate_channel(&equalized));
                self.notify(Stage::Lightness, &boosted)?;
                self.tophat
                    .suppress_background_in(&boosted, self.config.channel_index)?
            }
        };
        self.notify_gray(Stage::BackgroundSuppressed, &response)?;

        let denoised = median_blur(&response, self.config.median_kernel);
        self.notify_gray(Stage::Denoised, &denoised)?;

        let mask = self.binarizer.binarize(&denoised)?;
        self.notify_gray(Stage::Thresholded, &mask)?;

        let cleaned = self.blob_filter.remove_small_blobs(&mask)?;
        self.notify_gray(Stage::BlobsRemoved, &cleaned)?;

        let smoothed = median_blur(&cleaned, self.config.median_kernel);
        self.notify_gray(Stage::Smoothed, &smoothed)?;

        tracing::debug!(
            foreground = foreground_pixels(&smoothed),
            total = width as u64 * height as u64,
            "vessel mask ready"
        );
        Ok(smoothed)
    }

    fn notify(&self, stage: Stage, image: &DynamicImage) -> Result<()> {
        match &self.observer {
            Some(observer) => observer.observe(stage, image),
            None => Ok(()),
        }
    }

    fn notify_gray(&self, stage: Stage, image: &GrayImage) -> Result<()> {
        match &self.observer {
            Some(observer) => observer.observe(stage, &DynamicImage::ImageLuma8(image.clone())),
            None => Ok(()),
        }
    }
}

impl Default for VesselExtractor {
    fn default() -> Self {
        Self::from_validated(VesselConfig::default())
    }
}
