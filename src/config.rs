use crate::error::{Result, VesselError};

/// How the lightness channel is prepared before background suppression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightnessMode {
    /// Feed the raw L* channel to the top-hat cascade
    Plain,
    /// Equalize L*, replicate it to three channels and read back one channel
    #[default]
    Boosted,
}

/// Algorithm constants for vessel extraction.
///
/// Fixed once the extractor is built. The defaults are the tuned values the
/// extraction was designed around; the builder methods exist so callers (and
/// the CLI) can experiment without editing code.
#[derive(Debug, Clone, PartialEq)]
pub struct VesselConfig {
    /// Structuring-element radii, strictly increasing
    pub radii: Vec<u32>,
    /// CLAHE clip limit, as a multiple of the average bin count
    pub clip_limit: f32,
    /// CLAHE tile grid (columns, rows)
    pub tile_grid: (u32, u32),
    /// Outer contours enclosing less than this many square pixels are erased
    pub min_blob_area: f64,
    /// Side of the square median-blur window
    pub median_kernel: u32,
    pub lightness: LightnessMode,
    /// Channel the top-hat cascade reads from a boosted (three-channel) image
    pub channel_index: usize,
}

impl Default for VesselConfig {
    fn default() -> Self {
        Self {
            radii: vec![2, 5, 11],
            clip_limit: 3.0,
            tile_grid: (8, 8),
            min_blob_area: 25.0,
            median_kernel: 3,
            lightness: LightnessMode::Boosted,
            channel_index: 0,
        }
    }
}

impl VesselConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_radii(mut self, radii: impl Into<Vec<u32>>) -> Self {
        self.radii = radii.into();
        self
    }

    pub fn with_clip_limit(mut self, clip_limit: f32) -> Self {
        self.clip_limit = clip_limit;
        self
    }

    pub fn with_tile_grid(mut self, columns: u32, rows: u32) -> Self {
        self.tile_grid = (columns, rows);
        self
    }

    pub fn with_min_blob_area(mut self, min_blob_area: f64) -> Self {
        self.min_blob_area = min_blob_area;
        self
    }

    pub fn with_median_kernel(mut self, median_kernel: u32) -> Self {
        self.median_kernel = median_kernel;
        self
    }

    pub fn with_lightness(mut self, lightness: LightnessMode) -> Self {
        self.lightness = lightness;
        self
    }

    pub fn with_channel_index(mut self, channel_index: usize) -> Self {
        self.channel_index = channel_index;
        self
    }

    /// Check every constant, returning the first violation found
    pub fn validate(&self) -> Result<()> {
        if self.radii.is_empty() {
            return Err(VesselError::invalid_config(
                "radii",
                "at least one structuring-element radius is required",
            ));
        }
        if self.radii.contains(&0) {
            return Err(VesselError::invalid_config(
                "radii",
                "structuring-element radius must be at least 1",
            ));
        }
        if let Some(pair) = self.radii.windows(2).find(|w| w[0] >= w[1]) {
            return Err(VesselError::invalid_config(
                "radii",
                format!(
                    "radii must be strictly increasing, found {} followed by {}",
                    pair[0], pair[1]
                ),
            ));
        }
        if !self.clip_limit.is_finite() || self.clip_limit <= 0.0 {
            return Err(VesselError::invalid_config(
                "clip_limit",
                format!("must be a positive number, got {}", self.clip_limit),
            ));
        }
        if self.tile_grid.0 == 0 || self.tile_grid.1 == 0 {
            return Err(VesselError::invalid_config(
                "tile_grid",
                format!("must be non-zero, got {}x{}", self.tile_grid.0, self.tile_grid.1),
            ));
        }
        if !self.min_blob_area.is_finite() || self.min_blob_area < 0.0 {
            return Err(VesselError::invalid_config(
                "min_blob_area",
                format!("must be a non-negative number, got {}", self.min_blob_area),
            ));
        }
        if self.median_kernel == 0 || self.median_kernel % 2 == 0 {
            return Err(VesselError::invalid_config(
                "median_kernel",
                format!("must be odd, got {}", self.median_kernel),
            ));
        }
        if self.channel_index > 2 {
            return Err(VesselError::invalid_config(
                "channel_index",
                format!("boosted lightness has 3 channels, got index {}", self.channel_index),
            ));
        }
        Ok(())
    }
}
