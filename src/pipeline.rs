use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use image::DynamicImage;

use crate::error::{Result, VesselError};

/// Named steps of vessel extraction, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Lightness,
    BackgroundSuppressed,
    Denoised,
    Thresholded,
    BlobsRemoved,
    Smoothed,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Lightness,
        Stage::BackgroundSuppressed,
        Stage::Denoised,
        Stage::Thresholded,
        Stage::BlobsRemoved,
        Stage::Smoothed,
    ];

    /// 1-based position in the pipeline
    pub fn index(&self) -> usize {
        match self {
            Stage::Lightness => 1,
            Stage::BackgroundSuppressed => 2,
            Stage::Denoised => 3,
            Stage::Thresholded => 4,
            Stage::BlobsRemoved => 5,
            Stage::Smoothed => 6,
        }
    }

    /// Human-readable name for this stage (used in log output)
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Lightness => "Lightness",
            Stage::BackgroundSuppressed => "Background Suppression",
            Stage::Denoised => "Median Denoise",
            Stage::Thresholded => "Mean Threshold",
            Stage::BlobsRemoved => "Blob Removal",
            Stage::Smoothed => "Median Smoothing",
        }
    }

    /// File-name friendly form of `name`, e.g. "mean_threshold"
    pub fn slug(&self) -> String {
        self.name().to_lowercase().replace(' ', "_")
    }
}

/// Receives every intermediate image produced by the extractor.
///
/// Observers are injected once at construction; the extractor calls them
/// after each stage and aborts the run if one returns an error.
pub trait StageObserver: Send + Sync {
    fn observe(&self, stage: Stage, image: &DynamicImage) -> Result<()>;
}

impl<F> StageObserver for F
where
    F: Fn(Stage, &DynamicImage) -> Result<()> + Send + Sync,
{
    fn observe(&self, stage: Stage, image: &DynamicImage) -> Result<()> {
        self(stage, image)
    }
}

/// Writes each intermediate image as a PNG under an output directory.
///
/// Every extraction run gets its own numbered sub-directory:
///
/// ```text
/// debug/
///   01/01_lightness.png
///   01/02_background_suppression.png
///   ...
///   02/01_lightness.png
/// ```
#[derive(Debug)]
pub struct DebugDumpObserver {
    output_dir: PathBuf,
    runs: AtomicUsize,
}

impl DebugDumpObserver {
    /// The directory must be empty or non-existent
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(VesselError::invalid_config(
                    "debug_output_dir",
                    format!("directory is not empty: {}", output_dir.display()),
                ));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        Ok(Self {
            output_dir,
            runs: AtomicUsize::new(0),
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn run_dir(&self, stage: Stage) -> PathBuf {
        // The first stage opens a new run
        let run = if stage == Stage::ALL[0] {
            self.runs.fetch_add(1, Ordering::SeqCst) + 1
        } else {
            self.runs.load(Ordering::SeqCst).max(1)
        };
        self.output_dir.join(format!("{:02}", run))
    }
}

impl StageObserver for DebugDumpObserver {
    fn observe(&self, stage: Stage, image: &DynamicImage) -> Result<()> {
        let run_dir = self.run_dir(stage);
        std::fs::create_dir_all(&run_dir)?;

        let filename = format!("{:02}_{}.png", stage.index(), stage.slug());
        let path = run_dir.join(&filename);
        image.save(&path)?;

        tracing::debug!(path = %path.display(), "saved debug image");
        Ok(())
    }
}
