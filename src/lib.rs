pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod segmentation;

pub use config::{LightnessMode, VesselConfig};
pub use error::{Result, VesselError};
pub use models::{Contour, ContourKind};
pub use pipeline::{DebugDumpObserver, Stage, StageObserver};
pub use segmentation::VesselExtractor;
pub use segmentation::clahe::ContrastEnhancer;
pub use segmentation::contours::{BlobFilter, find_contours, remove_small_blobs};
pub use segmentation::morphology::StructuringElement;
pub use segmentation::threshold::Binarizer;
pub use segmentation::tophat::MultiScaleTopHat;
