mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from vesselmask for tests
pub use vesselmask::segmentation::foreground_pixels;
pub use vesselmask::{
    Binarizer, BlobFilter, ContrastEnhancer, DebugDumpObserver, LightnessMode, MultiScaleTopHat,
    Stage, StageObserver, VesselConfig, VesselError, VesselExtractor, remove_small_blobs,
};
