use thiserror::Error;

/// Errors raised while building or running the vessel extraction pipeline.
#[derive(Debug, Error)]
pub enum VesselError {
    #[error("invalid input to {stage}: {reason}")]
    InvalidInput { stage: &'static str, reason: String },

    #[error("invalid configuration for {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("stage observer failed: {0}")]
    Observer(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl VesselError {
    pub(crate) fn invalid_input(stage: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            stage,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, VesselError>;
