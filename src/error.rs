use thiserror::Error;

use crate::processing::layout::{CaptureRegion, Dimensions};

/// Library error type for card-camera operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Aspect ratios must be positive and finite.
    #[error("invalid aspect ratio: {0} (must be positive and finite)")]
    InvalidAspectRatio(f64),

    /// Capture was requested before the media or container had a size.
    #[error("capture region is empty")]
    EmptyRegion,

    /// The requested region does not lie inside the frame.
    #[error("capture region {region:?} exceeds frame {frame:?}")]
    RegionOutOfBounds {
        region: CaptureRegion,
        frame: Dimensions,
    },

    /// Pixel resampling failed.
    #[error("resize error: {0}")]
    Resize(String),
}
