use crate::core_modules::pixel::pixel::Hsv;
use thiserror::Error;

/// Every failure the tracking library can report.
///
/// Per-frame anomalies (no contour, zero-mass contour) are not errors; they
/// are absorbed by the blob selector and recorded as absent trail entries.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("video source unavailable: {0}")]
    SourceUnavailable(String),
    #[error("failed to read frame: {0}")]
    Source(String),
    #[error("display failure: {0}")]
    Display(String),
    #[error("invalid color range: lower bound {lower:?} exceeds upper bound {upper:?}")]
    InvalidColorRange { lower: Hsv, upper: Hsv },
    #[error("trail capacity must be at least 1")]
    InvalidCapacity,
    #[error("frame width must be at least 1 pixel")]
    InvalidWidth,
    #[error("blur sigma must be positive, got {0}")]
    InvalidBlurSigma(f32),
    #[error("minimum marker radius must be a finite, non-negative number, got {0}")]
    InvalidMinRadius(f64),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
