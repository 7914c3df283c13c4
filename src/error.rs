use thiserror::Error;

use crate::types::ImageSize;

/// Errors raised while assembling images, operators, models or objectives.
///
/// All of them describe a malformed definition. None is transient, so callers
/// are expected to fix the input rather than retry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("cannot build a data term with 0 observations")]
    NoObservations,
    #[error("invalid channel range [{start}, {end}) for an observation with {available} channels")]
    InvalidChannelRange {
        start: usize,
        end: usize,
        available: usize,
    },
    #[error("blur radius must be an odd number >= 1, got {0}")]
    InvalidBlurRadius(usize),
    #[error("blur sigma must be positive, got {0}")]
    InvalidBlurSigma(f64),
    #[error("noise sigma must be positive, got {0}")]
    InvalidNoiseSigma(f64),
    #[error("downsampling scale must be >= 1, got {0}")]
    InvalidScale(usize),
    #[error("regularization parameter must be finite and >= 0, got {0}")]
    InvalidRegularizationParameter(f64),
    #[error("image data needs at least one channel")]
    NoChannels,
    #[error("raw buffer holds {actual} values, expected {expected}")]
    DataLength { expected: usize, actual: usize },
    #[error("channel of size {actual} does not match image size {expected}")]
    ChannelSize {
        expected: ImageSize,
        actual: ImageSize,
    },
}
