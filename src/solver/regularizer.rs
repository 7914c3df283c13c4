use crate::types::ImageSize;

/// Prior term of the MAP objective, seen as a residual generator.
///
/// Implementations return one residual per regularizer-defined unit (usually
/// one per pixel) for a flat single-channel HR buffer. The caller weights them
/// with the regularization parameter; implementations stay unweighted and hold
/// no state about the estimate.
pub trait Regularizer {
    /// HR image size the regularizer was built for.
    fn image_size(&self) -> ImageSize;

    fn compute_residuals(&self, image_data: &[f64]) -> Vec<f64>;
}
