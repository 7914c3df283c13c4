use super::filters::{apply_zero_padded, GaussianFilter, SeparableFilter};
use crate::error::ModelError;
use crate::image::ImageData;

/// Point-spread-function blur: a `blur_radius × blur_radius` Gaussian kernel
/// applied independently to every channel.
///
/// The kernel is symmetric and borders are zero padded, so the operator is
/// self-adjoint and the transpose is the same blur.
#[derive(Clone, Debug, PartialEq)]
pub struct PsfBlurModule {
    blur_radius: usize,
    sigma: f64,
    filter: GaussianFilter,
}

impl PsfBlurModule {
    /// `blur_radius` is the kernel width in pixels and must be odd.
    pub fn new(blur_radius: usize, sigma: f64) -> Result<Self, ModelError> {
        if blur_radius == 0 || blur_radius % 2 == 0 {
            return Err(ModelError::InvalidBlurRadius(blur_radius));
        }
        if !(sigma > 0.0 && sigma.is_finite()) {
            return Err(ModelError::InvalidBlurSigma(sigma));
        }
        Ok(Self {
            blur_radius,
            sigma,
            filter: GaussianFilter::new(blur_radius, sigma),
        })
    }

    pub fn blur_radius(&self) -> usize {
        self.blur_radius
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn kernel_taps(&self) -> &[f64] {
        self.filter.taps()
    }

    pub fn apply(&self, image: &mut ImageData) {
        image.map_channels(|plane| apply_zero_padded(&self.filter, plane));
    }

    pub fn apply_transpose(&self, image: &mut ImageData) {
        self.apply(image);
    }
}
