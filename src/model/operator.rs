use super::blur::PsfBlurModule;
use super::downsampling::DownsamplingModule;
use super::matrix::probe_matrix;
use super::motion::MotionModule;
use super::noise::AdditiveNoiseModule;
use crate::image::ImageData;
use crate::types::ImageSize;
use nalgebra::DMatrix;

/// One stage of the image formation model.
///
/// Every variant supports a forward pass (physical degradation of frame
/// `index`) and the exact linear-algebraic transpose of that pass, which the
/// objective uses to push residuals back to HR pixels. Operators only hold
/// construction parameters and can be shared freely across frames and threads.
#[derive(Clone, Debug, PartialEq)]
pub enum DegradationOperator {
    AdditiveNoise(AdditiveNoiseModule),
    PsfBlur(PsfBlurModule),
    Downsampling(DownsamplingModule),
    Motion(MotionModule),
}

impl DegradationOperator {
    /// Degrade `image` in place as observed in frame `index`.
    pub fn apply(&self, image: &mut ImageData, index: usize) {
        match self {
            Self::AdditiveNoise(op) => op.apply(image, index),
            Self::PsfBlur(op) => op.apply(image),
            Self::Downsampling(op) => op.apply(image),
            Self::Motion(op) => op.apply(image, index),
        }
    }

    /// Apply the adjoint of [`apply`](Self::apply) in place.
    ///
    /// `input_size` is the size of the image the forward pass consumed; the
    /// result always has that size.
    pub fn apply_transpose(&self, image: &mut ImageData, index: usize, input_size: ImageSize) {
        match self {
            Self::AdditiveNoise(op) => op.apply_transpose(image),
            Self::PsfBlur(op) => op.apply_transpose(image),
            Self::Downsampling(op) => op.apply_transpose(image, input_size),
            Self::Motion(op) => op.apply_transpose(image, index),
        }
    }

    /// Spatial size produced by the forward pass for an input of `input_size`.
    pub fn output_size(&self, input_size: ImageSize) -> ImageSize {
        match self {
            Self::Downsampling(op) => op.output_size(input_size),
            _ => input_size,
        }
    }

    /// Decimation factor contributed by this stage (1 unless it downsamples).
    pub fn downsampling_scale(&self) -> usize {
        match self {
            Self::Downsampling(op) => op.scale(),
            _ => 1,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::AdditiveNoise(_) => "additive_noise",
            Self::PsfBlur(_) => "psf_blur",
            Self::Downsampling(_) => "downsampling",
            Self::Motion(_) => "motion",
        }
    }

    /// Dense single-channel matrix `M` with `M * vec(image) == vec(apply(image))`,
    /// sized `(output pixels × input pixels)`. Noise contributes the identity.
    ///
    /// Quadratic in the pixel count; meant for verification on small images.
    pub fn operator_matrix(&self, size: ImageSize, index: usize) -> DMatrix<f64> {
        if let Self::AdditiveNoise(_) = self {
            let n = size.pixel_count();
            return DMatrix::identity(n, n);
        }
        probe_matrix(size, self.output_size(size), |image| {
            self.apply(image, index)
        })
    }

    /// Dense matrix of [`apply_transpose`](Self::apply_transpose), sized
    /// `(input pixels × output pixels)`.
    pub fn transpose_matrix(&self, size: ImageSize, index: usize) -> DMatrix<f64> {
        probe_matrix(self.output_size(size), size, |image| {
            self.apply_transpose(image, index, size)
        })
    }
}

impl From<AdditiveNoiseModule> for DegradationOperator {
    fn from(op: AdditiveNoiseModule) -> Self {
        Self::AdditiveNoise(op)
    }
}

impl From<PsfBlurModule> for DegradationOperator {
    fn from(op: PsfBlurModule) -> Self {
        Self::PsfBlur(op)
    }
}

impl From<DownsamplingModule> for DegradationOperator {
    fn from(op: DownsamplingModule) -> Self {
        Self::Downsampling(op)
    }
}

impl From<MotionModule> for DegradationOperator {
    fn from(op: MotionModule) -> Self {
        Self::Motion(op)
    }
}
