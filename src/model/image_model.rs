use super::matrix::probe_matrix;
use super::operator::DegradationOperator;
use crate::image::ImageData;
use crate::types::ImageSize;
use log::debug;
use nalgebra::DMatrix;

/// Forward image formation model: an ordered chain of degradation operators.
///
/// The forward pass runs the chain front to back. The adjoint of
/// `A ∘ B ∘ C` is `Cᵀ ∘ Bᵀ ∘ Aᵀ`, so [`apply_transpose`](Self::apply_transpose)
/// runs the operator adjoints back to front. An empty chain is the identity.
///
/// The chain is fixed once built: operators are added only through the
/// consuming [`with_operator`](Self::with_operator) builder.
///
/// ```compile_fail
/// use super_resolution::model::{DownsamplingModule, ImageModel};
///
/// let mut model = ImageModel::default();
/// model.add_operator(DownsamplingModule::new(2).unwrap());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImageModel {
    operators: Vec<DegradationOperator>,
}

impl ImageModel {
    pub fn new(operators: Vec<DegradationOperator>) -> Self {
        debug!(
            "ImageModel: {} operators [{}], scale={}",
            operators.len(),
            operators.iter().map(|op| op.name()).collect::<Vec<_>>().join(", "),
            operators.iter().map(|op| op.downsampling_scale()).product::<usize>()
        );
        Self { operators }
    }

    fn add_operator(&mut self, operator: impl Into<DegradationOperator>) {
        self.operators.push(operator.into());
    }

    /// Append an operator to the end of the chain.
    pub fn with_operator(mut self, operator: impl Into<DegradationOperator>) -> Self {
        self.add_operator(operator);
        self
    }

    pub fn operators(&self) -> &[DegradationOperator] {
        &self.operators
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Degrade `image` (HR) into the simulated observation of frame `index`.
    pub fn apply(&self, image: &mut ImageData, index: usize) {
        for operator in &self.operators {
            operator.apply(image, index);
        }
    }

    /// Apply the model adjoint to an image of the model's output size. The
    /// result has `hr_size`.
    pub fn apply_transpose(&self, image: &mut ImageData, index: usize, hr_size: ImageSize) {
        let input_sizes = self.stage_input_sizes(hr_size);
        for (operator, &input_size) in self.operators.iter().zip(&input_sizes).rev() {
            operator.apply_transpose(image, index, input_size);
        }
    }

    /// Same chain without the noise stages, for use inside an objective.
    pub fn without_noise(&self) -> Self {
        self.operators
            .iter()
            .filter(|op| !matches!(op, DegradationOperator::AdditiveNoise(_)))
            .cloned()
            .collect()
    }

    /// Product of all decimation factors; 1 when nothing downsamples.
    pub fn downsampling_scale(&self) -> usize {
        self.operators
            .iter()
            .map(DegradationOperator::downsampling_scale)
            .product()
    }

    /// Size of the simulated observation for an HR image of `hr_size`.
    pub fn output_size(&self, hr_size: ImageSize) -> ImageSize {
        self.operators
            .iter()
            .fold(hr_size, |size, op| op.output_size(size))
    }

    /// Dense single-channel matrix of the whole forward chain, `M_n ⋯ M_1`.
    pub fn operator_matrix(&self, hr_size: ImageSize, index: usize) -> DMatrix<f64> {
        let n = hr_size.pixel_count();
        let mut size = hr_size;
        let mut matrix = DMatrix::identity(n, n);
        for operator in &self.operators {
            matrix = operator.operator_matrix(size, index) * matrix;
            size = operator.output_size(size);
        }
        matrix
    }

    /// Dense matrix of [`apply_transpose`](Self::apply_transpose).
    pub fn transpose_matrix(&self, hr_size: ImageSize, index: usize) -> DMatrix<f64> {
        probe_matrix(self.output_size(hr_size), hr_size, |image| {
            self.apply_transpose(image, index, hr_size)
        })
    }

    fn stage_input_sizes(&self, hr_size: ImageSize) -> Vec<ImageSize> {
        let mut sizes = Vec::with_capacity(self.operators.len());
        let mut size = hr_size;
        for operator in &self.operators {
            sizes.push(size);
            size = operator.output_size(size);
        }
        sizes
    }
}

impl FromIterator<DegradationOperator> for ImageModel {
    fn from_iter<T: IntoIterator<Item = DegradationOperator>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DownsamplingModule, PsfBlurModule};

    #[test]
    fn empty_model_is_identity_with_unit_scale() {
        let model = ImageModel::default();
        assert_eq!(model.downsampling_scale(), 1);
        let data: Vec<f64> = (0..6).map(f64::from).collect();
        let size = ImageSize::new(3, 2);
        let mut image = ImageData::from_raw(&data, size, 1).unwrap();
        model.apply(&mut image, 0);
        assert_eq!(image.to_vec(), data);
        model.apply_transpose(&mut image, 0, size);
        assert_eq!(image.to_vec(), data);
    }

    #[test]
    fn builder_keeps_operator_order() {
        let model = ImageModel::default()
            .with_operator(PsfBlurModule::new(3, 1.0).unwrap())
            .with_operator(DownsamplingModule::new(2).unwrap());
        let names: Vec<_> = model.operators().iter().map(|op| op.name()).collect();
        assert_eq!(names, vec!["psf_blur", "downsampling"]);
    }

    #[test]
    fn scale_is_product_of_decimations() {
        let model = ImageModel::default()
            .with_operator(DownsamplingModule::new(2).unwrap())
            .with_operator(PsfBlurModule::new(3, 1.0).unwrap())
            .with_operator(DownsamplingModule::new(3).unwrap());
        assert_eq!(model.downsampling_scale(), 6);
        assert_eq!(
            model.output_size(ImageSize::new(25, 13)),
            ImageSize::new(4, 2)
        );
    }

    #[test]
    fn transpose_restores_non_multiple_hr_size() {
        let model = ImageModel::default().with_operator(DownsamplingModule::new(2).unwrap());
        let hr = ImageSize::new(5, 3);
        let mut image = ImageData::from_raw(&[1.0, 2.0], ImageSize::new(2, 1), 1).unwrap();
        model.apply_transpose(&mut image, 0, hr);
        assert_eq!(image.size(), hr);
        assert_eq!(
            image.to_vec(),
            vec![
                1.0, 0.0, 2.0, 0.0, 0.0, //
                0.0, 0.0, 0.0, 0.0, 0.0, //
                0.0, 0.0, 0.0, 0.0, 0.0,
            ]
        );
    }
}
