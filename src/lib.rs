#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod image;
pub mod model;
pub mod objective;
pub mod solver;
pub mod types;

// --- High-level re-exports -------------------------------------------------

pub use crate::error::ModelError;
pub use crate::image::{ImageData, ImageF64, Interpolation};
pub use crate::model::{DegradationOperator, ImageModel};
pub use crate::objective::{ObjectiveDataTerm, ObjectiveFunction, ObjectiveTerm};
pub use crate::solver::{MapCostProcessor, Regularizer};
pub use crate::types::ImageSize;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use super_resolution::prelude::*;
///
/// # fn main() -> Result<(), ModelError> {
/// let hr_size = ImageSize::new(64, 64);
/// let model = ImageModel::default()
///     .with_operator(PsfBlurModule::new(5, 1.0)?)
///     .with_operator(DownsamplingModule::new(2)?);
///
/// let observations = vec![ImageData::zeros(model.output_size(hr_size), 1)];
/// let term = ObjectiveDataTerm::new(&model, &observations, 0, 1, hr_size)?;
///
/// let estimate = vec![0.0; term.num_parameters()];
/// let mut gradient = vec![0.0; term.num_parameters()];
/// let cost = term.compute(&estimate, Some(&mut gradient));
/// println!("cost={cost}");
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::model::{
        AdditiveNoiseModule, DownsamplingModule, MotionModule, MotionSequence, MotionShift,
        PsfBlurModule,
    };
    pub use crate::{
        DegradationOperator, ImageData, ImageModel, ImageSize, MapCostProcessor, ModelError,
        ObjectiveDataTerm, ObjectiveFunction, Regularizer,
    };
}
