//! Residual-vector form of the MAP objective.
//!
//! Residual-based solvers (Gauss-Newton, Levenberg-Marquardt) minimise
//! `‖r(x)‖²` from the residuals themselves. The processor sources the two
//! residual families consistently: per observation/channel data residuals and
//! the regularizer residuals.
use super::regularizer::Regularizer;
use crate::error::ModelError;
use crate::image::ImageData;
use crate::model::ImageModel;
use crate::objective::data_term::simulate_observation;
use crate::types::ImageSize;
use log::debug;

pub struct MapCostProcessor<'a> {
    observations: &'a [ImageData],
    image_model: &'a ImageModel,
    image_size: ImageSize,
    regularizer: Box<dyn Regularizer + 'a>,
    regularization_parameter: f64,
}

impl<'a> MapCostProcessor<'a> {
    /// `observations` may be empty when only the regularizer is evaluated.
    pub fn new(
        observations: &'a [ImageData],
        image_model: &'a ImageModel,
        image_size: ImageSize,
        regularizer: Box<dyn Regularizer + 'a>,
        regularization_parameter: f64,
    ) -> Result<Self, ModelError> {
        if !(regularization_parameter >= 0.0 && regularization_parameter.is_finite()) {
            return Err(ModelError::InvalidRegularizationParameter(
                regularization_parameter,
            ));
        }
        debug!(
            "MapCostProcessor: {} observations, hr={image_size}, lambda={regularization_parameter}",
            observations.len()
        );
        Ok(Self {
            observations,
            image_model,
            image_size,
            regularizer,
            regularization_parameter,
        })
    }

    pub fn num_observations(&self) -> usize {
        self.observations.len()
    }

    pub fn image_size(&self) -> ImageSize {
        self.image_size
    }

    /// λ, the weight of the regularization residuals.
    pub fn regularization_parameter(&self) -> f64 {
        self.regularization_parameter
    }

    /// `degraded(estimate) − observation` for one observation channel, one
    /// value per observation pixel (row-major).
    ///
    /// `estimate` is a single HR channel. Panics on out-of-range indices or a
    /// wrongly sized estimate.
    pub fn compute_data_term_residuals(
        &self,
        observation_index: usize,
        channel_index: usize,
        estimate: &[f64],
    ) -> Vec<f64> {
        assert!(
            observation_index < self.observations.len(),
            "observation index {observation_index} out of range ({} observations)",
            self.observations.len()
        );
        let observation = &self.observations[observation_index];
        assert!(
            channel_index < observation.num_channels(),
            "channel index {channel_index} out of range ({} channels)",
            observation.num_channels()
        );
        assert_eq!(
            estimate.len(),
            self.image_size.pixel_count(),
            "estimate does not match HR size {}",
            self.image_size
        );

        let hr_image = ImageData::from_raw(estimate, self.image_size, 1)
            .expect("estimate length checked above");
        let (degraded, _) = simulate_observation(
            self.image_model,
            hr_image,
            observation_index,
            observation.size(),
        );
        degraded
            .channel_data(0)
            .iter()
            .zip(observation.channel_data(channel_index))
            .map(|(s, o)| s - o)
            .collect()
    }

    /// Unweighted regularizer residuals for `estimate`.
    pub fn compute_regularization_residuals(&self, estimate: &[f64]) -> Vec<f64> {
        self.regularizer.compute_residuals(estimate)
    }

    /// Full residual vector for channel `channel_index`: the data residuals of
    /// every observation carrying that channel, in observation order, then the
    /// regularizer residuals scaled by `sqrt(λ)`. Its squared norm is
    /// `data cost + λ ‖reg‖²`.
    ///
    /// Observations covering fewer channels are skipped. The regularizer
    /// block is always present, so the length does not depend on λ.
    pub fn compute_all_residuals(&self, channel_index: usize, estimate: &[f64]) -> Vec<f64> {
        let mut residuals = Vec::new();
        for (index, observation) in self.observations.iter().enumerate() {
            if channel_index >= observation.num_channels() {
                debug!(
                    "MapCostProcessor: observation {index} has no channel {channel_index}, skipped"
                );
                continue;
            }
            residuals.extend(self.compute_data_term_residuals(index, channel_index, estimate));
        }
        let weight = self.regularization_parameter.sqrt();
        residuals.extend(
            self.compute_regularization_residuals(estimate)
                .into_iter()
                .map(|r| weight * r),
        );
        residuals
    }
}
