//! Least-squares data-fidelity term.
//!
//! For an HR estimate `x` and observations `y_i` the term reports
//!
//! ```text
//! cost = Σ_i ‖ M_i x − y_i ‖²        gradient = Σ_i 2 M_iᵀ (M_i x − y_i)
//! ```
//!
//! where `M_i` is the image model applied with frame index `i`. The gradient is
//! assembled with the operator adjoints, never with explicit matrices.
use super::ObjectiveTerm;
use crate::error::ModelError;
use crate::image::{ImageData, Interpolation};
use crate::model::ImageModel;
use crate::types::ImageSize;
use log::debug;
use std::ops::Range;

/// Degrade an HR image into the geometry of an observation.
///
/// Returns the simulated observation and the size the model produced before
/// any nearest-neighbour fit to `observation_size`.
pub(crate) fn simulate_observation(
    model: &ImageModel,
    mut hr_image: ImageData,
    index: usize,
    observation_size: ImageSize,
) -> (ImageData, ImageSize) {
    model.apply(&mut hr_image, index);
    let model_size = hr_image.size();
    if model_size != observation_size {
        debug!(
            "frame {index}: model output {model_size} resized to observation {observation_size}"
        );
        hr_image.resize(observation_size, Interpolation::Nearest);
    }
    (hr_image, model_size)
}

/// Data-fidelity term over a contiguous channel range of the observations.
///
/// The estimate passed to [`compute`](Self::compute) holds exactly
/// `channel_end - channel_start` channels of HR size, channel-major. When
/// several terms (e.g. disjoint spectral ranges) share one gradient buffer,
/// the caller zeroes it once; every term only adds its contribution.
#[derive(Clone, Copy, Debug)]
pub struct ObjectiveDataTerm<'a> {
    image_model: &'a ImageModel,
    observations: &'a [ImageData],
    channel_start: usize,
    channel_end: usize,
    image_size: ImageSize,
}

impl<'a> ObjectiveDataTerm<'a> {
    pub fn new(
        image_model: &'a ImageModel,
        observations: &'a [ImageData],
        channel_start: usize,
        channel_end: usize,
        image_size: ImageSize,
    ) -> Result<Self, ModelError> {
        if observations.is_empty() {
            return Err(ModelError::NoObservations);
        }
        for observation in observations {
            let available = observation.num_channels();
            if channel_end <= channel_start || channel_end > available {
                return Err(ModelError::InvalidChannelRange {
                    start: channel_start,
                    end: channel_end,
                    available,
                });
            }
        }
        Ok(Self {
            image_model,
            observations,
            channel_start,
            channel_end,
            image_size,
        })
    }

    pub fn num_channels(&self) -> usize {
        self.channel_end - self.channel_start
    }

    pub fn channel_range(&self) -> Range<usize> {
        self.channel_start..self.channel_end
    }

    /// Length of the estimate and gradient buffers this term expects.
    pub fn num_parameters(&self) -> usize {
        self.num_channels() * self.image_size.pixel_count()
    }

    /// Span of this term's channels inside a full channel-major HR buffer.
    pub fn buffer_range(&self) -> Range<usize> {
        let n = self.image_size.pixel_count();
        self.channel_start * n..self.channel_end * n
    }

    pub fn image_size(&self) -> ImageSize {
        self.image_size
    }

    /// Sum of squared residuals over all observations; adds the analytic
    /// gradient into `gradient` when given.
    ///
    /// Panics when a buffer length differs from [`num_parameters`](Self::num_parameters).
    pub fn compute(&self, estimate: &[f64], gradient: Option<&mut [f64]>) -> f64 {
        let expected = self.num_parameters();
        assert_eq!(
            estimate.len(),
            expected,
            "estimate holds {} values, expected {expected}",
            estimate.len()
        );
        if let Some(g) = gradient.as_deref() {
            assert_eq!(
                g.len(),
                expected,
                "gradient holds {} values, expected {expected}",
                g.len()
            );
        }

        #[cfg(feature = "parallel")]
        let cost = self.compute_parallel(estimate, gradient);
        #[cfg(not(feature = "parallel"))]
        let cost = self.compute_sequential(estimate, gradient);
        cost
    }

    #[cfg(not(feature = "parallel"))]
    fn compute_sequential(&self, estimate: &[f64], mut gradient: Option<&mut [f64]>) -> f64 {
        self.observations
            .iter()
            .enumerate()
            .map(|(index, observation)| {
                self.compute_observation(index, observation, estimate, gradient.as_deref_mut())
            })
            .sum()
    }

    #[cfg(feature = "parallel")]
    fn compute_parallel(&self, estimate: &[f64], gradient: Option<&mut [f64]>) -> f64 {
        use rayon::prelude::*;

        let want_gradient = gradient.is_some();
        let len = estimate.len();
        let (cost, partial) = self
            .observations
            .par_iter()
            .enumerate()
            .map(|(index, observation)| {
                let mut local = want_gradient.then(|| vec![0.0; len]);
                let cost =
                    self.compute_observation(index, observation, estimate, local.as_deref_mut());
                (cost, local)
            })
            .reduce(
                || (0.0, None),
                |(cost_a, grad_a), (cost_b, grad_b)| (cost_a + cost_b, sum_buffers(grad_a, grad_b)),
            );
        if let (Some(gradient), Some(partial)) = (gradient, partial) {
            for (g, p) in gradient.iter_mut().zip(&partial) {
                *g += p;
            }
        }
        cost
    }

    fn compute_observation(
        &self,
        index: usize,
        observation: &ImageData,
        estimate: &[f64],
        gradient: Option<&mut [f64]>,
    ) -> f64 {
        let num_channels = self.num_channels();
        let hr_image = ImageData::from_raw(estimate, self.image_size, num_channels)
            .expect("estimate length checked in compute");
        let observation_size = observation.size();
        let (degraded, model_size) =
            simulate_observation(self.image_model, hr_image, index, observation_size);

        let mut residual = ImageData::zeros(observation_size, num_channels);
        let mut cost = 0.0;
        for channel in 0..num_channels {
            let simulated = degraded.channel_data(channel);
            let observed = observation.channel_data(channel + self.channel_start);
            let out = residual.channel_data_mut(channel);
            for ((r, &s), &o) in out.iter_mut().zip(simulated).zip(observed) {
                *r = s - o;
                cost += *r * *r;
            }
        }
        debug!("ObjectiveDataTerm: frame {index} cost={cost:.6e}");

        if let Some(gradient) = gradient {
            residual.resize(model_size, Interpolation::Additive);
            self.image_model
                .apply_transpose(&mut residual, index, self.image_size);
            let n = self.image_size.pixel_count();
            for (channel, g) in gradient.chunks_exact_mut(n.max(1)).enumerate().take(num_channels) {
                for (g, &r) in g.iter_mut().zip(residual.channel_data(channel)) {
                    *g += 2.0 * r;
                }
            }
        }
        cost
    }
}

#[cfg(feature = "parallel")]
fn sum_buffers(a: Option<Vec<f64>>, b: Option<Vec<f64>>) -> Option<Vec<f64>> {
    match (a, b) {
        (Some(mut a), Some(b)) => {
            for (x, y) in a.iter_mut().zip(&b) {
                *x += y;
            }
            Some(a)
        }
        (a, None) => a,
        (None, b) => b,
    }
}

impl ObjectiveTerm for ObjectiveDataTerm<'_> {
    fn num_parameters(&self) -> usize {
        ObjectiveDataTerm::num_parameters(self)
    }

    fn compute(&self, estimate: &[f64], gradient: Option<&mut [f64]>) -> f64 {
        ObjectiveDataTerm::compute(self, estimate, gradient)
    }
}
