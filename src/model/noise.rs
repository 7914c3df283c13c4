use crate::error::ModelError;
use crate::image::{ImageData, ImageViewMut};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Additive zero-mean Gaussian noise on the 0–255 pixel scale.
///
/// Noise has no useful adjoint for the least-squares gradient, so the
/// transpose is the identity and the operator contributes an identity matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdditiveNoiseModule {
    sigma: f64,
    seed: Option<u64>,
}

impl AdditiveNoiseModule {
    /// Noise drawn from OS entropy on every call.
    pub fn new(sigma: f64) -> Result<Self, ModelError> {
        Self::build(sigma, None)
    }

    /// Reproducible noise: each frame index gets its own stream derived from `seed`.
    pub fn with_seed(sigma: f64, seed: u64) -> Result<Self, ModelError> {
        Self::build(sigma, Some(seed))
    }

    fn build(sigma: f64, seed: Option<u64>) -> Result<Self, ModelError> {
        if !(sigma > 0.0 && sigma.is_finite()) {
            return Err(ModelError::InvalidNoiseSigma(sigma));
        }
        Ok(Self { sigma, seed })
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn rng_for_frame(&self, index: usize) -> StdRng {
        match self.seed {
            // golden-ratio stride keeps per-frame streams apart
            Some(seed) => {
                StdRng::seed_from_u64(seed.wrapping_add((index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)))
            }
            None => StdRng::from_entropy(),
        }
    }

    pub fn apply(&self, image: &mut ImageData, index: usize) {
        let mut rng = self.rng_for_frame(index);
        for channel in image.channels_mut() {
            for px in channel.as_mut_slice() {
                let z: f64 = rng.sample(StandardNormal);
                *px += self.sigma * z;
            }
        }
    }

    pub fn apply_transpose(&self, _image: &mut ImageData) {}
}
