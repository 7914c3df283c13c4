use crate::error::ModelError;
use crate::model::{
    AdditiveNoiseModule, DegradationOperator, DownsamplingModule, ImageModel, MotionModule,
    MotionSequence, PsfBlurModule,
};
use serde::{Deserialize, Serialize};

/// One degradation stage as written in a JSON config, e.g.
/// `{"type": "blur", "radius": 5, "sigma": 1.0}`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OperatorConfig {
    Motion {
        shifts: MotionSequence,
    },
    Blur {
        radius: usize,
        sigma: f64,
    },
    Downsampling {
        scale: usize,
    },
    Noise {
        sigma: f64,
        #[serde(default)]
        seed: Option<u64>,
    },
}

impl OperatorConfig {
    pub fn build(&self) -> Result<DegradationOperator, ModelError> {
        Ok(match self {
            Self::Motion { shifts } => MotionModule::new(shifts.clone()).into(),
            Self::Blur { radius, sigma } => PsfBlurModule::new(*radius, *sigma)?.into(),
            Self::Downsampling { scale } => DownsamplingModule::new(*scale)?.into(),
            Self::Noise { sigma, seed } => match seed {
                Some(seed) => AdditiveNoiseModule::with_seed(*sigma, *seed)?.into(),
                None => AdditiveNoiseModule::new(*sigma)?.into(),
            },
        })
    }
}

/// Ordered operator list describing an [`ImageModel`].
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub operators: Vec<OperatorConfig>,
}

impl ModelConfig {
    pub fn build(&self) -> Result<ImageModel, ModelError> {
        let operators = self
            .operators
            .iter()
            .map(OperatorConfig::build)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ImageModel::new(operators))
    }
}
