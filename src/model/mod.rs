//! Image formation (degradation) model.
//!
//! A [`ImageModel`] chains [`DegradationOperator`]s that turn an HR estimate
//! into the LR observation of a given frame:
//!
//! - [`MotionModule`]: per-frame sub-pixel translation (bilinear).
//! - [`PsfBlurModule`]: separable Gaussian PSF, zero padded, self-adjoint.
//! - [`DownsamplingModule`]: integer decimation by block-origin selection.
//! - [`AdditiveNoiseModule`]: Gaussian sensor noise, identity adjoint.
//!
//! Each operator provides the exact transpose of its forward pass, plus a
//! dense-matrix form for verification on small images.

pub mod blur;
pub mod downsampling;
pub mod filters;
pub mod image_model;
pub mod matrix;
pub mod motion;
pub mod noise;
pub mod operator;

pub use blur::PsfBlurModule;
pub use downsampling::DownsamplingModule;
pub use image_model::ImageModel;
pub use motion::{MotionModule, MotionSequence, MotionShift};
pub use noise::AdditiveNoiseModule;
pub use operator::DegradationOperator;
