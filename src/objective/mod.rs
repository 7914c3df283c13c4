//! Scalar objectives for gradient-based solvers.
//!
//! Any minimiser that expects `f(x)` and an optional `∇f(x)` buffer of the
//! same length as `x` can drive an [`ObjectiveTerm`].

pub mod data_term;
pub mod function;

pub use data_term::ObjectiveDataTerm;
pub use function::ObjectiveFunction;

/// Scalar cost with an optional additive gradient.
pub trait ObjectiveTerm {
    /// Length of the parameter (and gradient) buffer.
    fn num_parameters(&self) -> usize;

    /// Return the cost at `estimate`. When `gradient` is given, the term adds
    /// its gradient into it; it never clears the buffer.
    fn compute(&self, estimate: &[f64], gradient: Option<&mut [f64]>) -> f64;
}
