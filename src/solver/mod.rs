//! Solver-facing adapters for the residual (Gauss-Newton style) formulation.

pub mod map_cost;
pub mod regularizer;

pub use map_cost::MapCostProcessor;
pub use regularizer::Regularizer;
