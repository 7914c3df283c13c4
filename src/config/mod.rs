pub mod model;
pub mod simulate;

pub use model::{ModelConfig, OperatorConfig};
pub use simulate::{load_config, SimulateConfig, SimulateOutputConfig};
