use super::model::ModelConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Config of the `simulate_observations` tool.
#[derive(Debug, Deserialize)]
pub struct SimulateConfig {
    /// HR source image.
    pub input: PathBuf,
    /// Load the input as a single luma channel instead of RGB.
    #[serde(default)]
    pub grayscale: bool,
    pub model: ModelConfig,
    #[serde(default = "default_num_frames")]
    pub num_frames: usize,
    pub output: SimulateOutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct SimulateOutputConfig {
    /// Directory receiving `frame_XXX.png` files.
    #[serde(rename = "frames_dir")]
    pub frames_dir: PathBuf,
    #[serde(rename = "summary_json")]
    pub summary_json: PathBuf,
}

fn default_num_frames() -> usize {
    4
}

pub fn load_config(path: &Path) -> Result<SimulateConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_optional_fields() {
        let json = r#"{
            "input": "hr.png",
            "model": {"operators": [{"type": "downsampling", "scale": 3}]},
            "output": {"frames_dir": "out/frames", "summary_json": "out/summary.json"}
        }"#;
        let config: SimulateConfig = serde_json::from_str(json).expect("valid config");
        assert_eq!(config.num_frames, 4);
        assert!(!config.grayscale);
        assert_eq!(config.output.frames_dir, PathBuf::from("out/frames"));
        assert_eq!(config.model.operators.len(), 1);
    }
}
