use crate::types::Config;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::warn;

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            warn!("Config file {} not found, using defaults", path);
            return Ok(Config::default());
        }
        let contents =
            fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
        Self::from_yaml(&contents).with_context(|| format!("Invalid config in {}", path))
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(contents)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let config = Config::from_yaml("video:\n  input: \"clips\"\n  display: false\n").unwrap();
        assert_eq!(config.video.input, "clips");
        assert!(!config.video.display);
        assert_eq!(config.video.window_name, "result");
        assert!(!config.video.save_annotated);
        assert!(!config.debug.draw_segments);
        assert_eq!(config.logging.level, "lane_lines=info");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load("definitely/not/here/config.yaml").unwrap();
        assert_eq!(config.video.output_dir, "output");
    }

    #[test]
    fn test_malformed_config_is_rejected() {
        assert!(Config::from_yaml("video: [1, 2").is_err());
    }
}
