use crate::error::{ClaimReportError, Result};
use crate::sharpness::{SharpnessConfig, ANALYSIS_MAX_EDGE, BLUR_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Laplacian variance below this is flagged as blurry.
    pub blur_threshold: f64,
    /// Analysis resolution cap for the sharpness check.
    pub max_analysis_edge: u32,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ClaimReportError::Config("Home directory not found".into()))?;
        Ok(home.join(".config").join("claim-report").join("config.json"))
    }

    pub fn sharpness(&self) -> SharpnessConfig {
        SharpnessConfig {
            threshold: self.blur_threshold,
            max_edge: self.max_analysis_edge,
        }
    }

    pub fn set_threshold(&mut self, threshold: f64) -> Result<()> {
        self.blur_threshold = threshold;
        self.save()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            blur_threshold: BLUR_THRESHOLD,
            max_analysis_edge: ANALYSIS_MAX_EDGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_analysis_constants() {
        let config = Config::default();
        assert_eq!(config.blur_threshold, BLUR_THRESHOLD);
        assert_eq!(config.max_analysis_edge, ANALYSIS_MAX_EDGE);

        let sharpness = config.sharpness();
        assert_eq!(sharpness.threshold, BLUR_THRESHOLD);
        assert_eq!(sharpness.max_edge, ANALYSIS_MAX_EDGE);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config {
            blur_threshold: 150.0,
            max_analysis_edge: 300,
        };
        let json = serde_json::to_string(&config).unwrap();
        let restored: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.blur_threshold, 150.0);
        assert_eq!(restored.max_analysis_edge, 300);
    }
}
