use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Sync progress to a hosted table instead of local JSON files.
    #[serde(default = "default_remote_enabled")]
    pub remote_enabled: bool,
    #[serde(default = "default_remote_base_url")]
    pub remote_base_url: String,
    #[serde(default = "default_remote_timeout_secs")]
    pub remote_timeout_secs: u64,
    /// How many items the study guide has; completion percentage is measured
    /// against this.
    #[serde(default = "default_study_guide_total_items")]
    pub study_guide_total_items: u32,
}

fn default_remote_enabled() -> bool {
    false
}
fn default_remote_base_url() -> String {
    String::new()
}
fn default_remote_timeout_secs() -> u64 {
    10
}
fn default_study_guide_total_items() -> u32 {
    20
}

impl Default for Config {
    fn default() -> Self {
        Self {
            remote_enabled: default_remote_enabled(),
            remote_base_url: default_remote_base_url(),
            remote_timeout_secs: default_remote_timeout_secs(),
            study_guide_total_items: default_study_guide_total_items(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    #[allow(dead_code)]
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("studyquest")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_file() {
        let config: Config = toml::from_str("").unwrap();
        assert!(!config.remote_enabled);
        assert!(config.remote_base_url.is_empty());
        assert_eq!(config.remote_timeout_secs, 10);
        assert_eq!(config.study_guide_total_items, 20);
    }

    #[test]
    fn test_partial_file_fills_missing_fields() {
        let toml_str = r#"
remote_enabled = true
remote_base_url = "https://tables.example.test/v1"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert!(config.remote_enabled);
        assert_eq!(config.remote_base_url, "https://tables.example.test/v1");
        assert_eq!(config.remote_timeout_secs, 10);
    }

    #[test]
    fn test_round_trip() {
        let mut config = Config::default();
        config.study_guide_total_items = 42;
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.study_guide_total_items, 42);
        assert_eq!(deserialized.remote_enabled, config.remote_enabled);
    }
}
