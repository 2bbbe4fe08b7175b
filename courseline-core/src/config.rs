//! Configuration management
//!
//! Reads and writes `settings.json` in the courseline directory:
//! ```json
//! {
//!   "app": { "demoMode": false, "latencyMs": 300, ... }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Default simulated backend latency applied in front of every store
/// operation
pub const DEFAULT_LATENCY_MS: u64 = 300;

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default)]
    demo_mode: bool,
    #[serde(default = "default_latency")]
    latency_ms: u64,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

fn default_latency() -> u64 {
    DEFAULT_LATENCY_MS
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            demo_mode: false,
            latency_ms: DEFAULT_LATENCY_MS,
            other: HashMap::new(),
        }
    }
}

/// Courseline configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub demo_mode: bool,
    pub latency_ms: u64,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            demo_mode: false,
            latency_ms: DEFAULT_LATENCY_MS,
            _raw_settings: SettingsFile::default(),
        }
    }
}

impl Config {
    /// Load config from the courseline directory
    ///
    /// Demo mode can be enabled via:
    /// 1. Settings file (crs demo on)
    /// 2. Environment variable COURSELINE_DEMO_MODE (for CI/testing)
    ///
    /// Latency can be overridden with COURSELINE_LATENCY_MS.
    pub fn load(courseline_dir: &Path) -> Result<Self> {
        let settings_path = courseline_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        let demo_mode = match std::env::var("COURSELINE_DEMO_MODE").ok().as_deref() {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => true,
            Some("false" | "0" | "no" | "FALSE" | "NO") => false,
            _ => raw.app.demo_mode,
        };

        let latency_ms = std::env::var("COURSELINE_LATENCY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(raw.app.latency_ms);

        Ok(Self {
            demo_mode,
            latency_ms,
            _raw_settings: raw,
        })
    }

    /// Save config to the courseline directory
    /// Preserves settings the CLI doesn't manage
    pub fn save(&self, courseline_dir: &Path) -> Result<()> {
        let settings_path = courseline_dir.join("settings.json");

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        settings.app.demo_mode = self.demo_mode;
        settings.app.latency_ms = self.latency_ms;

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    /// Enable demo mode
    pub fn enable_demo_mode(&mut self) {
        self.demo_mode = true;
    }

    /// Disable demo mode
    pub fn disable_demo_mode(&mut self) {
        self.demo_mode = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_missing() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert!(!config.demo_mode);
        assert_eq!(config.latency_ms, DEFAULT_LATENCY_MS);
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.enable_demo_mode();
        config.latency_ms = 0;
        config.save(dir.path()).unwrap();

        let loaded = Config::load(dir.path()).unwrap();
        assert!(loaded.demo_mode);
        assert_eq!(loaded.latency_ms, 0);
    }

    #[test]
    fn test_unknown_app_fields_preserved() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"app": {"demoMode": false, "theme": "dark"}}"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        config.save(dir.path()).unwrap();

        let content = std::fs::read_to_string(dir.path().join("settings.json")).unwrap();
        assert!(content.contains("theme"));
    }
}
