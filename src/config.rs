use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

/// Environment variable pointing at a config file.
pub const CONFIG_ENV: &str = "DATASET_ANALYZER_CONFIG";
/// Config file looked up in the working directory when the variable is unset.
pub const DEFAULT_CONFIG_FILE: &str = "dataset-analyzer.json";

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// User-tunable settings. Every field is optional in the file.
///
/// ```json
/// { "histogram_bins": 40, "window_width": 1600.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Number of equal-width histogram buckets.
    pub histogram_bins: usize,
    pub window_width: f32,
    pub window_height: f32,
    /// Height of the data preview table.
    pub preview_height: f32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            histogram_bins: 30,
            window_width: 1280.0,
            window_height: 900.0,
            preview_height: 280.0,
        }
    }
}

impl AnalyzerConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: AnalyzerConfig = serde_json::from_str(text).context("parsing config JSON")?;
        if config.histogram_bins == 0 {
            bail!("histogram_bins must be at least 1");
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in config file {}", path.display()))
    }

    /// Load from `$DATASET_ANALYZER_CONFIG` or `./dataset-analyzer.json`.
    /// A missing file means defaults; a broken one is logged and ignored.
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Self::default();
        };
        match Self::from_file(&path) {
            Ok(config) => {
                log::info!("Loaded settings from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring settings: {e:#}");
                Self::default()
            }
        }
    }
}

fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    local.is_file().then_some(local)
}
