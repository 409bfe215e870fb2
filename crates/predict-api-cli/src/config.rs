//! Configuration file support for predict-api.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/predict-api/config.toml` (lowest priority)
//! - Project-local: `.predict-api.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General options.
    pub general: GeneralConfig,
    /// Router dispatch settings.
    pub router: RouterConfig,
    /// IR detection slot settings.
    pub ir: SlotConfig,
    /// Audio detection slot settings.
    pub audio: SlotConfig,
    /// Output formatting settings.
    pub output: OutputConfig,
}

/// General configuration options.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Recurse into subdirectories by default.
    pub recursive: Option<bool>,
}

/// Router dispatch configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Invoke slot predictors concurrently.
    pub concurrent: Option<bool>,
    /// Per-call predictor timeout in milliseconds.
    pub timeout_ms: Option<u64>,
}

/// Per-slot configuration, shared by `[ir]` and `[audio]`.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct SlotConfig {
    /// Enable/disable the slot.
    pub enabled: Option<bool>,
    /// Detection threshold (0.0-1.0).
    pub threshold: Option<f32>,
    /// Required input length.
    pub expected_len: Option<usize>,
}

/// Output formatting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "json" or "jsonl".
    pub format: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: Option<bool>,
    /// Show progress bar.
    pub progress: Option<bool>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/predict-api/config.toml`
    /// 2. Project-local: `.predict-api.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Invalid values are reported as a
    /// warning and the whole configuration falls back to defaults.
    pub fn load() -> Self {
        let mut config = Self::default();

        // Load XDG config (lowest priority)
        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        // Load project-local config (higher priority, merged)
        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        if let Err(e) = config.validate() {
            eprintln!("warning: {e}");
            return Self::default();
        }

        config
    }

    /// Validate configuration values are within acceptable ranges.
    fn validate(&self) -> Result<(), String> {
        for (section, slot) in [("ir", &self.ir), ("audio", &self.audio)] {
            if let Some(t) = slot.threshold {
                if !(0.0..=1.0).contains(&t) {
                    return Err(format!("{section}.threshold must be 0.0-1.0, got {t}"));
                }
            }
            if slot.expected_len == Some(0) {
                return Err(format!("{section}.expected_len must be at least 1"));
            }
        }

        if self.router.timeout_ms == Some(0) {
            return Err("router.timeout_ms must be at least 1".to_string());
        }

        if let Some(ref f) = self.output.format {
            if f != "json" && f != "jsonl" {
                return Err(format!(
                    "output.format must be 'json' or 'jsonl', got '{f}'"
                ));
            }
        }

        Ok(())
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        self.general.recursive = other.general.recursive.or(self.general.recursive);

        self.router.concurrent = other.router.concurrent.or(self.router.concurrent);
        self.router.timeout_ms = other.router.timeout_ms.or(self.router.timeout_ms);

        self.ir.merge(other.ir);
        self.audio.merge(other.audio);

        self.output.format = other.output.format.or_else(|| self.output.format.take());
        self.output.pretty = other.output.pretty.or(self.output.pretty);
        self.output.progress = other.output.progress.or(self.output.progress);
    }
}

impl SlotConfig {
    fn merge(&mut self, other: Self) {
        self.enabled = other.enabled.or(self.enabled);
        self.threshold = other.threshold.or(self.threshold);
        self.expected_len = other.expected_len.or(self.expected_len);
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("predict-api").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.predict-api.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(".predict-api.toml");
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}
