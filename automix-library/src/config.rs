//! Simple configuration persistence for automix
//!
//! Stores the theme and the automation timing in a `key=value` file.

use automix_core::{AutomationConfig, PhaseThresholds};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Default delay between mix-analysis steps
pub const DEFAULT_ANALYSIS_STEP_MS: u64 = 800;

/// Errors that can occur when reading or writing the config file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Theme name, resolved by the UI
    pub theme: Option<String>,
    pub cycle_period_ms: u64,
    pub automation_tick_ms: u64,
    pub easing_tick_ms: u64,
    pub scroll_tick_ms: u64,
    pub thresholds: PhaseThresholds,
    /// Delay between simulated analysis steps
    pub analysis_step_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        let automation = AutomationConfig::default();
        Self {
            theme: None,
            cycle_period_ms: automation.cycle_period_ms,
            automation_tick_ms: automation.automation_tick_ms,
            easing_tick_ms: automation.easing_tick_ms,
            scroll_tick_ms: automation.scroll_tick_ms,
            thresholds: automation.thresholds,
            analysis_step_ms: DEFAULT_ANALYSIS_STEP_MS,
        }
    }
}

impl Config {
    /// Load config from the default location
    ///
    /// Returns default config if file doesn't exist or can't be read.
    pub fn load() -> Self {
        let path = Self::config_path();
        Self::load_from(&path).unwrap_or_default()
    }

    /// Load config from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path();
        self.save_to(&path)
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.serialize())?;
        Ok(())
    }

    /// Get the default config file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("automix")
            .join("config.txt")
    }

    /// Automation settings built from this config
    ///
    /// Thresholds that fail validation as a set fall back to the defaults.
    pub fn automation_config(&self) -> AutomationConfig {
        let mut automation = AutomationConfig {
            cycle_period_ms: self.cycle_period_ms,
            automation_tick_ms: self.automation_tick_ms,
            easing_tick_ms: self.easing_tick_ms,
            scroll_tick_ms: self.scroll_tick_ms,
            thresholds: self.thresholds,
            ..Default::default()
        };
        if let Err(e) = self.thresholds.validate() {
            warn!(error = %e, "ignoring configured phase thresholds");
            automation.thresholds = PhaseThresholds::default();
        }
        automation
    }

    /// Parse config from simple key=value format
    fn parse(content: &str) -> Self {
        let mut config = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            match key {
                "theme" => {
                    if !value.is_empty() {
                        config.theme = Some(value.to_string());
                    }
                }
                "cycle_period_ms" => set_millis(&mut config.cycle_period_ms, value),
                "automation_tick_ms" => set_millis(&mut config.automation_tick_ms, value),
                "easing_tick_ms" => set_millis(&mut config.easing_tick_ms, value),
                "scroll_tick_ms" => set_millis(&mut config.scroll_tick_ms, value),
                "analysis_step_ms" => {
                    if let Ok(ms) = value.parse::<u64>() {
                        config.analysis_step_ms = ms;
                    }
                }
                "stable_a_start" => set_fraction(&mut config.thresholds.stable_a_start, value),
                "stable_a_end" => set_fraction(&mut config.thresholds.stable_a_end, value),
                "transition_start" => set_fraction(&mut config.thresholds.transition_start, value),
                "transition_end" => set_fraction(&mut config.thresholds.transition_end, value),
                _ => {} // Ignore unknown keys
            }
        }

        config
    }

    /// Serialize config to simple key=value format
    fn serialize(&self) -> String {
        let mut lines = vec!["# automix configuration".to_string()];

        if let Some(ref theme) = self.theme {
            lines.push(format!("theme={}", theme));
        }
        lines.push(format!("cycle_period_ms={}", self.cycle_period_ms));
        lines.push(format!("automation_tick_ms={}", self.automation_tick_ms));
        lines.push(format!("easing_tick_ms={}", self.easing_tick_ms));
        lines.push(format!("scroll_tick_ms={}", self.scroll_tick_ms));
        lines.push(format!("stable_a_start={}", self.thresholds.stable_a_start));
        lines.push(format!("stable_a_end={}", self.thresholds.stable_a_end));
        lines.push(format!("transition_start={}", self.thresholds.transition_start));
        lines.push(format!("transition_end={}", self.thresholds.transition_end));
        lines.push(format!("analysis_step_ms={}", self.analysis_step_ms));

        lines.join("\n")
    }
}

/// Accept positive millisecond values only
fn set_millis(slot: &mut u64, value: &str) {
    match value.parse::<u64>() {
        Ok(ms) if ms > 0 => *slot = ms,
        _ => {}
    }
}

/// Accept fractions strictly inside (0, 1) only
fn set_fraction(slot: &mut f64, value: &str) {
    match value.parse::<f64>() {
        Ok(f) if f > 0.0 && f < 1.0 => *slot = f,
        _ => {}
    }
}
