//! Configuration types for the termgrid host.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::LayoutMode;

/// Smallest font size the host will accept.
pub const FONT_SIZE_MIN: f32 = 10.0;
/// Largest font size the host will accept.
pub const FONT_SIZE_MAX: f32 = 24.0;

/// Host configuration loaded from a YAML file.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(default)]
pub struct HostConfig {
    /// Terminal settings
    pub terminal: TerminalSettings,
    /// Attention detection settings
    pub detection: DetectionSettings,
    /// Appearance settings
    pub appearance: AppearanceSettings,
}

impl HostConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> crate::Result<Self> {
        let config: HostConfig = serde_yaml::from_str(yaml)
            .map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> crate::Result<()> {
        if self.terminal.shell.trim().is_empty() {
            return Err(crate::Error::Config(
                "terminal.shell cannot be empty".to_string(),
            ));
        }

        if self.detection.tick_interval_ms == 0 {
            return Err(crate::Error::Config(
                "detection.tick_interval_ms must be > 0".to_string(),
            ));
        }
        if self.detection.quiet_threshold_ms == 0 {
            return Err(crate::Error::Config(
                "detection.quiet_threshold_ms must be > 0".to_string(),
            ));
        }

        for pattern in &self.detection.extra_prompt_patterns {
            pattern.validate()?;
        }

        let font = self.appearance.font_size;
        if !(FONT_SIZE_MIN..=FONT_SIZE_MAX).contains(&font) {
            return Err(crate::Error::Config(format!(
                "appearance.font_size must be within [{FONT_SIZE_MIN}, {FONT_SIZE_MAX}], got {font}"
            )));
        }

        Ok(())
    }
}

/// Terminal settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TerminalSettings {
    /// Shell executable to spawn for new sessions
    pub shell: String,
    /// TERM environment variable value
    pub term: String,
    /// Extra environment variables passed to spawned shells
    pub env: Vec<(String, String)>,
}

impl Default for TerminalSettings {
    fn default() -> Self {
        Self {
            shell: if cfg!(windows) {
                "powershell.exe".to_string()
            } else {
                "/bin/zsh".to_string()
            },
            term: "xterm-256color".to_string(),
            env: Vec::new(),
        }
    }
}

/// Attention detection settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DetectionSettings {
    /// Periodic liveness evaluation interval in milliseconds
    pub tick_interval_ms: u64,
    /// Quiet period after which an alive session is considered to be
    /// sitting at a prompt (still running), in milliseconds
    pub quiet_threshold_ms: u64,
    /// Additional input-prompt patterns checked after the built-in table
    pub extra_prompt_patterns: Vec<PromptPatternConfig>,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            quiet_threshold_ms: 2000,
            extra_prompt_patterns: vec![],
        }
    }
}

/// A user-supplied input-prompt pattern.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PromptPatternConfig {
    /// Pattern name (identifier)
    pub name: String,
    /// Regular expression matched against output lines
    pub pattern: String,
}

impl PromptPatternConfig {
    /// Validate the pattern configuration.
    pub fn validate(&self) -> crate::Result<()> {
        if self.name.trim().is_empty() {
            return Err(crate::Error::Config(
                "prompt pattern name cannot be empty".to_string(),
            ));
        }

        regex::Regex::new(&self.pattern).map_err(|e| {
            crate::Error::Config(format!("invalid prompt pattern '{}': {}", self.name, e))
        })?;

        Ok(())
    }
}

/// Appearance settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppearanceSettings {
    /// Initial terminal font size in points
    pub font_size: f32,
    /// Initial layout mode for ungrouped sessions
    pub layout: LayoutMode,
}

impl Default for AppearanceSettings {
    fn default() -> Self {
        Self {
            font_size: 13.0,
            layout: LayoutMode::Single,
        }
    }
}
