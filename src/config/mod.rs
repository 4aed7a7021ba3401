//! Configuration management for tracetrim.
//!
//! Handles:
//! - Detection tuning (`[parser]`)
//! - Clipboard polling (`[clipboard]`)
//! - Console output (`[output]`)
//! - Script mode (`[script]`)
//!
//! The global file lives at `<config dir>/tracetrim/config.toml`; a
//! `.tracetrim.toml` in the working directory overrides it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TraceTrimError};
use crate::trace::DetectionOptions;
use crate::util::atomic_write;

/// Project-specific configuration filename.
pub const PROJECT_CONFIG_FILENAME: &str = ".tracetrim.toml";

/// Default clipboard polling interval in milliseconds.
pub const DEFAULT_POLLING_INTERVAL_MS: u64 = 500;
/// Shortest accepted polling interval in milliseconds.
pub const MIN_POLLING_INTERVAL_MS: u64 = 50;
/// Longest accepted polling interval in milliseconds.
pub const MAX_POLLING_INTERVAL_MS: u64 = 10_000;

/// Default largest clipboard text processed (1 MiB).
pub const DEFAULT_CLIPBOARD_MAX_CONTENT_SIZE: usize = 1024 * 1024;
/// Smallest accepted clipboard size limit (1 KiB).
pub const MIN_CLIPBOARD_CONTENT_SIZE: usize = 1024;
/// Largest accepted clipboard size limit (50 MiB).
pub const MAX_CLIPBOARD_CONTENT_SIZE: usize = 50 * 1024 * 1024;

/// Accepted range for `parser.min_detection_lines`.
pub const DETECTION_LINES_RANGE: std::ops::RangeInclusive<usize> = 1..=100;
/// Accepted range for `parser.min_content_length`.
pub const CONTENT_LENGTH_RANGE: std::ops::RangeInclusive<usize> = 10..=10_000;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Switch to script mode when stdin/stdout is not a terminal.
    #[serde(default = "default_true")]
    pub auto_detect_script_mode: bool,
    /// Stack trace detection settings.
    #[serde(default)]
    pub parser: DetectionOptions,
    /// Clipboard monitoring settings.
    #[serde(default)]
    pub clipboard: ClipboardConfig,
    /// Console output settings.
    #[serde(default)]
    pub output: OutputConfig,
    /// Script mode settings.
    #[serde(default)]
    pub script: ScriptConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auto_detect_script_mode: true,
            parser: DetectionOptions::default(),
            clipboard: ClipboardConfig::default(),
            output: OutputConfig::default(),
            script: ScriptConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default global location.
    pub fn load() -> Result<Self> {
        let config_path = default_config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load the global configuration with project-specific overrides from
    /// `.tracetrim.toml` in `project_dir`.
    pub fn load_for_project(project_dir: &Path) -> Result<Self> {
        let mut config = Self::load()?;

        let project_config_path = project_dir.join(PROJECT_CONFIG_FILENAME);
        if project_config_path.exists() {
            let project_config = Self::load_from(&project_config_path)?;
            config.merge_from(&project_config);
        }

        Ok(config)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TraceTrimError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                TraceTrimError::io(format!("Failed to read config file: {}", path.display()), e)
            }
        })?;

        toml::from_str(&content).map_err(|e| TraceTrimError::InvalidConfig {
            message: format!("{}: {e}", path.display()),
        })
    }

    /// Merge another config into this one. Values in `other` that differ
    /// from the defaults take precedence.
    pub fn merge_from(&mut self, other: &Config) {
        let defaults = Config::default();

        let parser = &other.parser;
        if parser.min_detection_lines != defaults.parser.min_detection_lines {
            self.parser.min_detection_lines = parser.min_detection_lines;
        }
        if parser.min_content_length != defaults.parser.min_content_length {
            self.parser.min_content_length = parser.min_content_length;
        }
        if parser.max_content_size != defaults.parser.max_content_size {
            self.parser.max_content_size = parser.max_content_size;
        }
        if parser.max_line_length != defaults.parser.max_line_length {
            self.parser.max_line_length = parser.max_line_length;
        }
        if !parser.custom_patterns.is_empty() {
            self.parser.custom_patterns = parser.custom_patterns.clone();
        }
        if parser.internal_functions != defaults.parser.internal_functions {
            self.parser.internal_functions = parser.internal_functions.clone();
        }
        if parser.internal_markers != defaults.parser.internal_markers {
            self.parser.internal_markers = parser.internal_markers.clone();
        }

        if other.clipboard.polling_interval_ms != defaults.clipboard.polling_interval_ms {
            self.clipboard.polling_interval_ms = other.clipboard.polling_interval_ms;
        }
        if other.clipboard.max_content_size != defaults.clipboard.max_content_size {
            self.clipboard.max_content_size = other.clipboard.max_content_size;
        }

        if other.output.verbose != defaults.output.verbose {
            self.output.verbose = other.output.verbose;
        }
        if other.output.quiet != defaults.output.quiet {
            self.output.quiet = other.output.quiet;
        }
        if other.output.show_timestamp != defaults.output.show_timestamp {
            self.output.show_timestamp = other.output.show_timestamp;
        }
        if other.script.output_format != defaults.script.output_format {
            self.script.output_format = other.script.output_format;
        }
        if other.script.exit_code_on_error != defaults.script.exit_code_on_error {
            self.script.exit_code_on_error = other.script.exit_code_on_error;
        }
        if other.auto_detect_script_mode != defaults.auto_detect_script_mode {
            self.auto_detect_script_mode = other.auto_detect_script_mode;
        }
    }

    /// Save configuration to a specific path, atomically.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| TraceTrimError::InvalidConfig {
            message: format!("Failed to serialize config: {e}"),
        })?;
        atomic_write(path, content.as_bytes())
    }

    /// Check every value against its accepted range and compile custom
    /// patterns.
    pub fn validate(&self) -> Result<()> {
        let interval = self.clipboard.polling_interval_ms;
        if interval < MIN_POLLING_INTERVAL_MS {
            return Err(TraceTrimError::config(format!(
                "clipboard polling interval must be at least {MIN_POLLING_INTERVAL_MS}ms"
            )));
        }
        if interval > MAX_POLLING_INTERVAL_MS {
            return Err(TraceTrimError::config(format!(
                "clipboard polling interval must be at most {MAX_POLLING_INTERVAL_MS}ms"
            )));
        }

        let size = self.clipboard.max_content_size;
        if size < MIN_CLIPBOARD_CONTENT_SIZE {
            return Err(TraceTrimError::config(
                "clipboard max content size must be at least 1KB",
            ));
        }
        if size > MAX_CLIPBOARD_CONTENT_SIZE {
            return Err(TraceTrimError::config(
                "clipboard max content size must be at most 50MB",
            ));
        }

        if !DETECTION_LINES_RANGE.contains(&self.parser.min_detection_lines) {
            return Err(TraceTrimError::config(format!(
                "parser min detection lines must be between {} and {}",
                DETECTION_LINES_RANGE.start(),
                DETECTION_LINES_RANGE.end()
            )));
        }
        if !CONTENT_LENGTH_RANGE.contains(&self.parser.min_content_length) {
            return Err(TraceTrimError::config(format!(
                "parser min content length must be between {} and {}",
                CONTENT_LENGTH_RANGE.start(),
                CONTENT_LENGTH_RANGE.end()
            )));
        }
        if self.parser.max_line_length == 0 || self.parser.max_content_size == 0 {
            return Err(TraceTrimError::config(
                "parser size limits must be greater than zero",
            ));
        }

        for (index, pattern) in self.parser.custom_patterns.iter().enumerate() {
            if pattern.trim().is_empty() {
                return Err(TraceTrimError::EmptyPattern { index });
            }
            Regex::new(pattern).map_err(|source| TraceTrimError::InvalidPattern {
                index,
                pattern: pattern.clone(),
                source,
            })?;
        }

        Ok(())
    }

    /// Clipboard polling interval.
    #[must_use]
    pub fn polling_interval(&self) -> Duration {
        Duration::from_millis(self.clipboard.polling_interval_ms)
    }
}

/// Clipboard monitoring configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardConfig {
    /// How often to check for clipboard changes, in milliseconds.
    #[serde(default = "default_polling_interval")]
    pub polling_interval_ms: u64,
    /// Largest clipboard text processed, in bytes.
    #[serde(default = "default_clipboard_max_content_size")]
    pub max_content_size: usize,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            polling_interval_ms: DEFAULT_POLLING_INTERVAL_MS,
            max_content_size: DEFAULT_CLIPBOARD_MAX_CONTENT_SIZE,
        }
    }
}

/// Console output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Print detailed progress.
    #[serde(default)]
    pub verbose: bool,
    /// Suppress non-essential output.
    #[serde(default)]
    pub quiet: bool,
    /// Prefix notifications with `[HH:MM:SS]`.
    #[serde(default = "default_true")]
    pub show_timestamp: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            quiet: false,
            show_timestamp: true,
        }
    }
}

/// What script mode writes to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptFormat {
    /// The cleaned text only.
    #[default]
    Cleaned,
    /// The full result as JSON.
    Json,
    /// A statistics summary.
    Stats,
}

/// Script mode configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptConfig {
    /// Output format.
    #[serde(default)]
    pub output_format: ScriptFormat,
    /// Exit with an error when input is empty, too large or not a trace.
    #[serde(default)]
    pub exit_code_on_error: bool,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            output_format: ScriptFormat::Cleaned,
            exit_code_on_error: false,
        }
    }
}

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_polling_interval() -> u64 {
    DEFAULT_POLLING_INTERVAL_MS
}

fn default_clipboard_max_content_size() -> usize {
    DEFAULT_CLIPBOARD_MAX_CONTENT_SIZE
}

/// Get the default configuration path.
pub fn default_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or_else(|| TraceTrimError::Unsupported {
        feature: "config directory discovery".to_string(),
    })?;

    Ok(config_dir.join("tracetrim").join("config.toml"))
}
