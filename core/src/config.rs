//! Engine configuration (glidebridge.toml)
//!
//! Every section and field has a default so partial files and empty files
//! are valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::ConfigError;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub debug: DebugConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Draw the watermark on the title screen (default: true)
    #[serde(default = "default_true")]
    pub logo: bool,
}

/// Motion smoothing parameters.
///
/// `approach_rate` and `direction_blend` were tuned by eye at 60 Hz and may
/// want adjusting for other refresh rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Enable motion prediction (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Fraction of the remaining gap closed per second (default: 30.0)
    #[serde(default = "default_approach_rate")]
    pub approach_rate: f32,
    /// Weight of the newest stroke direction for weather particles (default: 0.1)
    #[serde(default = "default_direction_blend")]
    pub direction_blend: f32,
    /// Unit jumps longer than this many pixels are not smoothed (default: 400.0)
    #[serde(default = "default_unit_snap_distance")]
    pub unit_snap_distance: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Write every sourced texture to `dump_dir` as PNG (default: false)
    #[serde(default)]
    pub dump_textures: bool,
    /// Directory for texture dumps (default: "dump")
    #[serde(default = "default_dump_dir")]
    pub dump_dir: PathBuf,
    /// Collect per-category timings (default: false)
    #[serde(default)]
    pub profile: bool,
    /// Report timings for frames slower than this (default: 50.0)
    #[serde(default = "default_profile_threshold_ms")]
    pub profile_threshold_ms: f32,
}

fn default_true() -> bool {
    true
}
fn default_approach_rate() -> f32 {
    30.0
}
fn default_direction_blend() -> f32 {
    0.1
}
fn default_unit_snap_distance() -> f32 {
    400.0
}
fn default_dump_dir() -> PathBuf {
    PathBuf::from("dump")
}
fn default_profile_threshold_ms() -> f32 {
    50.0
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            logo: default_true(),
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            approach_rate: default_approach_rate(),
            direction_blend: default_direction_blend(),
            unit_snap_distance: default_unit_snap_distance(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            dump_textures: false,
            dump_dir: default_dump_dir(),
            profile: false,
            profile_threshold_ms: default_profile_threshold_ms(),
        }
    }
}

impl Config {
    /// Parse and validate a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.motion;
        if !(m.approach_rate > 0.0) {
            return Err(ConfigError::Invalid {
                field: "motion.approach_rate",
                reason: format!("must be positive, got {}", m.approach_rate),
            });
        }
        if !(m.direction_blend > 0.0 && m.direction_blend <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "motion.direction_blend",
                reason: format!("must be in (0, 1], got {}", m.direction_blend),
            });
        }
        if !(m.unit_snap_distance >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "motion.unit_snap_distance",
                reason: format!("must not be negative, got {}", m.unit_snap_distance),
            });
        }
        Ok(())
    }
}

/// Loads and validates the configuration at `path`.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Config::from_toml_str(&content)
}

/// Loads the configuration, falling back to defaults.
///
/// A missing file is silent; an unreadable or invalid one is logged.
pub fn load_or_default(path: &Path) -> Config {
    if !path.exists() {
        return Config::default();
    }
    load(path).unwrap_or_else(|e| {
        warn!("{e}, using defaults");
        Config::default()
    })
}

/// Saves the configuration to `path`, creating parent directories.
pub fn save(config: &Config, path: &Path) -> Result<(), ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(io_err)?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(io_err)?;
    Ok(())
}
