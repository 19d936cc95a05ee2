//! JSON configuration for a demo session.
//!
//! Every field is optional in the file; missing ones take their defaults.
//!
//! ```json
//! {
//!   "window": { "title": "Tumble", "width": 360, "height": 640, "scale": 1.0 },
//!   "tick_rate": 60.0,
//!   "seed": 7,
//!   "physics": { "gravity": { "x": 0.0, "y": 980.0 } },
//!   "spawn": { "box_size": { "x": 24.0, "y": 24.0 }, "box_chance": 0.5 }
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tumble_engine::physics::PhysicsConfig;

use crate::params::SpawnParameters;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("tick rate must be positive and finite, got {0}")]
    InvalidTickRate(f64),
}

/// Window presentation settings. Only carried through; nothing is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub scale: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Tumble".to_owned(),
            width: 360,
            height: 640,
            scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub window: WindowConfig,
    /// Ticks per second.
    pub tick_rate: f64,
    pub seed: u64,
    pub physics: PhysicsConfig,
    pub spawn: SpawnParameters,
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    pub log_filter: Option<String>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            tick_rate: 60.0,
            seed: 0,
            physics: PhysicsConfig::default(),
            spawn: SpawnParameters::default(),
            log_filter: None,
        }
    }
}

impl DemoConfig {
    /// Read, parse and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::read(path)?.validated()
    }

    /// Read and parse a config file without validating it.
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config)
    }

    /// Check the tick rate and pull spawn parameters into widget range.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        if !(self.tick_rate > 0.0 && self.tick_rate.is_finite()) {
            return Err(ConfigError::InvalidTickRate(self.tick_rate));
        }
        if !self.spawn.is_within_bounds() {
            tracing::warn!(spawn = ?self.spawn, "spawn parameters out of range; clamping");
            self.spawn = self.spawn.clamped();
        }
        Ok(self)
    }

    pub fn fixed_dt(&self) -> f64 {
        1.0 / self.tick_rate
    }
}
