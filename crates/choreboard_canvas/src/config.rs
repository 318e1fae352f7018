//! # Replay Configuration
//!
//! Settings for the headless replay tool, loaded once at startup from TOML.
//! Every field is optional:
//!
//! ```toml
//! spawn_duration_ms = 2500
//! viewport_width = 1000.0
//! viewport_height = 800.0
//! device_pixel_ratio = 1.0
//! seed = 42
//! frame_interval_ms = 16.666666666666668
//! realtime = false
//! snapshot_tick = 30
//! snapshot_path = "confetti.ppm"
//! ```
//!
//! The engine itself has no configuration surface; particle count, palette
//! and physics are fixed.

use std::path::{Path, PathBuf};

use choreboard_confetti::clock::NOMINAL_FRAME_INTERVAL_MS;
use choreboard_confetti::{Viewport, DEFAULT_SPAWN_DURATION_MS};
use serde::Deserialize;

use crate::error::{CanvasError, CanvasResult};

/// Headless replay settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReplayConfig {
    /// Minimum session length in milliseconds.
    pub spawn_duration_ms: u32,
    /// Logical viewport width.
    pub viewport_width: f32,
    /// Logical viewport height.
    pub viewport_height: f32,
    /// Physical pixels per logical pixel.
    pub device_pixel_ratio: f32,
    /// RNG seed for the particle burst.
    pub seed: u64,
    /// Simulated frame interval (ignored when `realtime`).
    pub frame_interval_ms: f64,
    /// Pace frames against the wall clock instead of simulated time.
    pub realtime: bool,
    /// Tick whose frame is captured.
    pub snapshot_tick: Option<u64>,
    /// Where to write the captured frame as PPM.
    pub snapshot_path: Option<PathBuf>,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            spawn_duration_ms: DEFAULT_SPAWN_DURATION_MS,
            viewport_width: 1000.0,
            viewport_height: 800.0,
            device_pixel_ratio: 1.0,
            seed: 42,
            frame_interval_ms: NOMINAL_FRAME_INTERVAL_MS,
            realtime: false,
            snapshot_tick: None,
            snapshot_path: None,
        }
    }
}

impl ReplayConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::ConfigParse`] for malformed TOML and
    /// [`CanvasError::InvalidConfig`] for out-of-range values.
    pub fn from_toml_str(source: &str) -> CanvasResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Io`] if the file cannot be read, otherwise as
    /// [`ReplayConfig::from_toml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> CanvasResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> CanvasResult<()> {
        if !(self.viewport_width > 0.0 && self.viewport_height > 0.0) {
            return Err(CanvasError::InvalidConfig(format!(
                "viewport must be positive, got {}x{}",
                self.viewport_width, self.viewport_height
            )));
        }
        if !(self.device_pixel_ratio > 0.0) {
            return Err(CanvasError::InvalidConfig(format!(
                "device_pixel_ratio must be positive, got {}",
                self.device_pixel_ratio
            )));
        }
        if !(self.frame_interval_ms > 0.0) {
            return Err(CanvasError::InvalidConfig(format!(
                "frame_interval_ms must be positive, got {}",
                self.frame_interval_ms
            )));
        }
        if self.snapshot_path.is_some() && self.snapshot_tick.is_none() {
            return Err(CanvasError::InvalidConfig(
                "snapshot_path requires snapshot_tick".to_string(),
            ));
        }
        Ok(())
    }

    /// Viewport described by this config.
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport_width, self.viewport_height)
    }
}
