//! Settings consumed by the gesture core.

use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Default remote stream resolution.
pub const DEFAULT_REFERENCE_WIDTH: u32 = 1920;
pub const DEFAULT_REFERENCE_HEIGHT: u32 = 1080;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Forward single-finger motion as a target position instead of a delta.
    pub absolute_mouse_mode: bool,
    /// Width of the remote virtual coordinate space that deltas are scaled into.
    pub reference_width: u32,
    pub reference_height: u32,
    /// Hold time after which a still finger starts a button-held drag.
    /// `None` leaves drags purely distance gated.
    pub drag_hold_ms: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            absolute_mouse_mode: false,
            reference_width: DEFAULT_REFERENCE_WIDTH,
            reference_height: DEFAULT_REFERENCE_HEIGHT,
            drag_hold_ms: None,
        }
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        log::info!("[touch] loading config from {}", path.display());
        Self::from_toml_str(&raw)
    }

    fn validate(&self) -> Result<()> {
        if self.reference_width == 0 || self.reference_height == 0 {
            return Err(Error::InvalidConfig(format!(
                "reference resolution must be non-zero, got {}x{}",
                self.reference_width, self.reference_height
            )));
        }
        Ok(())
    }
}
