//! Game settings and preferences
//!
//! User-facing knobs, separate from the simulation's `GameConfig`: nothing in
//! here changes how the game plays, only how it sounds, looks and is
//! controlled. Loaded from JSON; missing keys keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::platform::KeyBindings;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Silence everything
    pub muted: bool,

    // === HUD ===
    /// Outline collision boxes (debug)
    pub show_hitboxes: bool,

    // === Controls ===
    pub key_bindings: KeyBindings,
    /// Start in demo mode (autopilot plays)
    pub idle_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,

            show_hitboxes: false,

            key_bindings: KeyBindings::default(),
            idle_mode: false,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.clamp_volumes();
        Ok(settings)
    }

    /// Load settings from a file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("Using default settings");
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    fn clamp_volumes(&mut self) {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
    }
}
