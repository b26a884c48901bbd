//! Application settings.
//!
//! Settings are an explicit value object passed into constructors, never an
//! ambient global. They persist as a flat JSON document; every field has a
//! documented default so partial or missing files load cleanly.

use crate::error::{Error, Result};
use crate::pet::PetVariant;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default settings file name.
pub const DEFAULT_SETTINGS_FILE: &str = "vpet_settings.json";

/// Default pet variant.
const DEFAULT_PET_VARIANT: PetVariant = PetVariant::Cat;

/// Default sprite scale factor.
const DEFAULT_PET_SCALE: f64 = 1.0;

/// Default simulated-time tick interval in milliseconds.
const DEFAULT_TICK_INTERVAL_MS: u64 = 5000;

/// Default roam interval in milliseconds (window repositioning cadence).
const DEFAULT_ROAM_INTERVAL_MS: u64 = 30000;

/// Default autosave cadence, in ticks (0 disables autosave).
const DEFAULT_AUTOSAVE_EVERY_TICKS: u32 = 12;

/// Application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Which pet to create at startup.
    #[serde(default = "default_pet_variant")]
    pub pet_variant: PetVariant,

    /// Sprite scale factor for the presentation layer.
    #[serde(default = "default_pet_scale")]
    pub pet_scale: f64,

    /// Whether the pet window stays above other windows.
    #[serde(default = "default_true")]
    pub always_on_top: bool,

    /// Whether the pet window background is transparent.
    #[serde(default = "default_true")]
    pub transparent: bool,

    /// Milliseconds of wall time per simulated tick.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Milliseconds between window roam moves.
    #[serde(default = "default_roam_interval_ms")]
    pub roam_interval_ms: u64,

    /// Whether talking to the conversational agent is enabled.
    #[serde(default = "default_true")]
    pub ai_enabled: bool,

    /// Autosave the pet state every N ticks (0 disables autosave).
    #[serde(default = "default_autosave_every_ticks")]
    pub autosave_every_ticks: u32,
}

fn default_pet_variant() -> PetVariant {
    DEFAULT_PET_VARIANT
}

fn default_pet_scale() -> f64 {
    DEFAULT_PET_SCALE
}

fn default_true() -> bool {
    true
}

fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}

fn default_roam_interval_ms() -> u64 {
    DEFAULT_ROAM_INTERVAL_MS
}

fn default_autosave_every_ticks() -> u32 {
    DEFAULT_AUTOSAVE_EVERY_TICKS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pet_variant: DEFAULT_PET_VARIANT,
            pet_scale: DEFAULT_PET_SCALE,
            always_on_top: true,
            transparent: true,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            roam_interval_ms: DEFAULT_ROAM_INTERVAL_MS,
            ai_enabled: true,
            autosave_every_ticks: DEFAULT_AUTOSAVE_EVERY_TICKS,
        }
    }
}

impl Settings {
    /// Create settings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pet variant.
    pub fn pet_variant(mut self, variant: PetVariant) -> Self {
        self.pet_variant = variant;
        self
    }

    /// Set the tick interval in milliseconds.
    pub fn tick_interval_ms(mut self, ms: u64) -> Self {
        self.tick_interval_ms = ms;
        self
    }

    /// Enable or disable the conversational agent.
    pub fn ai_enabled(mut self, enabled: bool) -> Self {
        self.ai_enabled = enabled;
        self
    }

    /// Set the autosave cadence in ticks (0 disables autosave).
    pub fn autosave_every_ticks(mut self, ticks: u32) -> Self {
        self.autosave_every_ticks = ticks;
        self
    }

    /// The tick interval as a `Duration`.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Load settings from a JSON file.
    ///
    /// Never fails: a missing, unreadable, or malformed file is logged and
    /// yields defaults; fields missing from the document take their
    /// defaults individually.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Self::default();
        }

        match Self::read_file(path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load settings, using defaults");
                Self::default()
            }
        }
    }

    fn read_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::SettingsRead {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| Error::SettingsParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save settings to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self).map_err(|source| Error::SettingsParse {
            path: path.to_path_buf(),
            source,
        })?;

        std::fs::write(path, content).map_err(|source| Error::SettingsWrite {
            path: path.to_path_buf(),
            source,
        })
    }
}
