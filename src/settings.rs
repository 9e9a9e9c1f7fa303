//! Player settings and preferences
//!
//! Persisted separately from the best score through the same [`Storage`]
//! backend. Failures fall back to defaults.

use serde::{Deserialize, Serialize};

use crate::persistence::{Storage, StorageError};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// All sound off
    pub muted: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f32,

    // === Visual Effects ===
    /// Screen shake on hits
    pub screen_shake: bool,
    /// Particle bursts and confetti
    pub particles: bool,

    // === HUD ===
    pub show_fps: bool,

    // === Accessibility ===
    /// Reduced motion (no shake, no confetti)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            muted: false,
            master_volume: 0.4,
            music_volume: 0.15,

            screen_shake: true,
            particles: true,

            show_fps: false,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Storage key for the full settings document
    const STORAGE_KEY: &'static str = "whackamole_settings";
    /// Standalone mute flag (`"true"`/`"false"`), kept in sync for older saves
    const MUTED_KEY: &'static str = "whackamole_muted";

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective particles (respects reduced_motion for the big effects)
    pub fn effective_confetti(&self) -> bool {
        self.particles && !self.reduced_motion
    }

    /// Volume to play effects at (0 when muted)
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0)
        }
    }

    /// Background music level, scaled by master volume (0 when muted)
    pub fn effective_music_volume(&self) -> f32 {
        self.effective_volume() * self.music_volume.clamp(0.0, 1.0)
    }

    /// Flip mute; returns the new state
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        log::info!("Sound {}", if self.muted { "muted" } else { "unmuted" });
        self.muted
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load<S: Storage + ?Sized>(storage: &S) -> Self {
        match Self::try_load(storage) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not load settings, using defaults: {e}");
                Self::default()
            }
        }
    }

    /// Save settings; failures are logged only
    pub fn save<S: Storage + ?Sized>(&self, storage: &mut S) {
        if let Err(e) = self.try_save(storage) {
            log::warn!("Could not save settings: {e}");
        } else {
            log::debug!("Settings saved");
        }
    }

    fn try_load<S: Storage + ?Sized>(storage: &S) -> Result<Option<Self>, StorageError> {
        if let Some(json) = storage.get_item(Self::STORAGE_KEY)? {
            return Ok(Some(serde_json::from_str(&json)?));
        }
        // Only the mute flag was ever stored
        Ok(storage.get_item(Self::MUTED_KEY)?.map(|muted| Self {
            muted: muted == "true",
            ..Self::default()
        }))
    }

    fn try_save<S: Storage + ?Sized>(&self, storage: &mut S) -> Result<(), StorageError> {
        storage.set_item(Self::STORAGE_KEY, &serde_json::to_string(self)?)?;
        storage.set_item(Self::MUTED_KEY, if self.muted { "true" } else { "false" })
    }
}
