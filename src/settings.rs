//! Player preferences
//!
//! Stored as JSON next to the save file. Balancing numbers are not settings;
//! they live in `consts`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Audio latency offset range (ms)
pub const MIN_AUDIO_LATENCY_MS: i32 = -100;
pub const MAX_AUDIO_LATENCY_MS: i32 = 100;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    pub sound_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Shift applied to cue timing (ms)
    pub audio_latency_ms: i32,

    // === Visual Effects ===
    /// Screen shake on critical hits
    pub screen_shake: bool,
    /// Floating damage numbers
    pub damage_numbers: bool,

    // === Accessibility ===
    /// Reduced motion (suppresses shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            audio_latency_ms: 0,

            screen_shake: true,
            damage_numbers: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = clamp_unit(vol);
    }

    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = clamp_unit(vol);
    }

    pub fn set_audio_latency_ms(&mut self, ms: i32) {
        self.audio_latency_ms = ms.clamp(MIN_AUDIO_LATENCY_MS, MAX_AUDIO_LATENCY_MS);
    }

    /// Pull every field back into range
    pub fn sanitized(mut self) -> Self {
        self.set_master_volume(self.master_volume);
        self.set_sfx_volume(self.sfx_volume);
        self.set_audio_latency_ms(self.audio_latency_ms);
        self
    }

    /// Load settings from `path`, falling back to defaults on any failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<Settings>(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings.sanitized()
                }
                Err(e) => {
                    log::warn!("Bad settings file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to `path` (best-effort)
    pub fn save(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        match serde_json::to_string_pretty(self) {
            Ok(json) => match fs::write(path, json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Failed to save settings to {}: {}", path.display(), e),
            },
            Err(e) => log::warn!("Failed to serialize settings: {}", e),
        }
    }
}

fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduced_motion_disables_shake() {
        let mut settings = Settings::default();
        assert!(settings.effective_screen_shake());
        settings.reduced_motion = true;
        assert!(!settings.effective_screen_shake());
    }

    #[test]
    fn test_setters_clamp() {
        let mut settings = Settings::default();
        settings.set_master_volume(1.7);
        settings.set_sfx_volume(-0.2);
        settings.set_audio_latency_ms(-500);
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.sfx_volume, 0.0);
        assert_eq!(settings.audio_latency_ms, -100);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"reduced_motion": true, "master_volume": 4.0}"#).unwrap();
        let settings = settings.sanitized();
        assert!(settings.reduced_motion);
        assert_eq!(settings.master_volume, 1.0);
        assert!(settings.sound_enabled);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join(format!(
            "wave-arena-settings-missing-{}.json",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!(
            "wave-arena-settings-{}.json",
            std::process::id()
        ));
        let mut settings = Settings::default();
        settings.damage_numbers = false;
        settings.set_audio_latency_ms(35);
        settings.save(&path);
        assert_eq!(Settings::load(&path), settings);
        let _ = fs::remove_file(&path);
    }
}
