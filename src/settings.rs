//! Player settings
//!
//! Persisted as JSON next to the score file.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{DEFAULT_VOLUME, MAX_VOLUME};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings io: {0}")]
    Io(#[from] io::Error),
    #[error("settings json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Which volume a menu row adjusts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeChannel {
    Sound,
    Music,
}

/// Game settings/preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Sound effects volume (0 - 10)
    pub sound_volume: u8,
    /// Music volume (0 - 10)
    pub music_volume: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_volume: DEFAULT_VOLUME,
            music_volume: DEFAULT_VOLUME,
        }
    }
}

impl Settings {
    /// Load settings, falling back to defaults when the file is absent
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            log::info!("Using default settings");
            return Ok(Self::default());
        }
        let json = fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings.clamped())
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Volumes limited to 0..=MAX_VOLUME
    pub fn clamped(self) -> Self {
        Self {
            sound_volume: self.sound_volume.min(MAX_VOLUME),
            music_volume: self.music_volume.min(MAX_VOLUME),
        }
    }

    pub fn volume(&self, channel: VolumeChannel) -> u8 {
        match channel {
            VolumeChannel::Sound => self.sound_volume,
            VolumeChannel::Music => self.music_volume,
        }
    }

    /// Step a volume up or down, saturating at 0 and MAX_VOLUME
    pub fn adjust(&mut self, channel: VolumeChannel, up: bool) {
        let volume = match channel {
            VolumeChannel::Sound => &mut self.sound_volume,
            VolumeChannel::Music => &mut self.music_volume,
        };
        *volume = if up {
            (*volume + 1).min(MAX_VOLUME)
        } else {
            volume.saturating_sub(1)
        };
    }

    /// Volume as the percentage the audio output expects
    pub fn volume_percent(&self, channel: VolumeChannel) -> u8 {
        self.volume(channel).min(MAX_VOLUME) * 10
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjust_saturates() {
        let mut settings = Settings::default();
        for _ in 0..20 {
            settings.adjust(VolumeChannel::Sound, true);
        }
        assert_eq!(settings.sound_volume, MAX_VOLUME);
        assert_eq!(settings.volume_percent(VolumeChannel::Sound), 100);

        for _ in 0..20 {
            settings.adjust(VolumeChannel::Music, false);
        }
        assert_eq!(settings.music_volume, 0);
        assert_eq!(settings.sound_volume, MAX_VOLUME);
    }

    #[test]
    fn test_volume_percent_caps_out_of_range_fields() {
        let settings = Settings {
            sound_volume: 200,
            music_volume: 3,
        };
        assert_eq!(settings.volume_percent(VolumeChannel::Sound), 100);
        assert_eq!(settings.volume_percent(VolumeChannel::Music), 30);
    }

    #[test]
    fn test_round_trip_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        assert_eq!(Settings::load(&path).unwrap(), Settings::default());

        let settings = Settings {
            sound_volume: 3,
            music_volume: 9,
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_partial_and_out_of_range_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "music_volume": 42 }"#).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.sound_volume, DEFAULT_VOLUME);
        assert_eq!(settings.music_volume, MAX_VOLUME);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            Settings::load(&path),
            Err(SettingsError::Json(_))
        ));
    }
}
