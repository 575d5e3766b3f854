//! Game configuration
//!
//! Every field has a default, so a config file only needs the values it
//! overrides.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::{FixtureEvaluation, PlayfieldRules, ResponseRules};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config: {0}")]
    Io(#[from] io::Error),
    #[error("parse config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub scores_path: PathBuf,
    pub settings_path: PathBuf,
    pub screen_width: f32,
    pub screen_height: f32,
    /// Seconds on the splash screen before the menu
    pub splash_seconds: f32,
    /// Seconds between choosing exit and the loop stopping
    pub exit_seconds: f32,
    pub starting_lives: u32,
    pub barrier_points: u64,
    pub flipper_points: u64,
    pub bumper_points: u64,
    /// Flipper motor speed while driven (rad/s)
    pub flipper_speed: f32,
    pub fixture_evaluation: FixtureEvaluation,
    /// Seed for sound cue and music choices
    pub seed: u64,
    pub font: String,
    pub table_scene: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            scores_path: PathBuf::from("scores.txt"),
            settings_path: PathBuf::from("settings.json"),
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            splash_seconds: SPLASH_SECONDS,
            exit_seconds: EXIT_SECONDS,
            starting_lives: STARTING_LIVES,
            barrier_points: BARRIER_POINTS,
            flipper_points: FLIPPER_POINTS,
            bumper_points: BUMPER_POINTS,
            flipper_speed: FLIPPER_MOTOR_SPEED,
            fixture_evaluation: FixtureEvaluation::BothSides,
            seed: 0x5eed,
            font: "comic_sans".into(),
            table_scene: "pinballFrame.scn".into(),
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let config = Self::from_json(&fs::read_to_string(path)?)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Suspicious values worth a warning. None of them stop the game.
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.screen_width <= 0.0 || self.screen_height <= 0.0 {
            w.push(format!(
                "screen dimensions must be > 0, got {}x{}",
                self.screen_width, self.screen_height
            ));
        }
        if self.starting_lives == 0 {
            w.push("starting_lives is 0; the first lost ball ends the game".into());
        }
        if self.flipper_speed <= 0.0 {
            w.push(format!(
                "flipper_speed {} is not positive; flippers will not swing up",
                self.flipper_speed
            ));
        }
        if self.splash_seconds < 0.0 || self.exit_seconds < 0.0 {
            w.push("negative phase delay treated as immediate".into());
        }
        w
    }

    /// Gameplay rules for a new playfield
    pub fn playfield_rules(&self) -> PlayfieldRules {
        PlayfieldRules {
            response: ResponseRules {
                barrier_points: self.barrier_points,
                flipper_points: self.flipper_points,
                bumper_points: self.bumper_points,
                evaluation: self.fixture_evaluation,
            },
            starting_lives: self.starting_lives,
            flipper_speed: self.flipper_speed,
            ..PlayfieldRules::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_overrides() {
        let config = GameConfig::from_json(
            r#"{ "starting_lives": 5, "fixture_evaluation": "first_match" }"#,
        )
        .unwrap();
        assert_eq!(config.starting_lives, 5);
        assert_eq!(config.fixture_evaluation, FixtureEvaluation::FirstMatch);
        assert_eq!(config.screen_width, SCREEN_WIDTH);
        assert_eq!(config.scores_path, PathBuf::from("scores.txt"));

        let rules = config.playfield_rules();
        assert_eq!(rules.starting_lives, 5);
        assert_eq!(rules.response.evaluation, FixtureEvaluation::FirstMatch);
        assert_eq!(rules.ball_spawn, BALL_SPAWN);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = GameConfig::load(dir.path().join("pinball.json")).unwrap();
        assert_eq!(config, GameConfig::default());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_flags_bad_values() {
        let config = GameConfig {
            starting_lives: 0,
            flipper_speed: -1.0,
            ..Default::default()
        };
        assert_eq!(config.validate().len(), 2);
    }

    #[test]
    fn test_unparseable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pinball.json");
        fs::write(&path, "{ starting_lives: ").unwrap();
        assert!(matches!(GameConfig::load(&path), Err(ConfigError::Json(_))));
    }
}
