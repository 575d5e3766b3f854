//! Flipside Pinball - a physics-driven pinball table
//!
//! Core modules:
//! - `sim`: Rigid-body world, game objects, collision response, playfield tick
//! - `phase`: Game phase state machine (splash, menu, play, pause, scores)
//! - `platform`: Render/audio/asset/input collaborators the core drives
//! - `highscores`: Persisted top-10 score ledger
//! - `settings`: Persisted volume preferences
//! - `config`: Tunable game configuration

pub mod config;
pub mod highscores;
pub mod phase;
pub mod platform;
pub mod settings;
pub mod sim;

pub use config::GameConfig;
pub use highscores::{ScoreEntry, ScoreLedger};
pub use phase::{GameApp, Phase};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep, one step per gameplay update (60 Hz)
    pub const PHYSICS_DT: f32 = 1.0 / 60.0;
    /// Solver iterations handed to the physics world each step
    pub const VELOCITY_ITERATIONS: usize = 6;
    pub const POSITION_ITERATIONS: usize = 2;

    /// Table gravity (units/s², down the table)
    pub const GRAVITY: Vec2 = Vec2::new(0.0, -5.0);

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 0.5;
    pub const BALL_SPAWN: Vec2 = Vec2::new(4.5, 4.0);
    pub const BALL_DENSITY: f32 = 0.7;
    pub const BALL_RESTITUTION: f32 = 0.5;
    pub const BALL_FRICTION: f32 = 0.2;

    /// Lives at the start of a session
    pub const STARTING_LIVES: u32 = 3;

    /// Points per scoring episode
    pub const BARRIER_POINTS: u64 = 25;
    pub const FLIPPER_POINTS: u64 = 10;
    pub const BUMPER_POINTS: u64 = 15;

    /// Flipper motor speed while a button is held (rad/s)
    pub const FLIPPER_MOTOR_SPEED: f32 = 1000.0;
    /// Motor speed the flippers are created with (resting, pulled down)
    pub const FLIPPER_REST_SPEED: f32 = 500.0;
    pub const FLIPPER_MAX_TORQUE: f32 = 1000.0;
    /// Flipper swing limit either side of horizontal (degrees)
    pub const FLIPPER_SWING_DEG: f32 = 30.0;

    /// Splash screen duration before the menu appears (seconds)
    pub const SPLASH_SECONDS: f32 = 3.0;
    /// Delay between choosing Exit and the loop ending (seconds)
    pub const EXIT_SECONDS: f32 = 1.0;

    /// Volume steps (0..=MAX_VOLUME), pushed to audio as percent
    pub const MAX_VOLUME: u8 = 10;
    pub const DEFAULT_VOLUME: u8 = 7;

    /// Leaderboard sway speed (radians of phase per second)
    pub const LEADERBOARD_SWAY_RATE: f32 = 1.4;

    /// Screen dimensions (4:3 portrait)
    pub const SCREEN_WIDTH: f32 = 750.0;
    pub const SCREEN_HEIGHT: f32 = 1000.0;
}
