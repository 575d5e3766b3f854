//! Game phase state machine
//!
//! One `GameApp` owns the platform collaborators, the persisted ledger and
//! settings, and (while a game runs) the live playfield. Each phase has an
//! init, update, render and release step; transitions fire on pressed edges
//! except for the splash and exit timers.

mod credits;
mod frontend;
mod game;
mod interval;
mod options;

pub use interval::NameEntry;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::GameConfig;
use crate::highscores::ScoreLedger;
use crate::platform::audio::SFX_FILES;
use crate::platform::render::{BACKGROUND_DEPTH, Color, HIGHLIGHT, WHITE};
use crate::platform::{
    AssetLoader, FontHandle, InputFrame, Justify, Platform, SampleId, SceneHandle, SpriteDraw,
    TextDraw, TextureHandle, TextureSlot,
};
use crate::settings::{Settings, VolumeChannel};
use crate::sim::Playfield;

/// Depth of the always-on HUD text (frame rate, lives, score)
const HUD_DEPTH: f32 = -0.9;

const SIMPLE_BACKGROUND: &str = "simplebg.png";
const SPACE_BACKGROUND: &str = "spacedust.png";

/// Top-level game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Splash screen, leaves for the menu on a timer
    Init,
    Menu,
    Options,
    Credits,
    /// Active gameplay, the only phase that steps physics
    InGame,
    /// Gameplay frozen under the pause menu
    Pause,
    GameOver,
    /// Three-letter name entry for a new high score
    NewScore,
    Leaderboard,
    /// Saving and shutting down
    Exit,
}

impl Phase {
    /// Phases drawn over the space backdrop rather than the plain one
    pub fn uses_space_background(self) -> bool {
        matches!(self, Phase::InGame | Phase::Pause | Phase::GameOver)
    }

    /// True while a playfield exists
    pub fn has_session(self) -> bool {
        matches!(self, Phase::InGame | Phase::Pause)
    }
}

/// Selection over a four-row menu
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuCursor(usize);

impl MenuCursor {
    pub const ROWS: usize = 4;

    pub fn index(self) -> usize {
        self.0
    }

    pub fn up(&mut self) {
        self.0 = self.0.saturating_sub(1);
    }

    pub fn down(&mut self) {
        self.0 = (self.0 + 1).min(Self::ROWS - 1);
    }

    /// Text colour for `row`
    pub fn color(self, row: usize) -> Color {
        if self.0 == row { HIGHLIGHT } else { WHITE }
    }
}

/// Textures owned by the current phase, freed together on release
#[derive(Debug, Default)]
struct TextureSet {
    slots: Vec<(&'static str, TextureSlot)>,
}

impl TextureSet {
    /// Replace the set: frees whatever was held, then loads `paths`
    fn load<A: AssetLoader + ?Sized>(&mut self, assets: &mut A, paths: &[&'static str]) {
        self.release(assets);
        for path in paths {
            self.slots.push((path, TextureSlot::load(assets, path)));
        }
    }

    fn get(&self, path: &str) -> Option<TextureHandle> {
        self.slots
            .iter()
            .find(|(p, _)| *p == path)
            .and_then(|(_, slot)| slot.get())
    }

    fn release<A: AssetLoader + ?Sized>(&mut self, assets: &mut A) {
        for (_, slot) in &mut self.slots {
            slot.release(assets);
        }
        self.slots.clear();
    }
}

/// The game: phase machine plus everything it owns
pub struct GameApp<P: Platform> {
    platform: P,
    config: GameConfig,
    settings: Settings,
    ledger: ScoreLedger,
    phase: Phase,
    font: Option<FontHandle>,
    simple_background: TextureSlot,
    space_background: TextureSlot,
    sfx: Vec<Option<SampleId>>,
    textures: TextureSet,
    session: Option<Playfield>,
    scene: Option<SceneHandle>,
    last_score: u64,
    fps: f32,
    rng: Pcg32,
    timer: f32,
    cursor: MenuCursor,
    name: NameEntry,
    sway: f32,
    finished: bool,
}

impl<P: Platform> GameApp<P> {
    /// Load shared assets, the score ledger and settings, and show the splash
    pub fn new(mut platform: P, config: GameConfig) -> Self {
        let font = platform.load_font(&config.font);
        if font.is_none() {
            log::warn!("Font {} failed to load", config.font);
        }

        let ledger = match ScoreLedger::load(&config.scores_path) {
            Ok(ledger) => ledger,
            Err(e) => {
                log::warn!("High scores unavailable ({}), using defaults", e);
                ScoreLedger::with_defaults(&config.scores_path)
            }
        };
        let settings = Settings::load(&config.settings_path).unwrap_or_else(|e| {
            log::warn!("Settings unavailable ({}), using defaults", e);
            Settings::default()
        });

        let space_background = TextureSlot::load(&mut platform, SPACE_BACKGROUND);
        let simple_background = TextureSlot::load(&mut platform, SIMPLE_BACKGROUND);
        let sfx = SFX_FILES
            .iter()
            .map(|path| {
                let sample = platform.load_sample(path);
                if sample.is_none() {
                    log::warn!("Sample {} failed to load", path);
                }
                sample
            })
            .collect();

        let rng = Pcg32::seed_from_u64(config.seed);
        let mut app = Self {
            platform,
            config,
            settings,
            ledger,
            phase: Phase::Init,
            font,
            simple_background,
            space_background,
            sfx,
            textures: TextureSet::default(),
            session: None,
            scene: None,
            last_score: 0,
            fps: 0.0,
            rng,
            timer: 0.0,
            cursor: MenuCursor::default(),
            name: NameEntry::default(),
            sway: 0.0,
            finished: false,
        };
        app.interval_init();
        log::info!("Game initialised");
        app
    }

    /// Advance one frame. Returns false once the game has exited.
    pub fn update(&mut self, frame_time: f32, input: &InputFrame) -> bool {
        if self.finished {
            return false;
        }
        self.fps = if frame_time > 0.0 { 1.0 / frame_time } else { 0.0 };

        let running = match self.phase {
            Phase::Menu => {
                self.frontend_update(input);
                true
            }
            Phase::Options => {
                self.options_update(input);
                true
            }
            Phase::Credits => {
                self.credits_update(input);
                true
            }
            Phase::InGame | Phase::Pause => {
                self.game_update(input);
                true
            }
            Phase::Init
            | Phase::GameOver
            | Phase::NewScore
            | Phase::Leaderboard
            | Phase::Exit => self.interval_update(frame_time, input),
        };

        self.platform
            .set_sample_volume(self.settings.volume_percent(VolumeChannel::Sound));
        self.platform
            .set_music_volume(self.settings.volume_percent(VolumeChannel::Music));
        running
    }

    /// Draw the current phase
    pub fn render(&mut self) {
        match self.phase {
            Phase::Menu => self.frontend_render(),
            Phase::Options => self.options_render(),
            Phase::Credits => self.credits_render(),
            Phase::InGame | Phase::Pause => self.game_render(),
            Phase::Init
            | Phase::GameOver
            | Phase::NewScore
            | Phase::Leaderboard
            | Phase::Exit => self.interval_render(),
        }
    }

    /// Release everything still held and hand the platform back
    pub fn shutdown(mut self) -> P {
        if self.phase.has_session() {
            self.game_release();
        }
        self.textures.release(&mut self.platform);
        self.simple_background.release(&mut self.platform);
        self.space_background.release(&mut self.platform);
        if let Some(font) = self.font.take() {
            self.platform.free_font(font);
        }
        log::info!("Game shut down");
        self.platform
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn ledger(&self) -> &ScoreLedger {
        &self.ledger
    }

    /// The live playfield, present in InGame and Pause
    pub fn session(&self) -> Option<&Playfield> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut Playfield> {
        self.session.as_mut()
    }

    /// Score of the running game, or of the last one played
    pub fn score(&self) -> u64 {
        self.session.as_ref().map_or(self.last_score, |s| s.score)
    }

    pub fn name_entry(&self) -> &NameEntry {
        &self.name
    }

    pub fn cursor(&self) -> MenuCursor {
        self.cursor
    }

    fn enter(&mut self, phase: Phase) {
        log::info!("Phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    fn width(&self) -> f32 {
        self.platform.width()
    }

    fn height(&self) -> f32 {
        self.platform.height()
    }

    fn draw_background(&mut self) {
        let texture = if self.phase.uses_space_background() {
            self.space_background.get()
        } else {
            self.simple_background.get()
        };
        let (w, h) = (self.width(), self.height());
        let mut sprite = SpriteDraw::new(texture, Vec2::new(w * 0.5, h * 0.5), Vec2::new(w, h));
        sprite.position.z = BACKGROUND_DEPTH;
        self.platform.draw_sprite(sprite);
    }

    fn draw_hud(&mut self) {
        if self.font.is_some() {
            self.platform.draw_text(
                TextDraw::new(format!("FPS: {:.1}", self.fps), Vec2::new(700.0, 10.0))
                    .justify(Justify::Right)
                    .depth(HUD_DEPTH),
            );
        }
    }

    /// Button icon from the current phase's textures
    fn draw_button(&mut self, path: &str, position: Vec2, size: f32) {
        let texture = self.textures.get(path);
        self.platform
            .draw_sprite(SpriteDraw::new(texture, position, Vec2::splat(size)));
    }

    /// Label plus one square per volume step, on the sound and music rows
    fn draw_volume_rows(&mut self, sound_color: Color, music_color: Color) {
        let (w, h) = (self.width(), self.height());
        self.platform.draw_text(
            TextDraw::new("Sound Volume: ", Vec2::new(w * 0.35, h * 0.4 - 20.0))
                .color(sound_color)
                .justify(Justify::Right),
        );
        self.platform.draw_text(
            TextDraw::new("Music Volume: ", Vec2::new(w * 0.35, h * 0.4 + 20.0))
                .color(music_color)
                .justify(Justify::Right),
        );

        let rows = [
            (self.settings.sound_volume, h * 0.4 - 5.0),
            (self.settings.music_volume, h * 0.4 + 35.0),
        ];
        for (volume, y) in rows {
            for i in 0..volume {
                self.platform.draw_sprite(SpriteDraw::new(
                    None,
                    Vec2::new(w * 0.37 + f32::from(i) * 25.0, y),
                    Vec2::splat(20.0),
                ));
            }
        }
    }
}
