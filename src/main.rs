//! Flipside Pinball entry point
//!
//! Runs a headless attract session: a scripted player starts a game, flaps
//! the flippers for a while, quits, walks through the score screens and
//! exits. Everything is drawn into the recording platform.

#[cfg(not(target_arch = "wasm32"))]
use flipside_pinball::{
    GameApp, GameConfig, Phase,
    consts::PHYSICS_DT,
    platform::{Button, ButtonTracker, Buttons, HeadlessPlatform},
};

/// Hard stop for the attract loop (ten minutes of frames)
#[cfg(not(target_arch = "wasm32"))]
const MAX_FRAMES: u64 = 60 * 60 * 10;

/// Simulation ticks the scripted player plays before quitting
#[cfg(not(target_arch = "wasm32"))]
const ATTRACT_TICKS: u64 = 60 * 45;

/// Scripted controller for the attract session
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
struct AttractScript {
    played: bool,
}

#[cfg(not(target_arch = "wasm32"))]
impl AttractScript {
    /// Buttons held this frame. Menu presses go out on even frames only so
    /// each one is a fresh edge.
    fn buttons(&mut self, frame: u64, app: &GameApp<HeadlessPlatform>) -> Buttons {
        let pulse = |button: Button| {
            if frame % 2 == 0 {
                Buttons::from(button)
            } else {
                Buttons::NONE
            }
        };

        match app.phase() {
            Phase::Init | Phase::Exit => Buttons::NONE,
            Phase::Menu if self.played => pulse(Button::Circle),
            Phase::Menu => pulse(Button::Cross),
            Phase::Options => pulse(Button::Circle),
            Phase::InGame => {
                let ticks = app.session().map_or(0, |s| s.time_ticks);
                if ticks > ATTRACT_TICKS {
                    pulse(Button::Select)
                } else if frame % 40 < 10 {
                    Button::L1 | Button::R1
                } else {
                    Buttons::NONE
                }
            }
            Phase::Pause if app.cursor().index() < 3 => pulse(Button::Down),
            Phase::Leaderboard => {
                self.played = true;
                pulse(Button::Cross)
            }
            Phase::Pause | Phase::Credits | Phase::GameOver | Phase::NewScore => {
                pulse(Button::Cross)
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Flipside Pinball (headless) starting...");

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "pinball.json".to_string());
    let config = GameConfig::load(&path).unwrap_or_else(|e| {
        log::error!("Config {} unusable ({}), using defaults", path, e);
        GameConfig::default()
    });
    for warning in config.validate() {
        log::warn!("Config: {}", warning);
    }

    let platform = HeadlessPlatform::new(config.screen_width, config.screen_height);
    let mut app = GameApp::new(platform, config);
    let mut tracker = ButtonTracker::default();
    let mut script = AttractScript::default();

    let mut frame = 0;
    while frame < MAX_FRAMES {
        let input = tracker.update(script.buttons(frame, &app));
        if !app.update(PHYSICS_DT, &input) {
            break;
        }
        app.render();
        frame += 1;
    }
    if frame == MAX_FRAMES {
        log::warn!("Attract session hit the frame limit in {:?}", app.phase());
    }

    let top = app.ledger().top_score().unwrap_or(0);
    let platform = app.shutdown();
    log::info!(
        "Attract session done: {} frames drawn, top score {}",
        platform.frames_drawn(),
        top
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The core has no browser host; the library is driven by an embedding
}
