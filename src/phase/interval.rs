//! Screens between games: splash, game over, name entry, leaderboard, exit

use glam::Vec2;

use super::frontend::CROSS_ICON;
use super::{GameApp, Phase};
use crate::consts::LEADERBOARD_SWAY_RATE;
use crate::highscores::{NAME_ALPHABET, NAME_LENGTH};
use crate::platform::render::{HIGHLIGHT, WHITE};
use crate::platform::{Button, InputFrame, Justify, Platform, SpriteDraw, TextDraw};

const LOGO: &str = "logo.png";

/// Cursor over a three-letter name, each letter an index into the alphabet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NameEntry {
    letters: [usize; NAME_LENGTH],
    cursor: usize,
}

impl NameEntry {
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Letter index at `slot`
    pub fn letter(&self, slot: usize) -> usize {
        self.letters[slot]
    }

    /// Previous letter in the alphabet at the cursor, wrapping
    pub fn up(&mut self) {
        let letter = &mut self.letters[self.cursor];
        *letter = (*letter + NAME_ALPHABET.len() - 1) % NAME_ALPHABET.len();
    }

    /// Next letter in the alphabet at the cursor, wrapping
    pub fn down(&mut self) {
        let letter = &mut self.letters[self.cursor];
        *letter = (*letter + 1) % NAME_ALPHABET.len();
    }

    /// Move the cursor right. Returns false if it was already on the last letter.
    pub fn advance(&mut self) -> bool {
        if self.cursor + 1 < NAME_LENGTH {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    pub fn back(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn name(&self) -> String {
        self.letters
            .iter()
            .map(|&i| char::from(NAME_ALPHABET[i]))
            .collect()
    }

    /// Letters either side of `slot` as shown above and below it
    fn neighbours(&self, slot: usize) -> (char, char) {
        let n = NAME_ALPHABET.len();
        let i = self.letters[slot];
        (
            char::from(NAME_ALPHABET[(i + n - 1) % n]),
            char::from(NAME_ALPHABET[(i + 1) % n]),
        )
    }
}

impl<P: Platform> GameApp<P> {
    pub(super) fn interval_init(&mut self) {
        self.timer = 0.0;
        self.name = NameEntry::default();
        self.sway = 0.0;
        self.textures.load(&mut self.platform, &[LOGO, CROSS_ICON]);
    }

    pub(super) fn interval_release(&mut self) {
        self.timer = 0.0;
        self.name = NameEntry::default();
        self.sway = 0.0;
        self.textures.release(&mut self.platform);
    }

    /// Returns false once the exit delay has passed
    pub(super) fn interval_update(&mut self, frame_time: f32, input: &InputFrame) -> bool {
        self.timer += frame_time;

        match self.phase {
            Phase::Init => {
                if self.timer > self.config.splash_seconds {
                    self.interval_release();
                    self.enter(Phase::Menu);
                    self.frontend_init();
                }
            }
            Phase::GameOver => {
                if input.just_pressed(Button::Cross) {
                    if self.ledger.is_high_score(self.last_score) {
                        self.enter(Phase::NewScore);
                    } else {
                        self.enter(Phase::Leaderboard);
                    }
                }
            }
            Phase::NewScore => self.name_entry_update(input),
            Phase::Leaderboard => {
                self.sway += frame_time * LEADERBOARD_SWAY_RATE;
                if input.just_pressed(Button::Cross) {
                    self.interval_release();
                    self.enter(Phase::Menu);
                    self.frontend_init();
                }
            }
            Phase::Exit => {
                if self.timer > self.config.exit_seconds {
                    self.save_all();
                    self.interval_release();
                    self.finished = true;
                    log::info!("Exiting");
                    return false;
                }
            }
            _ => {}
        }
        true
    }

    fn name_entry_update(&mut self, input: &InputFrame) {
        if input.just_pressed(Button::Cross) {
            if !self.name.advance() {
                let name = self.name.name();
                let rank = self.ledger.insert(name.as_str(), self.last_score);
                log::info!("New high score {} by {} at rank {}", self.last_score, name, rank + 1);
                if let Err(e) = self.ledger.save() {
                    log::warn!("High scores not saved: {}", e);
                }
                self.timer = 0.0;
                self.enter(Phase::Leaderboard);
            }
        } else if input.just_pressed(Button::Right) {
            self.name.advance();
        } else if input.just_pressed(Button::Left) || input.just_pressed(Button::Circle) {
            self.name.back();
        } else if input.just_pressed(Button::Up) {
            self.name.up();
        } else if input.just_pressed(Button::Down) {
            self.name.down();
        }
    }

    fn save_all(&mut self) {
        if let Err(e) = self.ledger.save() {
            log::warn!("High scores not saved: {}", e);
        }
        if let Err(e) = self.settings.save(&self.config.settings_path) {
            log::warn!("Settings not saved: {}", e);
        }
    }

    pub(super) fn interval_render(&mut self) {
        let (w, h) = (self.width(), self.height());
        self.platform.begin_frame();
        self.draw_background();

        match self.phase {
            Phase::Init => {
                self.platform.draw_text(TextDraw::new(
                    "Initialising Game",
                    Vec2::new(w * 0.5, h * 0.5 - 56.0),
                ));
                let logo = self.textures.get(LOGO);
                self.platform.draw_sprite(SpriteDraw::new(
                    logo,
                    Vec2::new(w * 0.5, h * 0.5),
                    Vec2::new(342.0, 202.0),
                ));
            }
            Phase::GameOver => {
                self.platform
                    .draw_text(TextDraw::new("Game Over!", Vec2::new(w * 0.5, h * 0.4)));
                self.platform.draw_text(TextDraw::new(
                    format!("Your score: {}", self.last_score),
                    Vec2::new(w * 0.5, h * 0.4 + 30.0),
                ));
                self.draw_button(CROSS_ICON, Vec2::new(w * 0.5, h * 0.8), 40.0);
                self.platform.draw_text(TextDraw::new(
                    "Press to continue",
                    Vec2::new(w * 0.5, h * 0.8 + 30.0),
                ));
            }
            Phase::NewScore => {
                self.render_name_entry();
                self.platform.draw_text(TextDraw::new(
                    "New high score!",
                    Vec2::new(w * 0.5, h * 0.3 - 10.0),
                ));
                self.platform.draw_text(TextDraw::new(
                    "Enter your name below using the dpad:",
                    Vec2::new(w * 0.5, h * 0.3 + 20.0),
                ));
                self.draw_button(CROSS_ICON, Vec2::new(w * 0.5, h * 0.8), 40.0);
                self.platform.draw_text(TextDraw::new(
                    "Press to confirm",
                    Vec2::new(w * 0.5, h * 0.8 + 25.0),
                ));
            }
            Phase::Leaderboard => {
                self.render_leaderboard();
                self.draw_button(CROSS_ICON, Vec2::new(w * 0.5, h * 0.8), 40.0);
                self.platform.draw_text(TextDraw::new(
                    "Press to continue",
                    Vec2::new(w * 0.5, h * 0.8 + 25.0),
                ));
            }
            Phase::Exit => {
                self.platform.draw_text(TextDraw::new(
                    "Exiting Game",
                    Vec2::new(w * 0.5, h * 0.5 - 56.0),
                ));
            }
            _ => {}
        }

        self.draw_hud();
        self.platform.end_frame();
    }

    /// Each letter large in its column, with its neighbours small above and below
    fn render_name_entry(&mut self) {
        let (w, h) = (self.width(), self.height());
        let name = self.name;
        let centre = w * 0.5;

        for slot in 0..NAME_LENGTH {
            let x = centre + (slot as f32 - 1.0) * 80.0;
            let (above, below) = name.neighbours(slot);
            let letter = char::from(NAME_ALPHABET[name.letter(slot)]);
            let (scale, color, lift) = if name.cursor() == slot {
                (5.0, HIGHLIGHT, 80.0)
            } else {
                (3.5, WHITE, 50.0)
            };

            self.platform.draw_text(
                TextDraw::new(above.to_string(), Vec2::new(x, h * 0.5 - 120.0)).scale(1.5),
            );
            self.platform.draw_text(
                TextDraw::new(letter.to_string(), Vec2::new(x, h * 0.5 - lift))
                    .scale(scale)
                    .color(color),
            );
            self.platform.draw_text(
                TextDraw::new(below.to_string(), Vec2::new(x, h * 0.5 + 60.0)).scale(1.5),
            );
        }
    }

    /// Names down the left, padded scores down the right, both swaying
    fn render_leaderboard(&mut self) {
        let w = self.width();
        for (i, row) in self.ledger.leaderboard_rows().into_iter().enumerate() {
            let offset = (self.sway + i as f32 * 1.2).sin() * 20.0;
            let y = 80.0 + i as f32 * 60.0;
            self.platform.draw_text(
                TextDraw::new(row.name, Vec2::new(40.0 + offset, y))
                    .scale(3.0)
                    .justify(Justify::Left),
            );
            self.platform.draw_text(
                TextDraw::new(row.score, Vec2::new(w - 40.0 + offset, y))
                    .scale(3.0)
                    .justify(Justify::Right),
            );
        }
    }
}
