//! Options screen: volumes and the leaderboard

use glam::Vec2;

use super::frontend::CIRCLE_ICON;
use super::{GameApp, MenuCursor, Phase};
use crate::platform::{Button, InputFrame, Platform, TextDraw};
use crate::settings::VolumeChannel;

const RESET_ROW: usize = 2;
const LEADERBOARD_ROW: usize = 3;

impl<P: Platform> GameApp<P> {
    pub(super) fn options_init(&mut self) {
        self.textures.load(&mut self.platform, &[CIRCLE_ICON]);
        self.cursor = MenuCursor::default();
    }

    pub(super) fn options_release(&mut self) {
        self.textures.release(&mut self.platform);
        self.cursor = MenuCursor::default();
    }

    /// Volume adjusted by Left/Right on the selected row, if any
    fn options_channel(&self) -> Option<VolumeChannel> {
        match self.cursor.index() {
            0 => Some(VolumeChannel::Sound),
            1 => Some(VolumeChannel::Music),
            _ => None,
        }
    }

    pub(super) fn options_update(&mut self, input: &InputFrame) {
        if input.just_pressed(Button::Circle) {
            self.options_release();
            self.enter(Phase::Menu);
            self.frontend_init();
        } else if input.just_pressed(Button::Down) {
            self.cursor.down();
        } else if input.just_pressed(Button::Up) {
            self.cursor.up();
        } else if input.just_pressed(Button::Left) || input.just_pressed(Button::Right) {
            if let Some(channel) = self.options_channel() {
                self.settings
                    .adjust(channel, input.just_pressed(Button::Right));
            }
        } else if input.just_pressed(Button::Cross) {
            match self.cursor.index() {
                RESET_ROW => {
                    log::info!("Resetting leaderboard");
                    if let Err(e) = self.ledger.reset() {
                        log::warn!("Leaderboard reset not saved: {}", e);
                    }
                }
                LEADERBOARD_ROW => {
                    self.options_release();
                    self.enter(Phase::Leaderboard);
                    self.interval_init();
                }
                _ => {}
            }
        }
    }

    pub(super) fn options_render(&mut self) {
        let (w, h) = (self.width(), self.height());
        let cursor = self.cursor;
        self.platform.begin_frame();
        self.draw_background();

        self.platform
            .draw_text(TextDraw::new("OPTIONS", Vec2::new(w * 0.5, h * 0.3)));
        self.draw_volume_rows(cursor.color(0), cursor.color(1));
        self.platform.draw_text(
            TextDraw::new("Reset Leaderboard", Vec2::new(w * 0.5, h * 0.5 - 20.0))
                .color(cursor.color(RESET_ROW)),
        );
        self.platform.draw_text(
            TextDraw::new("Show Leaderboard", Vec2::new(w * 0.5, h * 0.5 + 20.0))
                .color(cursor.color(LEADERBOARD_ROW)),
        );

        self.draw_button(CIRCLE_ICON, Vec2::new(w * 0.5, h * 0.8), 32.0);
        self.platform
            .draw_text(TextDraw::new("TO MENU", Vec2::new(w * 0.5, h * 0.8 + 32.0)));

        self.platform.end_frame();
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::platform::render::HIGHLIGHT;
    use crate::platform::{DrawCall, HeadlessPlatform};

    fn app_at_options(dir: &tempfile::TempDir) -> GameApp<HeadlessPlatform> {
        let mut app = app_at_menu(dir);
        press(&mut app, Button::Triangle);
        assert_eq!(app.phase(), Phase::Options);
        app
    }

    #[test]
    fn test_volume_adjustment() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_at_options(&dir);

        press(&mut app, Button::Right);
        assert_eq!(app.settings().sound_volume, 8);
        assert_eq!(app.platform().sample_volume(), 80);

        press(&mut app, Button::Down);
        for _ in 0..10 {
            press(&mut app, Button::Left);
        }
        assert_eq!(app.settings().music_volume, 0);
        assert_eq!(app.platform().music_volume(), 0);

        // Rows past the volumes ignore Left/Right
        press(&mut app, Button::Down);
        press(&mut app, Button::Right);
        assert_eq!(app.settings().sound_volume, 8);
        assert_eq!(app.settings().music_volume, 0);
    }

    #[test]
    fn test_reset_and_show_leaderboard() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_at_options(&dir);
        std::fs::write(dir.path().join("scores.txt"), "ZED,9999").unwrap();

        press(&mut app, Button::Down);
        press(&mut app, Button::Down);
        press(&mut app, Button::Cross);
        assert_eq!(app.phase(), Phase::Options);
        let text = std::fs::read_to_string(dir.path().join("scores.txt")).unwrap();
        assert!(text.starts_with("AAA,1000"));

        press(&mut app, Button::Down);
        press(&mut app, Button::Cross);
        assert_eq!(app.phase(), Phase::Leaderboard);
    }

    #[test]
    fn test_circle_returns_to_menu() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_at_options(&dir);
        press(&mut app, Button::Circle);
        assert_eq!(app.phase(), Phase::Menu);
    }

    #[test]
    fn test_render_highlights_selection_and_volume_bars() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_at_options(&dir);
        app.render();

        let frame = app.platform().last_frame();
        let sound = frame.iter().find_map(|d| match d {
            DrawCall::Text(t) if t.text == "Sound Volume: " => Some(t.color),
            _ => None,
        });
        assert_eq!(sound, Some(HIGHLIGHT));

        // Background, 7 + 7 volume squares, the circle icon
        let sprites = frame
            .iter()
            .filter(|d| matches!(d, DrawCall::Sprite(_)))
            .count();
        assert_eq!(sprites, 16);
    }
}
