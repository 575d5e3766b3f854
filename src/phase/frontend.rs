//! Main menu

use glam::Vec2;

use super::{GameApp, Phase};
use crate::platform::{Button, InputFrame, Platform, TextDraw};

pub(super) const CROSS_ICON: &str = "playstation-cross-dark-icon.png";
pub(super) const SQUARE_ICON: &str = "playstation-square-dark-icon.png";
pub(super) const CIRCLE_ICON: &str = "playstation-circle-dark-icon.png";
pub(super) const TRIANGLE_ICON: &str = "playstation-triangle-dark-icon.png";

impl<P: Platform> GameApp<P> {
    pub(super) fn frontend_init(&mut self) {
        self.textures.load(
            &mut self.platform,
            &[CROSS_ICON, SQUARE_ICON, CIRCLE_ICON, TRIANGLE_ICON],
        );
    }

    pub(super) fn frontend_release(&mut self) {
        self.textures.release(&mut self.platform);
    }

    pub(super) fn frontend_update(&mut self, input: &InputFrame) {
        if input.just_pressed(Button::Cross) {
            self.frontend_release();
            self.enter(Phase::InGame);
            self.game_init();
        } else if input.just_pressed(Button::Circle) {
            self.frontend_release();
            self.enter(Phase::Exit);
            self.interval_init();
        } else if input.just_pressed(Button::Triangle) {
            self.frontend_release();
            self.enter(Phase::Options);
            self.options_init();
        } else if input.just_pressed(Button::Square) {
            self.frontend_release();
            self.enter(Phase::Credits);
            self.credits_init();
        }
    }

    pub(super) fn frontend_render(&mut self) {
        let (w, h) = (self.width(), self.height());
        self.platform.begin_frame();
        self.draw_background();

        self.platform
            .draw_text(TextDraw::new("PRESS", Vec2::new(w * 0.5, h * 0.5 - 56.0)));
        self.draw_button(CROSS_ICON, Vec2::new(w * 0.5, h * 0.5), 32.0);
        self.draw_button(TRIANGLE_ICON, Vec2::new(w * 0.05, h * 0.1), 32.0);
        self.draw_button(SQUARE_ICON, Vec2::new(w * 0.95, h * 0.1), 32.0);
        self.draw_button(CIRCLE_ICON, Vec2::new(w * 0.5, h * 0.85), 32.0);

        let labels = [
            ("TO START", Vec2::new(w * 0.5, h * 0.5 + 32.0)),
            ("OPTIONS", Vec2::new(w * 0.05 + 82.0, h * 0.1 - 16.0)),
            ("CREDITS", Vec2::new(w * 0.95 - 80.0, h * 0.1 - 16.0)),
            ("EXIT", Vec2::new(w * 0.5, h * 0.85 + 32.0)),
        ];
        for (text, position) in labels {
            self.platform.draw_text(TextDraw::new(text, position));
        }

        self.draw_hud();
        self.platform.end_frame();
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::platform::Call;

    #[test]
    fn test_menu_loads_and_releases_icons() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_at_menu(&dir);
        app.platform_mut().clear_calls();

        press(&mut app, Button::Triangle);
        assert_eq!(app.phase(), Phase::Options);
        assert_eq!(
            app.platform().count(|c| matches!(c, Call::FreeTexture(_))),
            4
        );
    }

    #[test]
    fn test_menu_render() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_at_menu(&dir);
        app.render();

        let texts = app.platform().texts();
        for label in ["PRESS", "TO START", "OPTIONS", "CREDITS", "EXIT"] {
            assert!(texts.contains(&label), "missing {label}");
        }
        assert!(texts.iter().any(|t| t.starts_with("FPS: ")));
    }

    #[test]
    fn test_credits_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_at_menu(&dir);

        press(&mut app, Button::Square);
        assert_eq!(app.phase(), Phase::Credits);
        // Circle does nothing on the credits screen
        press(&mut app, Button::Circle);
        assert_eq!(app.phase(), Phase::Credits);
        press(&mut app, Button::Cross);
        assert_eq!(app.phase(), Phase::Menu);
    }
}
