//! Credits screen

use glam::Vec2;

use super::frontend::CROSS_ICON;
use super::{GameApp, Phase};
use crate::platform::{Button, InputFrame, Platform, TextDraw};

const CREDITS: [&str; 2] = [
    "Sound effects from ZapSplat.com",
    "Music from Kevin Macleod: incompetech.filmmusic.io",
];

impl<P: Platform> GameApp<P> {
    pub(super) fn credits_init(&mut self) {
        self.textures.load(&mut self.platform, &[CROSS_ICON]);
    }

    pub(super) fn credits_update(&mut self, input: &InputFrame) {
        if input.just_pressed(Button::Cross) {
            self.textures.release(&mut self.platform);
            self.enter(Phase::Menu);
            self.frontend_init();
        }
    }

    pub(super) fn credits_render(&mut self) {
        let (w, h) = (self.width(), self.height());
        self.platform.begin_frame();
        self.draw_background();

        self.platform
            .draw_text(TextDraw::new("CREDITS", Vec2::new(w * 0.5, h * 0.3)));
        self.platform
            .draw_text(TextDraw::new(CREDITS[0], Vec2::new(w * 0.5, h * 0.5 - 20.0)));
        self.platform
            .draw_text(TextDraw::new(CREDITS[1], Vec2::new(w * 0.5, h * 0.5 + 20.0)));

        self.draw_button(CROSS_ICON, Vec2::new(w * 0.5, h * 0.8), 32.0);
        self.platform
            .draw_text(TextDraw::new("TO MENU", Vec2::new(w * 0.5, h * 0.8 + 32.0)));

        self.platform.end_frame();
    }
}
