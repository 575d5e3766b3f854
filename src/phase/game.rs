//! Gameplay and the pause menu
//!
//! Pause shares the playfield with InGame; only InGame steps physics.

use glam::{Vec2, Vec3};
use rand::Rng;

use super::{GameApp, HUD_DEPTH, MenuCursor, Phase};
use crate::platform::audio::MUSIC_TRACKS;
use crate::platform::{
    Button, InputFrame, Justify, Material, Mesh, MeshDraw, Platform, SceneHandle, TextDraw,
};
use crate::settings::VolumeChannel;
use crate::sim::{GameEvent, GameObject, ObjectType, Playfield, TickInput, Visual, tick};

const RESUME_ROW: usize = 0;
const QUIT_ROW: usize = 3;

/// Draw order for the table, back to front
const DRAW_ORDER: [ObjectType; 6] = [
    ObjectType::Board,
    ObjectType::LoseTrigger,
    ObjectType::Flipper,
    ObjectType::Bumper,
    ObjectType::Barrier,
    ObjectType::Ball,
];

impl<P: Platform> GameApp<P> {
    /// Start a session: music, table scene and a fresh playfield
    pub(super) fn game_init(&mut self) {
        self.platform.stop_music();
        self.platform.unload_music();
        let track = MUSIC_TRACKS[self.rng.random_range(0..MUSIC_TRACKS.len())];
        if self.platform.load_music(track) {
            self.platform.play_music();
        } else {
            log::warn!("Music {} failed to load", track);
        }

        self.scene = self.platform.load_scene(&self.config.table_scene);
        if self.scene.is_none() {
            log::warn!("Table scene {} failed to load", self.config.table_scene);
        }

        self.cursor = MenuCursor::default();
        self.last_score = 0;
        let seed = self.rng.random();
        self.session = match Playfield::new(self.config.playfield_rules(), seed) {
            Ok(field) => Some(field),
            Err(e) => {
                log::error!("Could not build the table: {}", e);
                None
            }
        };
        log::info!("Game started");
    }

    /// End the session, keeping its score for the game over screens
    pub(super) fn game_release(&mut self) {
        if let Some(field) = self.session.take() {
            self.last_score = field.score;
        }
        if let Some(scene) = self.scene.take() {
            self.platform.free_scene(scene);
        }
        self.platform.stop_music();
        self.platform.unload_music();
        self.cursor = MenuCursor::default();
        log::info!("Game ended with {} points", self.last_score);
    }

    fn pause_channel(&self) -> Option<VolumeChannel> {
        match self.cursor.index() {
            1 => Some(VolumeChannel::Sound),
            2 => Some(VolumeChannel::Music),
            _ => None,
        }
    }

    pub(super) fn game_update(&mut self, input: &InputFrame) {
        match self.phase {
            Phase::InGame => {
                if input.just_pressed(Button::Select) {
                    self.enter(Phase::Pause);
                    return;
                }
                self.step_session(input);
            }
            Phase::Pause => {
                if self.pause_update(input) {
                    return;
                }
            }
            _ => {}
        }

        let over = self.session.as_ref().is_none_or(Playfield::is_out_of_lives);
        if over {
            self.finish_game();
        }
    }

    /// Handle the pause menu. Returns true if the phase changed.
    fn pause_update(&mut self, input: &InputFrame) -> bool {
        if input.just_pressed(Button::Select) {
            self.enter(Phase::InGame);
            return true;
        }
        if input.just_pressed(Button::Down) {
            self.cursor.down();
        } else if input.just_pressed(Button::Up) {
            self.cursor.up();
        } else if input.just_pressed(Button::Left) || input.just_pressed(Button::Right) {
            if let Some(channel) = self.pause_channel() {
                self.settings
                    .adjust(channel, input.just_pressed(Button::Right));
            }
        } else if input.just_pressed(Button::Cross) {
            match self.cursor.index() {
                RESUME_ROW => {
                    self.enter(Phase::InGame);
                    return true;
                }
                QUIT_ROW => {
                    self.finish_game();
                    return true;
                }
                _ => {}
            }
        }
        false
    }

    fn step_session(&mut self, input: &InputFrame) {
        let Some(field) = self.session.as_mut() else {
            return;
        };
        let events = tick(field, &TickInput::from_frame(input));
        for event in events {
            match event {
                GameEvent::Scored { cue, .. } => {
                    if let Some(sample) = self.sfx.get(cue).copied().flatten() {
                        self.platform.play_sample(sample);
                    }
                }
                GameEvent::RoundCleared => log::info!("All barriers down, extra ball"),
                _ => {}
            }
        }
    }

    fn finish_game(&mut self) {
        self.game_release();
        self.enter(Phase::GameOver);
        self.interval_init();
    }

    pub(super) fn game_render(&mut self) {
        let (w, h) = (self.width(), self.height());
        self.platform.begin_frame();

        if let Some(field) = &self.session {
            let draws: Vec<MeshDraw> = DRAW_ORDER
                .iter()
                .flat_map(|tag| field.objects.iter().filter(move |o| o.object_type() == *tag))
                .filter_map(|object| mesh_for(object, self.scene))
                .collect();
            for draw in draws {
                self.platform.draw_mesh(draw);
            }
        }

        self.draw_background();

        if self.phase == Phase::InGame {
            let (lives, score) = self
                .session
                .as_ref()
                .map_or((0, self.last_score), |f| (f.lives, f.score));
            self.platform.draw_text(
                TextDraw::new(format!("Lives: {}", lives), Vec2::new(50.0, 10.0))
                    .justify(Justify::Left)
                    .depth(HUD_DEPTH),
            );
            self.platform.draw_text(
                TextDraw::new(format!("SCORE: {}", score), Vec2::new(400.0, 10.0))
                    .depth(HUD_DEPTH),
            );
        } else {
            let cursor = self.cursor;
            self.platform.draw_text(
                TextDraw::new("Resume", Vec2::new(w * 0.5, h * 0.4 - 60.0))
                    .color(cursor.color(RESUME_ROW)),
            );
            self.draw_volume_rows(cursor.color(1), cursor.color(2));
            self.platform.draw_text(
                TextDraw::new("Quit", Vec2::new(w * 0.5, h * 0.4 + 60.0))
                    .color(cursor.color(QUIT_ROW)),
            );
            self.platform
                .draw_text(TextDraw::new("Paused", Vec2::new(w * 0.5, h * 0.7)));
        }

        self.draw_hud();
        self.platform.end_frame();
    }
}

/// Mesh for one object, or None if it is not drawn this frame
fn mesh_for(object: &GameObject, scene: Option<SceneHandle>) -> Option<MeshDraw> {
    if object.hit() == Some(true) {
        return None;
    }
    let mesh = match object.visual {
        Visual::Scene => Mesh::Scene(scene?),
        Visual::Sphere { radius } => Mesh::Sphere { radius },
        Visual::Box {
            half_extents,
            half_depth,
        } => Mesh::Box {
            half_extents: Vec3::new(half_extents.x, half_extents.y, half_depth),
        },
    };
    let material = match object.object_type() {
        ObjectType::Bumper => Some(Material::Red),
        ObjectType::Ball => Some(Material::Green),
        _ => None,
    };
    Some(MeshDraw {
        mesh,
        position: object.transform.position,
        angle: object.transform.angle,
        material,
    })
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::consts::{FLIPPER_MOTOR_SPEED, FLIPPER_REST_SPEED};
    use crate::platform::{Call, HeadlessPlatform};

    fn app_in_game(dir: &tempfile::TempDir) -> GameApp<HeadlessPlatform> {
        let mut app = app_at_menu(dir);
        app.platform_mut().clear_calls();
        press(&mut app, Button::Cross);
        assert_eq!(app.phase(), Phase::InGame);
        app
    }

    #[test]
    fn test_menu_cross_starts_one_game() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in_game(&dir);
        idle(&mut app);

        let platform = app.platform();
        assert_eq!(platform.count(|c| matches!(c, Call::LoadScene(_))), 1);
        assert_eq!(platform.count(|c| matches!(c, Call::LoadMusic(_))), 1);
        assert_eq!(platform.count(|c| matches!(c, Call::PlayMusic)), 1);
        let session = app.session().unwrap();
        assert_eq!(session.lives, 3);
        assert_eq!(session.ball_count(), 1);
        assert_eq!(session.time_ticks, 1);
    }

    #[test]
    fn test_pause_freezes_physics() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in_game(&dir);
        press(&mut app, Button::Select);
        assert_eq!(app.phase(), Phase::Pause);

        for _ in 0..10 {
            idle(&mut app);
        }
        assert_eq!(app.session().unwrap().time_ticks, 0);

        press(&mut app, Button::Select);
        assert_eq!(app.phase(), Phase::InGame);
        idle(&mut app);
        assert_eq!(app.session().unwrap().time_ticks, 1);
    }

    #[test]
    fn test_pause_quit_releases_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in_game(&dir);
        press(&mut app, Button::Select);
        for _ in 0..3 {
            press(&mut app, Button::Down);
        }
        press(&mut app, Button::Cross);

        assert_eq!(app.phase(), Phase::GameOver);
        assert!(app.session().is_none());
        idle(&mut app);
        assert_eq!(
            app.platform().count(|c| matches!(c, Call::FreeScene(_))),
            1
        );
        assert_eq!(app.platform().count(|c| matches!(c, Call::LoadScene(_))), 1);
    }

    #[test]
    fn test_pause_resume_and_volume() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in_game(&dir);
        press(&mut app, Button::Select);

        press(&mut app, Button::Down);
        press(&mut app, Button::Left);
        assert_eq!(app.settings().sound_volume, 6);
        press(&mut app, Button::Down);
        press(&mut app, Button::Right);
        assert_eq!(app.settings().music_volume, 8);

        press(&mut app, Button::Up);
        press(&mut app, Button::Up);
        press(&mut app, Button::Cross);
        assert_eq!(app.phase(), Phase::InGame);
    }

    #[test]
    fn test_out_of_lives_ends_game() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in_game(&dir);
        let field = app.session_mut().unwrap();
        field.score = 120;
        field.lives = 0;

        idle(&mut app);
        assert_eq!(app.phase(), Phase::GameOver);
        assert_eq!(app.score(), 120);
    }

    #[test]
    fn test_flipper_buttons_drive_motors() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in_game(&dir);
        press(&mut app, Button::L1);

        let field = app.session().unwrap();
        for rig in &field.flippers {
            let speed = field.world.motor_speed(rig.joint).unwrap();
            let expected = if rig.left {
                FLIPPER_MOTOR_SPEED
            } else {
                FLIPPER_REST_SPEED
            };
            assert_eq!(speed, expected);
        }
    }

    #[test]
    fn test_render_table() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in_game(&dir);
        app.render();

        let meshes = app.platform().meshes();
        // Board, lose trigger, 2 flippers, 5 bumpers, 5 barriers, 1 ball
        assert_eq!(meshes.len(), 15);
        assert!(matches!(meshes[0].mesh, Mesh::Scene(_)));
        assert_eq!(meshes.last().unwrap().material, Some(Material::Green));
        let texts = app.platform().texts();
        assert!(texts.contains(&"Lives: 3"));
        assert!(texts.contains(&"SCORE: 0"));
    }

    #[test]
    fn test_hit_barriers_not_drawn() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in_game(&dir);
        let field = app.session_mut().unwrap();
        let barrier = field.objects.ids_of(ObjectType::Barrier)[0];
        field.objects.get_mut(barrier).unwrap().set_hit(true);

        app.render();
        assert_eq!(app.platform().meshes().len(), 14);
    }

    #[test]
    fn test_render_pause_menu() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in_game(&dir);
        press(&mut app, Button::Select);
        app.render();

        let texts = app.platform().texts();
        for label in ["Resume", "Sound Volume: ", "Music Volume: ", "Quit", "Paused"] {
            assert!(texts.contains(&label), "missing {label}");
        }
        assert!(!texts.iter().any(|t| t.starts_with("Lives")));
    }
}
