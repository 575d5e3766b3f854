//! The live table: world, objects, score and lives
//!
//! Destructive changes found during a contact scan (ball removal, extra
//! balls, life loss) are applied here after the scan completes.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{ResponseRules, ScoreLatch, respond};
use super::level::{FlipperRig, build_table, spawn_ball};
use super::object::{ObjectId, ObjectTable, ObjectType};
use super::world::{Contact, PhysicsWorld, WorldError};
use crate::consts::*;
use crate::platform::audio::SFX_FILES;

/// Something that happened during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Points awarded; `cue` indexes the scoring sound effects
    Scored {
        source: ObjectType,
        points: u64,
        cue: usize,
    },
    BarrierHit {
        object: ObjectId,
    },
    /// Every barrier was hit and has been reset
    RoundCleared,
    BallLost {
        object: ObjectId,
    },
    BallSpawned {
        object: ObjectId,
    },
    LifeLost {
        remaining: u32,
    },
    /// Last life gone; no ball was respawned
    OutOfLives,
}

/// Gameplay tuning for one session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayfieldRules {
    pub response: ResponseRules,
    pub starting_lives: u32,
    /// Motor speed while a flipper button is held or released
    pub flipper_speed: f32,
    /// Motor speed the flippers are built with
    pub flipper_rest_speed: f32,
    pub ball_spawn: Vec2,
}

impl Default for PlayfieldRules {
    fn default() -> Self {
        Self {
            response: ResponseRules::default(),
            starting_lives: STARTING_LIVES,
            flipper_speed: FLIPPER_MOTOR_SPEED,
            flipper_rest_speed: FLIPPER_REST_SPEED,
            ball_spawn: BALL_SPAWN,
        }
    }
}

#[derive(Debug)]
pub struct Playfield {
    pub world: PhysicsWorld,
    pub objects: ObjectTable,
    pub flippers: Vec<FlipperRig>,
    pub lives: u32,
    pub score: u64,
    /// Simulation steps taken
    pub time_ticks: u64,
    pub latch: ScoreLatch,
    pub rules: PlayfieldRules,
    rng: Pcg32,
}

impl Playfield {
    /// Build the table and put the first ball in play
    pub fn new(rules: PlayfieldRules, seed: u64) -> Result<Self, WorldError> {
        let mut world = PhysicsWorld::new(GRAVITY);
        let mut objects = ObjectTable::new();
        let flippers = build_table(&mut world, &mut objects, rules.flipper_rest_speed)?;

        let mut field = Self {
            world,
            objects,
            flippers,
            lives: rules.starting_lives,
            score: 0,
            time_ticks: 0,
            latch: ScoreLatch::default(),
            rules,
            rng: Pcg32::seed_from_u64(seed),
        };
        field.spawn_ball()?;
        Ok(field)
    }

    /// Add a ball at the spawn point
    pub fn spawn_ball(&mut self) -> Result<ObjectId, WorldError> {
        self.spawn_ball_at(self.rules.ball_spawn)
    }

    pub fn spawn_ball_at(&mut self, position: Vec2) -> Result<ObjectId, WorldError> {
        spawn_ball(&mut self.world, &mut self.objects, position)
    }

    /// Remove a ball and its body. Returns false if `id` is not a live ball.
    pub fn remove_ball(&mut self, id: ObjectId) -> bool {
        if self.objects.type_of(id) != Some(ObjectType::Ball) {
            return false;
        }
        match self.objects.remove(id) {
            Some(ball) => {
                self.world.destroy_body(ball.body);
                true
            }
            None => false,
        }
    }

    pub fn ball_count(&self) -> usize {
        self.objects.count(ObjectType::Ball)
    }

    pub fn balls(&self) -> Vec<ObjectId> {
        self.objects.ids_of(ObjectType::Ball)
    }

    pub fn is_out_of_lives(&self) -> bool {
        self.lives == 0
    }

    /// Swing every flipper on one side up (`raise`) or back down
    pub fn drive_flippers(&mut self, left: bool, raise: bool) {
        let speed = self.rules.flipper_speed;
        for rig in self.flippers.iter().filter(|r| r.left == left) {
            self.world
                .set_motor_speed(rig.joint, rig.drive_speed(raise, speed));
        }
    }

    /// Copy body transforms into the moving objects' visuals
    pub fn sync_transforms(&mut self) {
        for object in self.objects.iter_mut().filter(|o| o.is_moving()) {
            if let Some(body) = self.world.body(object.body) {
                object.update_from_simulation(body);
            }
        }
    }

    /// Respond to a contact snapshot, then apply the deferred changes:
    /// removals first, extra balls next, and finally the life check.
    pub fn resolve_contacts(&mut self, contacts: &[Contact]) -> Vec<GameEvent> {
        let response = respond(
            contacts,
            &mut self.objects,
            &mut self.world,
            &mut self.latch,
            &self.rules.response,
        );

        let mut events = Vec::new();
        events.extend(
            response
                .barriers_hit
                .iter()
                .map(|&object| GameEvent::BarrierHit { object }),
        );
        for award in &response.awards {
            self.score += award.points;
            events.push(GameEvent::Scored {
                source: award.source,
                points: award.points,
                cue: self.rng.random_range(0..SFX_FILES.len()),
            });
        }
        events.extend((0..response.rounds_cleared).map(|_| GameEvent::RoundCleared));

        let mut lost = false;
        for &ball in &response.lost_balls {
            if self.remove_ball(ball) {
                lost = true;
                events.push(GameEvent::BallLost { object: ball });
            }
        }
        for _ in 0..response.extra_balls {
            self.push_spawn(&mut events);
        }
        if lost && self.ball_count() == 0 {
            self.lose_life(&mut events);
        }
        events
    }

    fn lose_life(&mut self, events: &mut Vec<GameEvent>) {
        self.lives = self.lives.saturating_sub(1);
        log::info!("Ball lost, {} lives remaining", self.lives);
        events.push(GameEvent::LifeLost {
            remaining: self.lives,
        });
        if self.lives > 0 {
            self.push_spawn(events);
        } else {
            events.push(GameEvent::OutOfLives);
        }
    }

    fn push_spawn(&mut self, events: &mut Vec<GameEvent>) {
        match self.spawn_ball() {
            Ok(object) => events.push(GameEvent::BallSpawned { object }),
            Err(e) => log::warn!("Ball spawn failed: {}", e),
        }
    }
}
