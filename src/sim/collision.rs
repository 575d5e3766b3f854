//! Contact classification and response
//!
//! Each touching contact is classified by the type tags of the objects on
//! either side and the matching rule is applied. Rules that only flip state
//! (barrier hit, barrier reset) take effect immediately; rules that destroy
//! or create bodies are reported back in [`Response`] so the caller can apply
//! them once the whole snapshot has been scanned.

use serde::{Deserialize, Serialize};

use super::object::{ObjectId, ObjectTable, ObjectType, category};
use super::world::{Contact, Contactant, Filter, PhysicsWorld};
use crate::consts::{BARRIER_POINTS, BUMPER_POINTS, FLIPPER_POINTS};

/// Which sides of a contact get their rule applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixtureEvaluation {
    /// Side A's rule, then side B's rule
    #[default]
    BothSides,
    /// Stop after the first side whose rule matches
    FirstMatch,
}

/// Scoring debounce.
///
/// Once set, no further points are awarded until a step begins with no ball
/// touching a flipper, barrier or bumper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreLatch {
    contacted: bool,
}

impl ScoreLatch {
    /// Call once at the top of each step
    pub fn begin_step(&mut self, scoring_contact_present: bool) {
        if !scoring_contact_present {
            self.contacted = false;
        }
    }

    /// Claim the award for this episode. Returns false if already claimed.
    pub fn try_award(&mut self) -> bool {
        if self.contacted {
            return false;
        }
        self.contacted = true;
        true
    }

    pub fn is_latched(&self) -> bool {
        self.contacted
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResponseRules {
    pub barrier_points: u64,
    pub flipper_points: u64,
    pub bumper_points: u64,
    pub evaluation: FixtureEvaluation,
}

impl Default for ResponseRules {
    fn default() -> Self {
        Self {
            barrier_points: BARRIER_POINTS,
            flipper_points: FLIPPER_POINTS,
            bumper_points: BUMPER_POINTS,
            evaluation: FixtureEvaluation::default(),
        }
    }
}

/// Points awarded for touching an object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Award {
    pub source: ObjectType,
    pub object: ObjectId,
    pub points: u64,
}

/// Outcome of one step's contact scan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    pub awards: Vec<Award>,
    /// Barriers newly marked hit, in contact order
    pub barriers_hit: Vec<ObjectId>,
    /// Times every barrier was reset
    pub rounds_cleared: u32,
    /// Balls that reached the lose trigger (deduplicated)
    pub lost_balls: Vec<ObjectId>,
    /// Balls to add once the scan is done
    pub extra_balls: u32,
    /// Contacts that fired a rule on both sides
    pub double_fires: u32,
}

impl Response {
    pub fn points(&self) -> u64 {
        self.awards.iter().map(|a| a.points).sum()
    }
}

fn side_type(side: &Contactant, objects: &ObjectTable) -> Option<ObjectType> {
    side.owner.and_then(|id| objects.type_of(id))
}

/// True when a ball touches something that scores
pub fn is_scoring_contact(contact: &Contact, objects: &ObjectTable) -> bool {
    match (
        side_type(&contact.a, objects),
        side_type(&contact.b, objects),
    ) {
        (Some(ObjectType::Ball), Some(other)) | (Some(other), Some(ObjectType::Ball)) => {
            other.is_scoring()
        }
        _ => false,
    }
}

/// Classify a contact snapshot and apply the non-destructive responses
pub fn respond(
    contacts: &[Contact],
    objects: &mut ObjectTable,
    world: &mut PhysicsWorld,
    latch: &mut ScoreLatch,
    rules: &ResponseRules,
) -> Response {
    latch.begin_step(contacts.iter().any(|c| is_scoring_contact(c, objects)));

    let mut responder = Responder {
        objects,
        world,
        latch,
        rules,
        response: Response::default(),
    };
    for contact in contacts {
        let mut fired = 0;
        for (this, other) in [(contact.a, contact.b), (contact.b, contact.a)] {
            if fired > 0 && rules.evaluation == FixtureEvaluation::FirstMatch {
                break;
            }
            if responder.apply(&this, &other, contact) {
                fired += 1;
            }
        }
        if fired > 1 {
            responder.response.double_fires += 1;
            log::debug!(
                "Contact {:?} / {:?} fired rules on both sides",
                side_type(&contact.a, responder.objects),
                side_type(&contact.b, responder.objects)
            );
        }
    }
    responder.response
}

struct Responder<'a> {
    objects: &'a mut ObjectTable,
    world: &'a mut PhysicsWorld,
    latch: &'a mut ScoreLatch,
    rules: &'a ResponseRules,
    response: Response,
}

impl Responder<'_> {
    /// Apply the rule for `this` side's type. Returns whether a rule matched.
    fn apply(&mut self, this: &Contactant, other: &Contactant, contact: &Contact) -> bool {
        let Some(id) = this.owner else {
            return false;
        };
        let Some(tag) = self.objects.type_of(id) else {
            return false;
        };

        match tag {
            ObjectType::Barrier => {
                if let Some(barrier) = self.objects.get_mut(id) {
                    barrier.set_hit(true);
                }
                self.world
                    .set_filter(this.collider, Filter::new(category::HIT_BARRIER, 0));
                if !self.response.barriers_hit.contains(&id) {
                    self.response.barriers_hit.push(id);
                }
                self.award(tag, id, self.rules.barrier_points);
                true
            }
            ObjectType::LoseTrigger => {
                let ball = other
                    .owner
                    .filter(|b| self.objects.type_of(*b) == Some(ObjectType::Ball))
                    .filter(|b| !self.response.lost_balls.contains(b));
                if let Some(ball) = ball {
                    self.response.lost_balls.push(ball);
                }
                true
            }
            ObjectType::Flipper => {
                if self.objects.all_barriers_hit() {
                    reset_barriers(self.objects, self.world);
                    self.response.rounds_cleared += 1;
                    self.response.extra_balls += 1;
                }
                self.award(tag, id, self.rules.flipper_points);
                true
            }
            ObjectType::Bumper => {
                self.award(tag, id, self.rules.bumper_points);
                true
            }
            ObjectType::Board => {
                log::trace!("Board contact at {:?}", contact.point);
                false
            }
            ObjectType::Ball | ObjectType::Player => false,
        }
    }

    fn award(&mut self, source: ObjectType, object: ObjectId, points: u64) {
        if self.latch.try_award() {
            log::debug!("{} scored {} points", source.as_str(), points);
            self.response.awards.push(Award {
                source,
                object,
                points,
            });
        }
    }
}

/// Clear every barrier's hit flag and make it collide with balls again
pub fn reset_barriers(objects: &mut ObjectTable, world: &mut PhysicsWorld) {
    for object in objects.iter_mut() {
        if object.set_hit(false) {
            world.set_filter(
                object.collider,
                Filter::new(category::BARRIER, category::BALL),
            );
        }
    }
}
