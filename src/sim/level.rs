//! Table layout
//!
//! Builds the board chain, barriers, bumpers, flippers and lose trigger into
//! a world and object table. Every body carries its object's id.

use glam::Vec2;
use rapier2d::prelude::{ImpulseJointHandle, RigidBodyHandle};

use super::object::{GameObject, ObjectId, ObjectKind, ObjectTable, Visual, category};
use super::world::{
    BodyDef, BodyKind, Filter, FixtureDef, Motor, PhysicsWorld, RevoluteDef, Shape, WorldError,
};
use crate::consts::*;

/// Outline of the playfield walls, bottom-right up and round to bottom-left
pub const BOARD_VERTICES: [Vec2; 19] = [
    Vec2::new(8.227069, -29.047207),
    Vec2::new(8.230977, 10.862797),
    Vec2::new(8.072821, 12.521641),
    Vec2::new(7.604436, 14.116737),
    Vec2::new(6.843820, 15.586790),
    Vec2::new(5.820206, 16.875298),
    Vec2::new(4.572926, 17.932747),
    Vec2::new(3.149917, 18.718502),
    Vec2::new(1.605863, 19.202366),
    Vec2::new(0.000113, 19.365749),
    Vec2::new(-1.605649, 19.202366),
    Vec2::new(-3.149703, 18.718498),
    Vec2::new(-4.572711, 17.932739),
    Vec2::new(-5.819987, 16.875290),
    Vec2::new(-6.843601, 15.586779),
    Vec2::new(-7.604213, 14.116732),
    Vec2::new(-8.072598, 12.521635),
    Vec2::new(-8.230750, 10.862789),
    Vec2::new(-8.228932, -29.047207),
];

pub const BARRIER_COUNT: usize = 5;
pub const BARRIER_HALF_EXTENTS: Vec2 = Vec2::new(0.4, 0.3);
const BARRIER_HALF_DEPTH: f32 = 1.0;

/// Round bumpers in the upper half of the table
pub const TOP_BUMPERS: [Vec2; 3] = [
    Vec2::new(0.0, 13.5),
    Vec2::new(-4.5, 10.0),
    Vec2::new(4.5, 10.0),
];
const TOP_BUMPER_RADIUS: f32 = 1.5;
const TOP_BUMPER_RESTITUTION: f32 = 1.2;

/// Large bumpers sitting outboard of each flipper
pub const FLIPPER_BUMPERS: [Vec2; 2] = [Vec2::new(-8.0, -19.3), Vec2::new(8.0, -19.3)];
const FLIPPER_BUMPER_RADIUS: f32 = 2.5;
const FLIPPER_BUMPER_RESTITUTION: f32 = 0.4;

pub const FLIPPER_HALF_EXTENTS: Vec2 = Vec2::new(2.05, 0.3);
const FLIPPER_HALF_DEPTH: f32 = 0.5;
/// Left flipper centre; the right one mirrors it
const FLIPPER_POSITION: Vec2 = Vec2::new(-3.05, -19.5);
/// Pin offset outboard of the flipper centre
const FLIPPER_PIN_OFFSET: f32 = 1.8;
/// Hinge point along the flipper from its centre
const FLIPPER_HINGE_OFFSET: f32 = 1.75;

pub const LOSE_TRIGGER_POSITION: Vec2 = Vec2::new(0.0, -25.5);
const LOSE_TRIGGER_HALF_EXTENTS: Vec2 = Vec2::new(8.5, 0.2);
const LOSE_TRIGGER_HALF_DEPTH: f32 = 0.5;

/// A flipper and the hinge that drives it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlipperRig {
    pub object: ObjectId,
    pub pin: RigidBodyHandle,
    pub joint: ImpulseJointHandle,
    pub left: bool,
}

impl FlipperRig {
    /// Motor speed that swings this flipper up (`raise`) or lets it drop
    pub fn drive_speed(&self, raise: bool, speed: f32) -> f32 {
        drive_speed(self.left, raise, speed)
    }
}

/// Left hinges swing anticlockwise to raise, right ones clockwise
fn drive_speed(left: bool, raise: bool, speed: f32) -> f32 {
    if left == raise { speed } else { -speed }
}

/// Barrier centre: a zig-zag row across the middle of the table
pub fn barrier_position(index: usize) -> Vec2 {
    Vec2::new(
        -3.0 + index as f32 * 1.5,
        1.5 + (index % 2) as f32 * 1.7,
    )
}

/// Create a body + single fixture and register the object that owns them
fn add_object(
    world: &mut PhysicsWorld,
    objects: &mut ObjectTable,
    kind: ObjectKind,
    visual: Visual,
    body: BodyDef,
    fixture: FixtureDef,
) -> Result<ObjectId, WorldError> {
    add_object_with_body(world, objects, kind, visual, body, fixture).map(|(id, _)| id)
}

fn add_object_with_body(
    world: &mut PhysicsWorld,
    objects: &mut ObjectTable,
    kind: ObjectKind,
    visual: Visual,
    body: BodyDef,
    fixture: FixtureDef,
) -> Result<(ObjectId, RigidBodyHandle), WorldError> {
    let id = objects.allocate_id();
    let body = world.create_body(body.owner(id));
    let collider = world.create_fixture(body, fixture)?;
    let mut object = GameObject::new(id, kind, visual, body, collider);
    if let Some(rb) = world.body(body) {
        object.update_from_simulation(rb);
    }
    objects.insert(object);
    Ok((id, body))
}

/// Build every static and jointed piece of the table.
///
/// Balls are not included; spawn them with [`spawn_ball`].
pub fn build_table(
    world: &mut PhysicsWorld,
    objects: &mut ObjectTable,
    flipper_rest_speed: f32,
) -> Result<Vec<FlipperRig>, WorldError> {
    build_board(world, objects)?;
    build_barriers(world, objects)?;
    build_bumpers(world, objects)?;
    let flippers = build_flippers(world, objects, flipper_rest_speed)?;
    build_lose_trigger(world, objects)?;

    log::debug!(
        "Table built: {} objects, {} bodies, {} joints",
        objects.len(),
        world.body_count(),
        world.joint_count()
    );
    Ok(flippers)
}

fn build_board(world: &mut PhysicsWorld, objects: &mut ObjectTable) -> Result<ObjectId, WorldError> {
    add_object(
        world,
        objects,
        ObjectKind::Board,
        Visual::Scene,
        BodyDef::new(BodyKind::Fixed, Vec2::ZERO),
        FixtureDef::new(Shape::Chain {
            vertices: BOARD_VERTICES.to_vec(),
        })
        .filter(Filter::new(category::BOARD, category::BALL)),
    )
}

fn build_barriers(
    world: &mut PhysicsWorld,
    objects: &mut ObjectTable,
) -> Result<Vec<ObjectId>, WorldError> {
    (0..BARRIER_COUNT)
        .map(|i| {
            add_object(
                world,
                objects,
                ObjectKind::Barrier { hit: false },
                Visual::Box {
                    half_extents: BARRIER_HALF_EXTENTS,
                    half_depth: BARRIER_HALF_DEPTH,
                },
                BodyDef::new(BodyKind::Kinematic, barrier_position(i)),
                FixtureDef::new(Shape::Box {
                    half_extents: BARRIER_HALF_EXTENTS,
                })
                .density(1.0)
                .filter(Filter::new(category::BARRIER, category::BALL)),
            )
        })
        .collect()
}

fn build_bumpers(
    world: &mut PhysicsWorld,
    objects: &mut ObjectTable,
) -> Result<Vec<ObjectId>, WorldError> {
    let top = TOP_BUMPERS
        .iter()
        .map(|&at| (at, TOP_BUMPER_RADIUS, TOP_BUMPER_RESTITUTION));
    let outboard = FLIPPER_BUMPERS
        .iter()
        .map(|&at| (at, FLIPPER_BUMPER_RADIUS, FLIPPER_BUMPER_RESTITUTION));

    top.chain(outboard)
        .map(|(at, radius, restitution)| {
            add_object(
                world,
                objects,
                ObjectKind::Bumper,
                Visual::Sphere { radius },
                BodyDef::new(BodyKind::Fixed, at),
                FixtureDef::new(Shape::Circle { radius })
                    .density(1.0)
                    .restitution(restitution)
                    .filter(Filter::new(category::BUMPER, category::BALL)),
            )
        })
        .collect()
}

fn build_flippers(
    world: &mut PhysicsWorld,
    objects: &mut ObjectTable,
    rest_speed: f32,
) -> Result<Vec<FlipperRig>, WorldError> {
    [true, false]
        .into_iter()
        .map(|left| {
            // Right side mirrors the left about the table centre line
            let side = if left { 1.0 } else { -1.0 };
            let position = Vec2::new(FLIPPER_POSITION.x * side, FLIPPER_POSITION.y);

            let (object, body) = add_object_with_body(
                world,
                objects,
                ObjectKind::Flipper { left },
                Visual::Box {
                    half_extents: FLIPPER_HALF_EXTENTS,
                    half_depth: FLIPPER_HALF_DEPTH,
                },
                BodyDef::new(BodyKind::Dynamic, position),
                FixtureDef::new(Shape::Box {
                    half_extents: FLIPPER_HALF_EXTENTS,
                })
                .density(1.0)
                .restitution(0.0)
                .filter(Filter::new(category::FLIPPER, category::BALL)),
            )?;

            let pin = world.create_body(BodyDef::new(
                BodyKind::Fixed,
                position - Vec2::new(FLIPPER_PIN_OFFSET * side, 0.0),
            ));
            let swing = FLIPPER_SWING_DEG.to_radians();
            let joint = world.create_joint(RevoluteDef {
                body1: pin,
                body2: body,
                anchor1: Vec2::ZERO,
                anchor2: Vec2::new(-FLIPPER_HINGE_OFFSET * side, 0.0),
                limits: Some([-swing, swing]),
                motor: Some(Motor {
                    speed: drive_speed(left, false, rest_speed),
                    max_torque: FLIPPER_MAX_TORQUE,
                }),
            })?;
            Ok(FlipperRig {
                object,
                pin,
                joint,
                left,
            })
        })
        .collect()
}

fn build_lose_trigger(
    world: &mut PhysicsWorld,
    objects: &mut ObjectTable,
) -> Result<ObjectId, WorldError> {
    add_object(
        world,
        objects,
        ObjectKind::LoseTrigger,
        Visual::Box {
            half_extents: LOSE_TRIGGER_HALF_EXTENTS,
            half_depth: LOSE_TRIGGER_HALF_DEPTH,
        },
        BodyDef::new(BodyKind::Fixed, LOSE_TRIGGER_POSITION),
        FixtureDef::new(Shape::Box {
            half_extents: LOSE_TRIGGER_HALF_EXTENTS,
        })
        .filter(Filter::new(category::LOSE_TRIGGER, category::BALL)),
    )
}

/// Add a dynamic ball at `position`
pub fn spawn_ball(
    world: &mut PhysicsWorld,
    objects: &mut ObjectTable,
    position: Vec2,
) -> Result<ObjectId, WorldError> {
    add_object(
        world,
        objects,
        ObjectKind::Ball,
        Visual::Sphere {
            radius: BALL_RADIUS,
        },
        BodyDef::new(BodyKind::Dynamic, position).ccd(true),
        FixtureDef::new(Shape::Circle {
            radius: BALL_RADIUS,
        })
        .density(BALL_DENSITY)
        .restitution(BALL_RESTITUTION)
        .friction(BALL_FRICTION)
        .filter(Filter::new(category::BALL, category::ALL)),
    )
}
