//! Rigid-body world adapter over `rapier2d`
//!
//! Owns every rapier set and exposes the handful of operations the table
//! needs: build bodies, fixtures and motorised hinges, step, and snapshot
//! the touching contacts. Stale handles are reported, never dereferenced.

use std::fmt;
use std::num::NonZeroUsize;

use glam::Vec2;
use rapier2d::prelude::*;
use thiserror::Error;

use super::object::{GameObject, ObjectId, category};

/// Damping factor for velocity-targeting joint motors
const MOTOR_DAMPING: f32 = 1.0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    #[error("rigid body {0:?} does not exist")]
    UnknownBody(RigidBodyHandle),
    #[error("chain shape needs at least two vertices, got {0}")]
    DegenerateChain(usize),
}

/// Category/mask pair. Two fixtures collide when each one's category
/// intersects the other's mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Filter {
    pub category: u32,
    pub mask: u32,
}

impl Filter {
    pub const fn new(category: u32, mask: u32) -> Self {
        Self { category, mask }
    }

    fn groups(self) -> InteractionGroups {
        InteractionGroups::new(
            Group::from_bits_truncate(self.category),
            Group::from_bits_truncate(self.mask),
        )
    }

    fn from_groups(groups: InteractionGroups) -> Self {
        Self {
            category: groups.memberships.bits(),
            mask: groups.filter.bits(),
        }
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::new(category::BALL, category::ALL)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Fixed,
    /// Moved by the game, never by forces
    Kinematic,
    Dynamic,
}

#[derive(Debug, Clone, Copy)]
pub struct BodyDef {
    pub kind: BodyKind,
    pub position: Vec2,
    pub angle: f32,
    /// Object stored in the body's `user_data`
    pub owner: Option<ObjectId>,
    /// Continuous collision detection (fast balls against thin chains)
    pub ccd: bool,
}

impl BodyDef {
    pub fn new(kind: BodyKind, position: Vec2) -> Self {
        Self {
            kind,
            position,
            angle: 0.0,
            owner: None,
            ccd: false,
        }
    }

    pub fn owner(mut self, id: ObjectId) -> Self {
        self.owner = Some(id);
        self
    }

    pub fn ccd(mut self, enabled: bool) -> Self {
        self.ccd = enabled;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle { radius: f32 },
    Box { half_extents: Vec2 },
    /// Open polyline through the vertices
    Chain { vertices: Vec<Vec2> },
}

#[derive(Debug, Clone)]
pub struct FixtureDef {
    pub shape: Shape,
    pub density: f32,
    pub restitution: f32,
    pub friction: f32,
    pub filter: Filter,
}

impl FixtureDef {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            density: 0.0,
            restitution: 0.0,
            friction: 0.2,
            filter: Filter::default(),
        }
    }

    pub fn density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    pub fn restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }
}

/// Angular velocity motor on a hinge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motor {
    pub speed: f32,
    pub max_torque: f32,
}

/// Hinge between two bodies. Positive angles turn `body2` anticlockwise
/// relative to `body1`.
#[derive(Debug, Clone, Copy)]
pub struct RevoluteDef {
    pub body1: RigidBodyHandle,
    pub body2: RigidBodyHandle,
    pub anchor1: Vec2,
    pub anchor2: Vec2,
    /// Lower/upper angle in radians
    pub limits: Option<[f32; 2]>,
    pub motor: Option<Motor>,
}

/// One side of a touching contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contactant {
    pub collider: ColliderHandle,
    /// Category bits of the collider at snapshot time
    pub category: u32,
    /// Object read back from the parent body's `user_data`
    pub owner: Option<ObjectId>,
}

impl Contactant {
    /// Describe an object's collider as a contact side
    pub fn of(object: &GameObject, category: u32) -> Self {
        Self {
            collider: object.collider,
            category,
            owner: Some(object.id),
        }
    }
}

/// A touching pair from the narrow phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub a: Contactant,
    pub b: Contactant,
    /// First contact point in world space, if the manifold has one
    pub point: Option<Vec2>,
}

impl Contact {
    pub fn new(a: Contactant, b: Contactant) -> Self {
        Self { a, b, point: None }
    }
}

/// Physics world containing all `rapier2d` components
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: BroadPhase,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    pub gravity: Vector<Real>,
    pub frame: u64,
}

impl fmt::Debug for PhysicsWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhysicsWorld")
            .field("frame", &self.frame)
            .field("rigid_body_count", &self.rigid_body_set.len())
            .field("collider_count", &self.collider_set.len())
            .field("joint_count", &self.impulse_joint_set.len())
            .field("gravity", &self.gravity)
            .finish_non_exhaustive()
    }
}

impl PhysicsWorld {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            gravity: vector![gravity.x, gravity.y],
            frame: 0,
        }
    }

    pub fn create_body(&mut self, def: BodyDef) -> RigidBodyHandle {
        let builder = match def.kind {
            BodyKind::Fixed => RigidBodyBuilder::fixed(),
            BodyKind::Kinematic => RigidBodyBuilder::kinematic_position_based(),
            BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
        };
        let body = builder
            .translation(vector![def.position.x, def.position.y])
            .rotation(def.angle)
            .user_data(def.owner.map_or(0, ObjectId::to_user_data))
            .ccd_enabled(def.ccd)
            .build();
        self.rigid_body_set.insert(body)
    }

    /// Attach a collider to an existing body
    pub fn create_fixture(
        &mut self,
        body: RigidBodyHandle,
        def: FixtureDef,
    ) -> Result<ColliderHandle, WorldError> {
        if !self.rigid_body_set.contains(body) {
            return Err(WorldError::UnknownBody(body));
        }
        let builder = match def.shape {
            Shape::Circle { radius } => ColliderBuilder::ball(radius),
            Shape::Box { half_extents } => ColliderBuilder::cuboid(half_extents.x, half_extents.y),
            Shape::Chain { vertices } => {
                if vertices.len() < 2 {
                    return Err(WorldError::DegenerateChain(vertices.len()));
                }
                let points = vertices.iter().map(|v| point![v.x, v.y]).collect();
                ColliderBuilder::polyline(points, None)
            }
        };
        let collider = builder
            .density(def.density)
            .restitution(def.restitution)
            .restitution_combine_rule(CoefficientCombineRule::Max)
            .friction(def.friction)
            .collision_groups(def.filter.groups())
            .build();
        Ok(self
            .collider_set
            .insert_with_parent(collider, body, &mut self.rigid_body_set))
    }

    pub fn create_joint(&mut self, def: RevoluteDef) -> Result<ImpulseJointHandle, WorldError> {
        for body in [def.body1, def.body2] {
            if !self.rigid_body_set.contains(body) {
                return Err(WorldError::UnknownBody(body));
            }
        }
        let mut builder = RevoluteJointBuilder::new()
            .local_anchor1(point![def.anchor1.x, def.anchor1.y])
            .local_anchor2(point![def.anchor2.x, def.anchor2.y])
            .contacts_enabled(false);
        if let Some(limits) = def.limits {
            builder = builder.limits(limits);
        }
        if let Some(motor) = def.motor {
            builder = builder
                .motor_velocity(motor.speed, MOTOR_DAMPING)
                .motor_max_force(motor.max_torque);
        }
        Ok(self
            .impulse_joint_set
            .insert(def.body1, def.body2, builder.build(), true))
    }

    /// Advance the world by `dt`.
    ///
    /// Rapier resolves penetration inside its velocity solver, so
    /// `position_iterations` has no separate pass to drive and is ignored.
    pub fn step(&mut self, dt: f32, velocity_iterations: usize, position_iterations: usize) {
        let _ = position_iterations;
        self.integration_parameters.dt = dt;
        self.integration_parameters.num_solver_iterations =
            NonZeroUsize::new(velocity_iterations).unwrap_or(NonZeroUsize::MIN);

        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
        self.frame += 1;
    }

    /// Remove a body with its colliders and joints. Returns false for a
    /// stale handle.
    pub fn destroy_body(&mut self, handle: RigidBodyHandle) -> bool {
        self.rigid_body_set
            .remove(
                handle,
                &mut self.island_manager,
                &mut self.collider_set,
                &mut self.impulse_joint_set,
                &mut self.multibody_joint_set,
                true,
            )
            .is_some()
    }

    pub fn destroy_joint(&mut self, handle: ImpulseJointHandle) -> bool {
        self.impulse_joint_set.remove(handle, true).is_some()
    }

    /// Snapshot of every pair currently touching
    pub fn contacts(&self) -> Vec<Contact> {
        self.narrow_phase
            .contact_pairs()
            .filter(|pair| pair.has_any_active_contact)
            .filter_map(|pair| {
                let a = self.contactant(pair.collider1)?;
                let b = self.contactant(pair.collider2)?;
                let point = pair
                    .manifolds
                    .iter()
                    .flat_map(|m| m.points.iter())
                    .next()
                    .and_then(|p| {
                        let collider = self.collider_set.get(pair.collider1)?;
                        let world = collider.position() * p.local_p1;
                        Some(Vec2::new(world.x, world.y))
                    });
                Some(Contact { a, b, point })
            })
            .collect()
    }

    /// Describe a live collider as a contact side
    pub fn contactant(&self, collider: ColliderHandle) -> Option<Contactant> {
        let co = self.collider_set.get(collider)?;
        let owner = co
            .parent()
            .and_then(|body| self.rigid_body_set.get(body))
            .and_then(|body| ObjectId::from_user_data(body.user_data));
        Some(Contactant {
            collider,
            category: co.collision_groups().memberships.bits(),
            owner,
        })
    }

    /// Replace a collider's filter. Returns false for a stale handle.
    pub fn set_filter(&mut self, collider: ColliderHandle, filter: Filter) -> bool {
        match self.collider_set.get_mut(collider) {
            Some(co) => {
                co.set_collision_groups(filter.groups());
                true
            }
            None => false,
        }
    }

    pub fn filter(&self, collider: ColliderHandle) -> Option<Filter> {
        self.collider_set
            .get(collider)
            .map(|co| Filter::from_groups(co.collision_groups()))
    }

    /// Retarget a hinge motor and wake the driven body
    pub fn set_motor_speed(&mut self, joint: ImpulseJointHandle, speed: f32) -> bool {
        let Some(joint) = self.impulse_joint_set.get_mut(joint) else {
            return false;
        };
        joint
            .data
            .set_motor_velocity(JointAxis::AngX, speed, MOTOR_DAMPING);
        let driven = joint.body2;
        if let Some(body) = self.rigid_body_set.get_mut(driven) {
            body.wake_up(true);
        }
        true
    }

    /// Current motor target speed of a hinge
    pub fn motor_speed(&self, joint: ImpulseJointHandle) -> Option<f32> {
        self.impulse_joint_set
            .get(joint)
            .and_then(|j| j.data.motor(JointAxis::AngX))
            .map(|m| m.target_vel)
    }

    pub fn body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    pub fn joint_count(&self) -> usize {
        self.impulse_joint_set.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{GRAVITY, PHYSICS_DT, POSITION_ITERATIONS, VELOCITY_ITERATIONS};

    fn ball(world: &mut PhysicsWorld, at: Vec2) -> (RigidBodyHandle, ColliderHandle) {
        let body = world.create_body(BodyDef::new(BodyKind::Dynamic, at));
        let collider = world
            .create_fixture(
                body,
                FixtureDef::new(Shape::Circle { radius: 0.5 })
                    .density(0.7)
                    .filter(Filter::new(category::BALL, category::ALL)),
            )
            .unwrap();
        (body, collider)
    }

    #[test]
    fn test_dynamic_body_falls() {
        let mut world = PhysicsWorld::new(GRAVITY);
        let (body, _) = ball(&mut world, Vec2::new(0.0, 10.0));

        for _ in 0..30 {
            world.step(PHYSICS_DT, VELOCITY_ITERATIONS, POSITION_ITERATIONS);
        }

        assert!(world.body(body).unwrap().translation().y < 10.0);
        assert_eq!(world.frame, 30);
    }

    #[test]
    fn test_owner_round_trips_through_user_data() {
        let mut world = PhysicsWorld::new(GRAVITY);
        let mut table = crate::sim::ObjectTable::new();
        let id = table.allocate_id();

        let body = world.create_body(BodyDef::new(BodyKind::Fixed, Vec2::ZERO).owner(id));
        let collider = world
            .create_fixture(
                body,
                FixtureDef::new(Shape::Box {
                    half_extents: Vec2::new(1.0, 1.0),
                })
                .filter(Filter::new(category::BUMPER, category::BALL)),
            )
            .unwrap();

        let side = world.contactant(collider).unwrap();
        assert_eq!(side.owner, Some(id));
        assert_eq!(side.category, category::BUMPER);
    }

    #[test]
    fn test_stale_handles_are_reported() {
        let mut world = PhysicsWorld::new(GRAVITY);
        let (body, collider) = ball(&mut world, Vec2::ZERO);

        assert!(world.destroy_body(body));
        assert!(!world.destroy_body(body));
        assert!(world.body(body).is_none());
        assert!(!world.set_filter(collider, Filter::new(0, 0)));
        assert_eq!(
            world.create_fixture(body, FixtureDef::new(Shape::Circle { radius: 1.0 })),
            Err(WorldError::UnknownBody(body))
        );
    }

    #[test]
    fn test_degenerate_chain_rejected() {
        let mut world = PhysicsWorld::new(GRAVITY);
        let body = world.create_body(BodyDef::new(BodyKind::Fixed, Vec2::ZERO));
        let result = world.create_fixture(
            body,
            FixtureDef::new(Shape::Chain {
                vertices: vec![Vec2::ZERO],
            }),
        );
        assert_eq!(result, Err(WorldError::DegenerateChain(1)));
    }

    #[test]
    fn test_filter_round_trip() {
        let mut world = PhysicsWorld::new(GRAVITY);
        let (_, collider) = ball(&mut world, Vec2::ZERO);

        let hit = Filter::new(category::HIT_BARRIER, 0);
        assert!(world.set_filter(collider, hit));
        assert_eq!(world.filter(collider), Some(hit));
    }

    #[test]
    fn test_ball_resting_on_box_reports_contact() {
        let mut world = PhysicsWorld::new(GRAVITY);
        let floor = world.create_body(BodyDef::new(BodyKind::Fixed, Vec2::ZERO));
        let floor_collider = world
            .create_fixture(
                floor,
                FixtureDef::new(Shape::Box {
                    half_extents: Vec2::new(5.0, 0.5),
                })
                .filter(Filter::new(category::BOARD, category::BALL)),
            )
            .unwrap();
        let (_, ball_collider) = ball(&mut world, Vec2::new(0.0, 1.2));

        for _ in 0..60 {
            world.step(PHYSICS_DT, VELOCITY_ITERATIONS, POSITION_ITERATIONS);
        }

        let contacts = world.contacts();
        assert!(contacts.iter().any(|c| {
            let pair = [c.a.collider, c.b.collider];
            pair.contains(&floor_collider) && pair.contains(&ball_collider)
        }));
    }

    #[test]
    fn test_masked_out_pair_never_touches() {
        let mut world = PhysicsWorld::new(GRAVITY);
        let floor = world.create_body(BodyDef::new(BodyKind::Fixed, Vec2::ZERO));
        world
            .create_fixture(
                floor,
                FixtureDef::new(Shape::Box {
                    half_extents: Vec2::new(5.0, 0.5),
                })
                .filter(Filter::new(category::HIT_BARRIER, 0)),
            )
            .unwrap();
        let (ball_body, _) = ball(&mut world, Vec2::new(0.0, 1.2));

        for _ in 0..60 {
            world.step(PHYSICS_DT, VELOCITY_ITERATIONS, POSITION_ITERATIONS);
        }

        assert!(world.contacts().is_empty());
        // Fell straight through
        assert!(world.body(ball_body).unwrap().translation().y < 0.0);
    }

    #[test]
    fn test_motor_speed_can_be_retargeted() {
        let mut world = PhysicsWorld::new(GRAVITY);
        let pin = world.create_body(BodyDef::new(BodyKind::Fixed, Vec2::ZERO));
        let arm = world.create_body(BodyDef::new(BodyKind::Dynamic, Vec2::new(1.0, 0.0)));
        world
            .create_fixture(
                arm,
                FixtureDef::new(Shape::Box {
                    half_extents: Vec2::new(1.0, 0.2),
                })
                .density(1.0),
            )
            .unwrap();
        let joint = world
            .create_joint(RevoluteDef {
                body1: pin,
                body2: arm,
                anchor1: Vec2::ZERO,
                anchor2: Vec2::new(-1.0, 0.0),
                limits: Some([-0.5, 0.5]),
                motor: Some(Motor {
                    speed: -5.0,
                    max_torque: 100.0,
                }),
            })
            .unwrap();

        assert_eq!(world.motor_speed(joint), Some(-5.0));
        assert!(world.set_motor_speed(joint, 5.0));
        assert_eq!(world.motor_speed(joint), Some(5.0));

        assert!(world.destroy_joint(joint));
        assert!(!world.set_motor_speed(joint, 1.0));
        assert_eq!(world.joint_count(), 0);
    }
}
