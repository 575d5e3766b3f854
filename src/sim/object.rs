//! Game objects and the id-keyed object table
//!
//! Every gameplay body stores its object's id in the body's `user_data`.
//! That back-reference never owns anything: the table decides when an object
//! lives or dies, and a stale id simply misses on lookup.

use std::collections::BTreeMap;

use glam::Vec2;
use rapier2d::prelude::{ColliderHandle, RigidBody, RigidBodyHandle};

/// Collision category bits (narrow-phase filtering only)
pub mod category {
    pub const BALL: u32 = 0x0001;
    pub const FLIPPER: u32 = 0x0002;
    pub const BARRIER: u32 = 0x0004;
    pub const BUMPER: u32 = 0x0008;
    pub const BOARD: u32 = 0x0010;
    pub const LOSE_TRIGGER: u32 = 0x0020;
    /// A barrier that has been hit this round and no longer collides
    pub const HIT_BARRIER: u32 = 0x0040;
    pub const PLAYER: u32 = 0x0080;
    pub const ALL: u32 = u32::MAX;
}

/// Stable object identifier. Never reused within a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(u32);

impl ObjectId {
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Encode for a rigid body's `user_data` (0 means "no object")
    pub fn to_user_data(self) -> u128 {
        u128::from(self.0)
    }

    pub fn from_user_data(data: u128) -> Option<Self> {
        match u32::try_from(data) {
            Ok(0) | Err(_) => None,
            Ok(raw) => Some(Self(raw)),
        }
    }
}

/// Object type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Ball,
    Flipper,
    Barrier,
    Bumper,
    Board,
    LoseTrigger,
    Player,
}

impl ObjectType {
    /// Category bits a fixture of this type is created with
    pub fn category(self) -> u32 {
        match self {
            ObjectType::Ball => category::BALL,
            ObjectType::Flipper => category::FLIPPER,
            ObjectType::Barrier => category::BARRIER,
            ObjectType::Bumper => category::BUMPER,
            ObjectType::Board => category::BOARD,
            ObjectType::LoseTrigger => category::LOSE_TRIGGER,
            ObjectType::Player => category::PLAYER,
        }
    }

    /// Touching one of these can award points
    pub fn is_scoring(self) -> bool {
        matches!(
            self,
            ObjectType::Flipper | ObjectType::Barrier | ObjectType::Bumper
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ObjectType::Ball => "ball",
            ObjectType::Flipper => "flipper",
            ObjectType::Barrier => "barrier",
            ObjectType::Bumper => "bumper",
            ObjectType::Board => "board",
            ObjectType::LoseTrigger => "lose trigger",
            ObjectType::Player => "player",
        }
    }
}

/// Per-type object state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Ball,
    /// `left` selects the motor-drive sign and is fixed once built
    Flipper { left: bool },
    /// `hit` is set on contact and cleared when the round resets
    Barrier { hit: bool },
    Bumper,
    Board,
    LoseTrigger,
    Player,
}

impl ObjectKind {
    pub fn object_type(&self) -> ObjectType {
        match self {
            ObjectKind::Ball => ObjectType::Ball,
            ObjectKind::Flipper { .. } => ObjectType::Flipper,
            ObjectKind::Barrier { .. } => ObjectType::Barrier,
            ObjectKind::Bumper => ObjectType::Bumper,
            ObjectKind::Board => ObjectType::Board,
            ObjectKind::LoseTrigger => ObjectType::LoseTrigger,
            ObjectKind::Player => ObjectType::Player,
        }
    }

    /// Fresh state for a type tag
    pub fn from_type(tag: ObjectType) -> Self {
        match tag {
            ObjectType::Ball => ObjectKind::Ball,
            ObjectType::Flipper => ObjectKind::Flipper { left: false },
            ObjectType::Barrier => ObjectKind::Barrier { hit: false },
            ObjectType::Bumper => ObjectKind::Bumper,
            ObjectType::Board => ObjectKind::Board,
            ObjectType::LoseTrigger => ObjectKind::LoseTrigger,
            ObjectType::Player => ObjectKind::Player,
        }
    }
}

/// How an object is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Visual {
    Sphere { radius: f32 },
    /// Box with 2D half extents on the table plane and a half depth
    Box { half_extents: Vec2, half_depth: f32 },
    /// Geometry comes from the loaded table scene
    Scene,
}

/// Visual placement, copied from the simulation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    pub position: Vec2,
    pub angle: f32,
}

#[derive(Debug, Clone)]
pub struct GameObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub visual: Visual,
    pub transform: Transform,
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
}

impl GameObject {
    pub fn new(
        id: ObjectId,
        kind: ObjectKind,
        visual: Visual,
        body: RigidBodyHandle,
        collider: ColliderHandle,
    ) -> Self {
        Self {
            id,
            kind,
            visual,
            transform: Transform::default(),
            body,
            collider,
        }
    }

    /// Copy the body's position and rotation into the visual transform
    pub fn update_from_simulation(&mut self, body: &RigidBody) {
        let translation = body.translation();
        self.transform.position = Vec2::new(translation.x, translation.y);
        self.transform.angle = body.rotation().angle();
    }

    pub fn object_type(&self) -> ObjectType {
        self.kind.object_type()
    }

    /// Retag the object. Per-type state is reset when the tag changes.
    pub fn set_type(&mut self, tag: ObjectType) {
        if self.object_type() != tag {
            self.kind = ObjectKind::from_type(tag);
        }
    }

    /// Whether the transform follows the simulation every step
    pub fn is_moving(&self) -> bool {
        matches!(self.kind, ObjectKind::Ball | ObjectKind::Flipper { .. })
    }

    /// Set the flipper side. Returns false if this is not a flipper.
    pub fn set_left(&mut self, option: bool) -> bool {
        match &mut self.kind {
            ObjectKind::Flipper { left } => {
                *left = option;
                true
            }
            _ => false,
        }
    }

    /// Flipper side (`None` for non-flippers)
    pub fn left(&self) -> Option<bool> {
        match self.kind {
            ObjectKind::Flipper { left } => Some(left),
            _ => None,
        }
    }

    /// Set the barrier hit flag. Returns false if this is not a barrier.
    pub fn set_hit(&mut self, option: bool) -> bool {
        match &mut self.kind {
            ObjectKind::Barrier { hit } => {
                *hit = option;
                true
            }
            _ => false,
        }
    }

    /// Barrier hit flag (`None` for non-barriers)
    pub fn hit(&self) -> Option<bool> {
        match self.kind {
            ObjectKind::Barrier { hit } => Some(hit),
            _ => None,
        }
    }
}

/// Objects keyed by id, iterated in id order
#[derive(Debug, Default)]
pub struct ObjectTable {
    objects: BTreeMap<ObjectId, GameObject>,
    next_id: u32,
}

impl ObjectTable {
    pub fn new() -> Self {
        Self {
            objects: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Allocate a new object id (so the body can carry it before insertion)
    pub fn allocate_id(&mut self) -> ObjectId {
        // Default-constructed tables start at 0; id 0 is reserved for "none"
        if self.next_id == 0 {
            self.next_id = 1;
        }
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn insert(&mut self, object: GameObject) {
        self.objects.insert(object.id, object);
    }

    pub fn get(&self, id: ObjectId) -> Option<&GameObject> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut GameObject> {
        self.objects.get_mut(&id)
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<GameObject> {
        self.objects.remove(&id)
    }

    /// Type tag of a live object
    pub fn type_of(&self, id: ObjectId) -> Option<ObjectType> {
        self.get(id).map(GameObject::object_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameObject> {
        self.objects.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut GameObject> {
        self.objects.values_mut()
    }

    /// Ids of all objects with the given tag, in id order
    pub fn ids_of(&self, tag: ObjectType) -> Vec<ObjectId> {
        self.iter()
            .filter(|o| o.object_type() == tag)
            .map(|o| o.id)
            .collect()
    }

    pub fn count(&self, tag: ObjectType) -> usize {
        self.iter().filter(|o| o.object_type() == tag).count()
    }

    /// True when the table has barriers and every one of them is hit
    pub fn all_barriers_hit(&self) -> bool {
        let mut barriers = self.iter().filter_map(GameObject::hit).peekable();
        barriers.peek().is_some() && barriers.all(|hit| hit)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Drop every object. Ids keep counting up.
    pub fn clear(&mut self) {
        self.objects.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rapier2d::prelude::*;

    fn dummy(table: &mut ObjectTable, kind: ObjectKind) -> ObjectId {
        let id = table.allocate_id();
        table.insert(GameObject::new(
            id,
            kind,
            Visual::Scene,
            RigidBodyHandle::invalid(),
            ColliderHandle::invalid(),
        ));
        id
    }

    #[test]
    fn test_user_data_round_trip() {
        let mut table = ObjectTable::new();
        let id = table.allocate_id();
        assert_eq!(ObjectId::from_user_data(id.to_user_data()), Some(id));
        assert_eq!(ObjectId::from_user_data(0), None);
        assert_eq!(ObjectId::from_user_data(u128::MAX), None);
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut table = ObjectTable::default();
        let a = dummy(&mut table, ObjectKind::Ball);
        table.remove(a);
        let b = dummy(&mut table, ObjectKind::Ball);
        assert_ne!(a, b);
        assert!(table.get(a).is_none());
        assert_ne!(a.raw(), 0);
    }

    #[test]
    fn test_flipper_and_barrier_accessors() {
        let mut table = ObjectTable::new();
        let flipper = dummy(&mut table, ObjectKind::Flipper { left: false });
        let ball = dummy(&mut table, ObjectKind::Ball);

        assert!(table.get_mut(flipper).unwrap().set_left(true));
        assert_eq!(table.get(flipper).unwrap().left(), Some(true));
        assert!(!table.get_mut(ball).unwrap().set_left(true));
        assert_eq!(table.get(ball).unwrap().left(), None);
        assert_eq!(table.get(ball).unwrap().hit(), None);
    }

    #[test]
    fn test_set_type_resets_state_only_on_change() {
        let mut table = ObjectTable::new();
        let id = dummy(&mut table, ObjectKind::Barrier { hit: true });
        let object = table.get_mut(id).unwrap();

        object.set_type(ObjectType::Barrier);
        assert_eq!(object.hit(), Some(true));

        object.set_type(ObjectType::Bumper);
        assert_eq!(object.object_type(), ObjectType::Bumper);
        assert_eq!(object.hit(), None);
    }

    #[test]
    fn test_all_barriers_hit() {
        let mut table = ObjectTable::new();
        // No barriers: never "all hit"
        assert!(!table.all_barriers_hit());

        let a = dummy(&mut table, ObjectKind::Barrier { hit: true });
        let b = dummy(&mut table, ObjectKind::Barrier { hit: false });
        dummy(&mut table, ObjectKind::Bumper);
        assert!(!table.all_barriers_hit());

        table.get_mut(b).unwrap().set_hit(true);
        assert!(table.all_barriers_hit());
        assert_eq!(table.ids_of(ObjectType::Barrier), vec![a, b]);
        assert_eq!(table.count(ObjectType::Bumper), 1);
    }

    #[test]
    fn test_update_from_simulation() {
        let mut table = ObjectTable::new();
        let id = dummy(&mut table, ObjectKind::Ball);
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![1.5, -2.0])
            .rotation(0.25)
            .build();

        let object = table.get_mut(id).unwrap();
        object.update_from_simulation(&body);
        assert_eq!(object.transform.position, Vec2::new(1.5, -2.0));
        assert!((object.transform.angle - 0.25).abs() < 1e-6);
    }
}
