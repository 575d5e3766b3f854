//! Deterministic simulation module
//!
//! All table physics and scoring lives here:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by object id)
//! - No rendering or platform dependencies

pub mod collision;
pub mod level;
pub mod object;
pub mod playfield;
pub mod tick;
pub mod world;

pub use collision::{FixtureEvaluation, Response, ResponseRules, ScoreLatch, respond};
pub use level::FlipperRig;
pub use object::{GameObject, ObjectId, ObjectKind, ObjectTable, ObjectType, Transform, Visual};
pub use playfield::{GameEvent, Playfield, PlayfieldRules};
pub use tick::{FlipperDrive, TickInput, tick};
pub use world::{Contact, Contactant, Filter, PhysicsWorld, WorldError};
