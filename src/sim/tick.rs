//! Fixed timestep simulation tick
//!
//! One call advances the table by exactly one physics step, whatever the
//! frame time was.

use super::playfield::{GameEvent, Playfield};
use crate::consts::*;
use crate::platform::{Button, InputFrame};

/// What to do with one side's flippers this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlipperDrive {
    /// Leave the motor as it is
    #[default]
    Hold,
    Raise,
    Lower,
}

impl FlipperDrive {
    /// Edge-triggered drive from a pair of buttons. A press wins over a
    /// release in the same frame.
    pub fn from_edges(input: &InputFrame, buttons: [Button; 2]) -> Self {
        if input.pressed.any(&buttons) {
            FlipperDrive::Raise
        } else if input.released.any(&buttons) {
            FlipperDrive::Lower
        } else {
            FlipperDrive::Hold
        }
    }
}

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: FlipperDrive,
    pub right: FlipperDrive,
}

impl TickInput {
    /// Square/L1 drive the left flippers, Circle/R1 the right ones
    pub fn from_frame(input: &InputFrame) -> Self {
        Self {
            left: FlipperDrive::from_edges(input, [Button::Square, Button::L1]),
            right: FlipperDrive::from_edges(input, [Button::Circle, Button::R1]),
        }
    }
}

/// Advance the playfield by one fixed step and respond to what touched
pub fn tick(field: &mut Playfield, input: &TickInput) -> Vec<GameEvent> {
    for (left, drive) in [(true, input.left), (false, input.right)] {
        match drive {
            FlipperDrive::Raise => field.drive_flippers(left, true),
            FlipperDrive::Lower => field.drive_flippers(left, false),
            FlipperDrive::Hold => {}
        }
    }

    field
        .world
        .step(PHYSICS_DT, VELOCITY_ITERATIONS, POSITION_ITERATIONS);
    field.time_ticks += 1;
    field.sync_transforms();

    let contacts = field.world.contacts();
    field.resolve_contacts(&contacts)
}
