//! Controller buttons and per-frame edge sets
//!
//! Phases react to edges (pressed/released this frame), never to held state.

use std::ops::BitOr;

/// Controller buttons, valued as their bit in a button mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Button {
    Select = 1,
    Start = 1 << 3,
    Up = 1 << 4,
    Right = 1 << 5,
    Down = 1 << 6,
    Left = 1 << 7,
    L1 = 1 << 10,
    R1 = 1 << 11,
    Triangle = 1 << 12,
    Circle = 1 << 13,
    Cross = 1 << 14,
    Square = 1 << 15,
}

impl Button {
    pub const fn bit(self) -> u32 {
        self as u32
    }
}

/// A set of buttons
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Buttons(u32);

impl Buttons {
    pub const NONE: Buttons = Buttons(0);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, button: Button) -> bool {
        self.0 & button.bit() != 0
    }

    pub fn any(self, buttons: &[Button]) -> bool {
        buttons.iter().any(|b| self.contains(*b))
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn with(self, button: Button) -> Self {
        Self(self.0 | button.bit())
    }
}

impl From<Button> for Buttons {
    fn from(button: Button) -> Self {
        Self(button.bit())
    }
}

impl BitOr for Buttons {
    type Output = Buttons;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOr<Button> for Buttons {
    type Output = Buttons;

    fn bitor(self, rhs: Button) -> Self::Output {
        self.with(rhs)
    }
}

impl BitOr for Button {
    type Output = Buttons;

    fn bitor(self, rhs: Self) -> Self::Output {
        Buttons::from(self).with(rhs)
    }
}

/// Button edges for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputFrame {
    pub pressed: Buttons,
    pub released: Buttons,
}

impl InputFrame {
    /// A frame where only `button` went down
    pub fn press(button: Button) -> Self {
        Self {
            pressed: button.into(),
            released: Buttons::NONE,
        }
    }

    /// A frame where only `button` came up
    pub fn release(button: Button) -> Self {
        Self {
            pressed: Buttons::NONE,
            released: button.into(),
        }
    }

    pub fn just_pressed(&self, button: Button) -> bool {
        self.pressed.contains(button)
    }

    pub fn just_released(&self, button: Button) -> bool {
        self.released.contains(button)
    }
}

/// Turns sampled held-state into per-frame edges
#[derive(Debug, Clone, Default)]
pub struct ButtonTracker {
    held: Buttons,
}

impl ButtonTracker {
    pub fn update(&mut self, now_held: Buttons) -> InputFrame {
        let frame = InputFrame {
            pressed: Buttons(now_held.0 & !self.held.0),
            released: Buttons(self.held.0 & !now_held.0),
        };
        self.held = now_held;
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_reports_edges_once() {
        let mut tracker = ButtonTracker::default();

        let down = tracker.update(Button::Cross.into());
        assert!(down.just_pressed(Button::Cross));
        assert!(!down.just_released(Button::Cross));

        // Held: no new edge
        let held = tracker.update(Button::Cross.into());
        assert!(held.pressed.is_empty());
        assert!(held.released.is_empty());

        let up = tracker.update(Buttons::NONE);
        assert!(up.just_released(Button::Cross));
        assert!(!up.just_pressed(Button::Cross));
    }

    #[test]
    fn test_combined_buttons() {
        let both = Button::L1 | Button::R1;
        assert_eq!(both.bits(), 3072);
        assert!(both.contains(Button::L1));
        assert!(both.any(&[Button::Square, Button::R1]));
        assert!(!both.contains(Button::Cross));
    }
}
