//! Button identity and state types for the six-button dance pad.
//!
//! The pad reports all six buttons in every frame, index-aligned to
//! [`PadButton`]. The wire encoding is inverted relative to the semantic
//! meaning: the device sends `0` for a held button and `1` for a released
//! one. That inversion is part of the hardware contract and is resolved
//! exactly once, at the decode boundary in [`crate::protocol::frame`];
//! everything above that boundary speaks [`ButtonState`].

use serde::{Deserialize, Serialize};

/// Number of buttons on the pad. Every frame carries exactly this many fields.
pub const PAD_BUTTON_COUNT: usize = 6;

/// Identity of one pad button.
///
/// The discriminant is the button's field position in every wire frame and
/// its slot in a [`StateVector`]. The mapping is fixed by the hardware and
/// never changes at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(usize)]
pub enum PadButton {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
    Escape = 4,
    Enter = 5,
}

impl PadButton {
    /// All buttons in frame-index order.
    pub const ALL: [PadButton; PAD_BUTTON_COUNT] = [
        PadButton::Up,
        PadButton::Down,
        PadButton::Left,
        PadButton::Right,
        PadButton::Escape,
        PadButton::Enter,
    ];

    /// Returns the button at the given frame index, or `None` if out of range.
    pub fn from_index(index: usize) -> Option<PadButton> {
        Self::ALL.get(index).copied()
    }

    /// The button's field position in a frame and slot in a [`StateVector`].
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Physical state of one button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ButtonState {
    /// The button is held down.
    Pressed,
    /// The button is up.
    Released,
}

impl ButtonState {
    /// `true` if the button is held down.
    pub fn is_pressed(self) -> bool {
        matches!(self, ButtonState::Pressed)
    }
}

/// The state of all six buttons at one instant.
///
/// Always complete: a `StateVector` either decodes from a fully valid frame
/// or does not exist at all. It is `Copy`, so handing out a snapshot is a
/// plain bitwise copy with no aliasing of the writer's storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateVector([ButtonState; PAD_BUTTON_COUNT]);

impl StateVector {
    /// A vector with every button released. This is the state a driver
    /// starts from before the first frame arrives.
    pub fn all_released() -> Self {
        Self([ButtonState::Released; PAD_BUTTON_COUNT])
    }

    /// Wraps a complete set of decoded button states.
    pub fn new(states: [ButtonState; PAD_BUTTON_COUNT]) -> Self {
        Self(states)
    }

    /// The state of one button.
    pub fn get(&self, button: PadButton) -> ButtonState {
        self.0[button.index()]
    }

    /// Iterates all buttons with their states, in frame-index order.
    pub fn iter(&self) -> impl Iterator<Item = (PadButton, ButtonState)> + '_ {
        PadButton::ALL.iter().map(move |&b| (b, self.get(b)))
    }
}

impl Default for StateVector {
    fn default() -> Self {
        Self::all_released()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
