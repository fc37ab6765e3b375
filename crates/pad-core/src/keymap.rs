//! Pad button to keyboard key translation.
//!
//! The canonical key representation is the USB HID usage ID (page 0x07,
//! Keyboard/Keypad page), the same code a real USB keyboard would report
//! for the key. Injection sinks translate these to whatever their OS
//! primitive expects.

use serde::{Deserialize, Serialize};

use crate::domain::buttons::PadButton;

/// Keyboard keys the pad can produce.
///
/// The numeric value of each variant is its USB HID usage ID on the
/// keyboard/keypad page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum KeyCode {
    Enter = 0x28,
    Escape = 0x29,
    ArrowRight = 0x4F,
    ArrowLeft = 0x50,
    ArrowDown = 0x51,
    ArrowUp = 0x52,
}

impl KeyCode {
    /// The key's USB HID usage ID.
    pub fn usage_id(self) -> u16 {
        self as u16
    }
}

/// The fixed mapping from pad buttons to injected keys.
///
/// Total by construction: every button has a key, so a decoded edge can
/// always be dispatched.
pub fn key_code_for(button: PadButton) -> KeyCode {
    match button {
        PadButton::Up => KeyCode::ArrowUp,
        PadButton::Down => KeyCode::ArrowDown,
        PadButton::Left => KeyCode::ArrowLeft,
        PadButton::Right => KeyCode::ArrowRight,
        PadButton::Escape => KeyCode::Escape,
        PadButton::Enter => KeyCode::Enter,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_buttons_map_to_arrow_keys() {
        assert_eq!(key_code_for(PadButton::Up), KeyCode::ArrowUp);
        assert_eq!(key_code_for(PadButton::Down), KeyCode::ArrowDown);
        assert_eq!(key_code_for(PadButton::Left), KeyCode::ArrowLeft);
        assert_eq!(key_code_for(PadButton::Right), KeyCode::ArrowRight);
    }

    #[test]
    fn test_menu_buttons_map_to_escape_and_enter() {
        assert_eq!(key_code_for(PadButton::Escape), KeyCode::Escape);
        assert_eq!(key_code_for(PadButton::Enter), KeyCode::Enter);
    }

    #[test]
    fn test_usage_ids_match_the_hid_keyboard_page() {
        assert_eq!(KeyCode::Enter.usage_id(), 0x28);
        assert_eq!(KeyCode::Escape.usage_id(), 0x29);
        assert_eq!(KeyCode::ArrowUp.usage_id(), 0x52);
    }

    #[test]
    fn test_distinct_buttons_map_to_distinct_keys() {
        let codes: Vec<KeyCode> = PadButton::ALL.iter().map(|&b| key_code_for(b)).collect();
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
