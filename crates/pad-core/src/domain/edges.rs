//! Edge detection between consecutive button state frames.
//!
//! The pad retransmits the full state of all six buttons in every frame, so
//! most fields of most frames are unchanged. Key events must fire exactly
//! once per actual change, which is what [`EdgeDetector`] extracts.

use tracing::trace;

use crate::domain::buttons::{ButtonState, PadButton, StateVector};

/// A single button whose state changed between two consecutive frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// Which button changed.
    pub button: PadButton,
    /// The state it changed to.
    pub state: ButtonState,
}

/// Diffs consecutive [`StateVector`]s into per-button [`Edge`]s.
///
/// Holds the last applied vector, starting from all-released. Edges are
/// emitted in ascending button-index order; games that read several
/// simultaneous presses can observe the injection order, so it must be
/// deterministic.
#[derive(Debug, Default)]
pub struct EdgeDetector {
    previous: StateVector,
}

impl EdgeDetector {
    /// Creates a detector whose baseline is every button released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compares `new` against the previously applied vector and returns one
    /// [`Edge`] per changed button, lowest index first.
    ///
    /// The stored vector is replaced wholesale after the comparison, so no
    /// caller ever observes edges computed against a partially updated
    /// vector. Applying the same vector twice returns no edges the second
    /// time.
    pub fn apply(&mut self, new: StateVector) -> Vec<Edge> {
        let mut edges = Vec::new();
        for button in PadButton::ALL {
            let state = new.get(button);
            if state != self.previous.get(button) {
                trace!(?button, ?state, "button edge");
                edges.push(Edge { button, state });
            }
        }
        self.previous = new;
        edges
    }

    /// The most recently applied vector, by copy.
    pub fn states(&self) -> StateVector {
        self.previous
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::buttons::PAD_BUTTON_COUNT;

    fn vector(pressed: &[PadButton]) -> StateVector {
        let mut states = [ButtonState::Released; PAD_BUTTON_COUNT];
        for &b in pressed {
            states[b.index()] = ButtonState::Pressed;
        }
        StateVector::new(states)
    }

    #[test]
    fn test_first_frame_with_one_press_emits_one_edge() {
        let mut detector = EdgeDetector::new();

        let edges = detector.apply(vector(&[PadButton::Up]));

        assert_eq!(
            edges,
            vec![Edge {
                button: PadButton::Up,
                state: ButtonState::Pressed
            }]
        );
    }

    #[test]
    fn test_unchanged_buttons_emit_no_edges() {
        let mut detector = EdgeDetector::new();
        detector.apply(vector(&[PadButton::Up]));

        // Up stays pressed, Down becomes pressed: only Down is an edge.
        let edges = detector.apply(vector(&[PadButton::Up, PadButton::Down]));

        assert_eq!(
            edges,
            vec![Edge {
                button: PadButton::Down,
                state: ButtonState::Pressed
            }]
        );
    }

    #[test]
    fn test_reapplying_the_same_vector_emits_nothing() {
        let mut detector = EdgeDetector::new();
        let v = vector(&[PadButton::Left, PadButton::Enter]);

        let first = detector.apply(v);
        let second = detector.apply(v);

        assert_eq!(first.len(), 2);
        assert!(second.is_empty());
    }

    #[test]
    fn test_edges_are_emitted_in_ascending_index_order() {
        let mut detector = EdgeDetector::new();

        // Press several buttons in one frame, scattered across the index range.
        let edges = detector.apply(vector(&[PadButton::Enter, PadButton::Up, PadButton::Right]));

        let indices: Vec<usize> = edges.iter().map(|e| e.button.index()).collect();
        assert_eq!(indices, vec![0, 3, 5]);
    }

    #[test]
    fn test_release_emits_released_edge() {
        let mut detector = EdgeDetector::new();
        detector.apply(vector(&[PadButton::Up]));

        let edges = detector.apply(vector(&[]));

        assert_eq!(
            edges,
            vec![Edge {
                button: PadButton::Up,
                state: ButtonState::Released
            }]
        );
    }

    #[test]
    fn test_states_returns_the_last_applied_vector() {
        let mut detector = EdgeDetector::new();
        assert_eq!(detector.states(), StateVector::all_released());

        let v = vector(&[PadButton::Down]);
        detector.apply(v);

        assert_eq!(detector.states(), v);
    }
}
