//! Wheel, touch and key gestures normalized into deck steps.

use std::time::Duration;

use tracing::trace;

use crate::deck::{DeckController, Direction, StepOutcome};

/// Vertical travel a touch must exceed before it counts as a swipe.
pub const SWIPE_THRESHOLD: f32 = 50.0;

/// What the router did with one event.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Routed {
    /// The event was consumed; the host must not apply its default
    /// behavior (scrolling).
    pub prevent_default: bool,
    /// Set when the event reached the deck's gate.
    pub step: Option<StepOutcome>,
}

impl Routed {
    const NATIVE: Self = Self {
        prevent_default: false,
        step: None,
    };

    pub fn accepted(&self) -> bool {
        self.step.is_some_and(|s| s.is_accepted())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Down,
    Up,
    PageDown,
    PageUp,
    Space,
}

impl NavKey {
    fn direction(self) -> Direction {
        match self {
            Self::Down | Self::PageDown | Self::Space => Direction::Next,
            Self::Up | Self::PageUp => Direction::Prev,
        }
    }
}

/// Touch tracking state. Wheel and touch are independent paths into the
/// same gate.
#[derive(Debug, Clone, Default)]
pub struct InputRouter {
    touch_start_y: f32,
    touch_active: bool,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn touch_active(&self) -> bool {
        self.touch_active
    }

    /// `delta_y` follows the browser convention: positive scrolls down.
    pub fn wheel(&mut self, delta_y: f32, deck: &mut DeckController, now: Duration) -> Routed {
        if deck.modal_open() {
            return Routed::NATIVE;
        }
        let direction = if delta_y > 0.0 {
            Direction::Next
        } else {
            Direction::Prev
        };
        trace!(delta_y, "wheel");
        Routed {
            prevent_default: true,
            step: Some(deck.step(direction, now)),
        }
    }

    pub fn touch_start(&mut self, y: f32, deck: &DeckController) -> Routed {
        if deck.modal_open() {
            return Routed::NATIVE;
        }
        self.touch_start_y = y;
        self.touch_active = true;
        Routed::default()
    }

    /// One swipe fires at most one step: the touch is disarmed as soon as
    /// the threshold is crossed.
    pub fn touch_move(&mut self, y: f32, deck: &mut DeckController, now: Duration) -> Routed {
        if deck.modal_open() {
            return Routed::NATIVE;
        }
        let consumed = Routed {
            prevent_default: true,
            step: None,
        };
        if !self.touch_active || deck.is_animating() || !deck.input_enabled() {
            return consumed;
        }
        let diff = self.touch_start_y - y;
        if diff.abs() <= SWIPE_THRESHOLD {
            return consumed;
        }
        self.touch_active = false;
        let direction = if diff > 0.0 {
            Direction::Next
        } else {
            Direction::Prev
        };
        trace!(diff, "swipe");
        Routed {
            prevent_default: true,
            step: Some(deck.step(direction, now)),
        }
    }

    pub fn touch_end(&mut self) {
        self.touch_active = false;
    }

    pub fn key(&mut self, key: NavKey, deck: &mut DeckController, now: Duration) -> Routed {
        if deck.modal_open() {
            return Routed::NATIVE;
        }
        Routed {
            prevent_default: true,
            step: Some(deck.step(key.direction(), now)),
        }
    }
}
