use std::time::Duration;

/// Durations that drive the deck's phases. All values are explicit so tests
/// can shrink or stretch them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeckTiming {
    /// Exit animation of the outgoing slide.
    pub exit: Duration,
    /// Delay from acceptance until the incoming slide is built. Overlaps `exit`.
    pub construct_delay: Duration,
    /// Entry animation of the incoming slide.
    pub entry: Duration,
    /// Wait after an animation (or dialog close) before input is re-enabled.
    pub grace: Duration,
    /// Minimum time between accepted inputs.
    pub cooldown: Duration,
    /// Dialog sheet entrance.
    pub modal_open: Duration,
    /// Dialog sheet exit.
    pub modal_close: Duration,
    /// Delay before the close button takes focus once a dialog is shown.
    pub focus_delay: Duration,
}

impl Default for DeckTiming {
    fn default() -> Self {
        Self {
            exit: Duration::from_millis(2000),
            construct_delay: Duration::from_millis(750),
            entry: Duration::from_millis(1500),
            grace: Duration::from_millis(100),
            cooldown: Duration::from_millis(1000),
            modal_open: Duration::from_millis(350),
            modal_close: Duration::from_millis(200),
            focus_delay: Duration::from_millis(10),
        }
    }
}
