use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Next,
    Prev,
}

impl Direction {
    /// +1 for `Next`, -1 for `Prev`. Motion curves mirror on this sign.
    pub fn sign(self) -> f32 {
        match self {
            Self::Next => 1.0,
            Self::Prev => -1.0,
        }
    }

    /// Circular step over a 1-based index range `[1, total]`.
    pub fn advance(self, index: usize, total: usize) -> usize {
        if total == 0 {
            return 1;
        }
        match self {
            Self::Next => {
                if index >= total {
                    1
                } else {
                    index + 1
                }
            }
            Self::Prev => {
                if index <= 1 {
                    total
                } else {
                    index - 1
                }
            }
        }
    }
}

/// The deck's mutable flags. One instance, owned by the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct DeckState {
    /// 1-based index of the slide currently (or about to be) mounted.
    pub current_index: usize,
    pub is_animating: bool,
    pub input_enabled: bool,
    /// Monotonic time of the last accepted input.
    pub last_input: Option<Duration>,
    pub modal_open: bool,
}

impl DeckState {
    pub fn new(start_index: usize) -> Self {
        Self {
            current_index: start_index,
            is_animating: false,
            input_enabled: true,
            last_input: None,
            modal_open: false,
        }
    }
}

/// Named phases of a slide change. `Constructing` is the instant between
/// `Exiting` and `Entering` when the incoming slide is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Idle,
    /// Outgoing slide is leaving; nothing is mounted yet.
    Exiting {
        direction: Direction,
        accepted_at: Duration,
    },
    /// Incoming slide is mounted and animating in.
    Entering {
        direction: Direction,
        mounted_at: Duration,
    },
    /// Animation finished; input comes back at `until`.
    Cooldown { until: Duration },
}

impl Phase {
    #[cfg(test)]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Exiting { .. } => "exiting",
            Self::Entering { .. } => "entering",
            Self::Cooldown { .. } => "cooldown",
        }
    }
}

/// Handle for the slide currently attached to the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MountedSlide {
    pub index: usize,
    pub mounted_at: Duration,
    /// `None` for a slide mounted without an entry animation.
    pub entered_from: Option<Direction>,
}

/// Handle for the outgoing slide while its exit animation runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitingSlide {
    pub index: usize,
    pub started_at: Duration,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    Animating,
    InputDisabled,
    ModalOpen,
    Cooldown,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    Accepted {
        from: usize,
        to: usize,
        direction: Direction,
    },
    Rejected(RejectReason),
}

impl StepOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeckEvent {
    /// A slide was built and attached.
    Mounted {
        index: usize,
        entered_from: Option<Direction>,
    },
    /// The outgoing slide finished exiting and was dropped.
    Detached { index: usize },
    EntryComplete { index: usize },
    InputEnabled,
    ModalOpened,
    ModalClosed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_wraps() {
        assert_eq!(Direction::Next.advance(5, 5), 1);
        assert_eq!(Direction::Prev.advance(1, 5), 5);
        assert_eq!(Direction::Next.advance(2, 5), 3);
        assert_eq!(Direction::Prev.advance(3, 5), 2);
        assert_eq!(Direction::Next.advance(1, 1), 1);
        assert_eq!(Direction::Prev.advance(1, 1), 1);
    }

    #[test]
    fn test_full_cycle_returns_to_start() {
        for total in 1..=9 {
            for start in 1..=total {
                for dir in [Direction::Next, Direction::Prev] {
                    let mut idx = start;
                    let mut seen = Vec::new();
                    for _ in 0..total {
                        idx = dir.advance(idx, total);
                        assert!((1..=total).contains(&idx));
                        seen.push(idx);
                    }
                    assert_eq!(idx, start, "total={total} start={start} dir={dir:?}");
                    seen.sort_unstable();
                    seen.dedup();
                    assert_eq!(seen.len(), total);
                }
            }
        }
    }
}
