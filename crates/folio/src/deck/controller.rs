use std::time::Duration;

use tracing::{debug, info};

use super::state::{
    DeckEvent, DeckState, Direction, ExitingSlide, MountedSlide, Phase, RejectReason,
    StepOutcome,
};
use super::timing::DeckTiming;

/// Single-owner state machine for the slide deck.
///
/// Every operation takes `now`, a monotonic offset from an arbitrary origin.
/// Nothing here sleeps or spawns: `tick` fires whichever phase deadlines
/// have passed, oldest first, and reports them as events for the renderer.
#[derive(Debug, Clone)]
pub struct DeckController {
    state: DeckState,
    total: usize,
    timing: DeckTiming,
    phase: Phase,
    mounted: Option<MountedSlide>,
    exiting: Option<ExitingSlide>,
}

impl DeckController {
    /// Build the deck and mount `start_index` without an entry animation.
    pub fn new(total: usize, start_index: usize, timing: DeckTiming, now: Duration) -> Self {
        let total = total.max(1);
        let start_index = start_index.clamp(1, total);
        Self {
            state: DeckState::new(start_index),
            total,
            timing,
            phase: Phase::Idle,
            mounted: Some(MountedSlide {
                index: start_index,
                mounted_at: now,
                entered_from: None,
            }),
            exiting: None,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &DeckState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn timing(&self) -> &DeckTiming {
        &self.timing
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    pub fn is_animating(&self) -> bool {
        self.state.is_animating
    }

    pub fn input_enabled(&self) -> bool {
        self.state.input_enabled
    }

    pub fn modal_open(&self) -> bool {
        self.state.modal_open
    }

    pub fn mounted(&self) -> Option<&MountedSlide> {
        self.mounted.as_ref()
    }

    pub fn exiting(&self) -> Option<&ExitingSlide> {
        self.exiting.as_ref()
    }

    /// Request a slide change. Rejected while animating, while input is
    /// disabled, while a dialog is open, or within the cooldown window.
    pub fn step(&mut self, direction: Direction, now: Duration) -> StepOutcome {
        if let Some(reason) = self.gate(now) {
            debug!(?direction, ?reason, "step rejected");
            return StepOutcome::Rejected(reason);
        }

        let from = self.state.current_index;
        let to = direction.advance(from, self.total);

        self.state.last_input = Some(now);
        self.state.is_animating = true;
        self.state.input_enabled = false;
        self.state.current_index = to;
        self.phase = Phase::Exiting {
            direction,
            accepted_at: now,
        };

        if let Some(old) = self.mounted.take() {
            self.exiting = Some(ExitingSlide {
                index: old.index,
                started_at: now,
                direction,
            });
        }

        info!(from, to, ?direction, "slide change accepted");
        StepOutcome::Accepted {
            from,
            to,
            direction,
        }
    }

    fn gate(&self, now: Duration) -> Option<RejectReason> {
        if self.state.modal_open {
            return Some(RejectReason::ModalOpen);
        }
        if self.state.is_animating {
            return Some(RejectReason::Animating);
        }
        if !self.state.input_enabled {
            return Some(RejectReason::InputDisabled);
        }
        if let Some(last) = self.state.last_input {
            if now.saturating_sub(last) < self.timing.cooldown {
                return Some(RejectReason::Cooldown);
            }
        }
        None
    }

    /// Fire all phase deadlines at or before `now`, in chronological order.
    pub fn tick(&mut self, now: Duration) -> Vec<DeckEvent> {
        let mut events = Vec::new();
        while let Some((deadline, due)) = self.next_deadline() {
            if deadline > now {
                break;
            }
            self.fire(due, deadline, &mut events);
        }
        events
    }

    /// Earliest pending deadline and what happens there.
    fn next_deadline(&self) -> Option<(Duration, Due)> {
        let phase_deadline = match self.phase {
            Phase::Idle => None,
            Phase::Exiting { accepted_at, .. } => {
                Some((accepted_at + self.timing.construct_delay, Due::Construct))
            }
            Phase::Entering { mounted_at, .. } => {
                Some((mounted_at + self.timing.entry, Due::EntryComplete))
            }
            Phase::Cooldown { until } => Some((until, Due::EnableInput)),
        };
        let detach_deadline = self
            .exiting
            .map(|e| (e.started_at + self.timing.exit, Due::Detach));

        match (phase_deadline, detach_deadline) {
            (Some(p), Some(d)) => Some(if d.0 <= p.0 { d } else { p }),
            (p, d) => p.or(d),
        }
    }

    fn fire(&mut self, due: Due, at: Duration, events: &mut Vec<DeckEvent>) {
        match due {
            Due::Construct => {
                let Phase::Exiting { direction, .. } = self.phase else {
                    return;
                };
                let index = self.state.current_index;
                self.mounted = Some(MountedSlide {
                    index,
                    mounted_at: at,
                    entered_from: Some(direction),
                });
                self.phase = Phase::Entering {
                    direction,
                    mounted_at: at,
                };
                debug!(index, "slide constructed");
                events.push(DeckEvent::Mounted {
                    index,
                    entered_from: Some(direction),
                });
            }
            Due::Detach => {
                if let Some(old) = self.exiting.take() {
                    debug!(index = old.index, "slide detached");
                    events.push(DeckEvent::Detached { index: old.index });
                }
            }
            Due::EntryComplete => {
                self.state.is_animating = false;
                self.phase = Phase::Cooldown {
                    until: at + self.timing.grace,
                };
                events.push(DeckEvent::EntryComplete {
                    index: self.state.current_index,
                });
            }
            Due::EnableInput => {
                self.phase = Phase::Idle;
                self.state.input_enabled = true;
                // Cooldown is measured from the moment input is usable again.
                self.state.last_input = Some(at);
                debug!("input enabled");
                events.push(DeckEvent::InputEnabled);
            }
        }
    }

    /// Suspend deck input for a dialog. Refused while a slide change is in
    /// flight or a dialog is already open.
    pub fn open_modal(&mut self) -> Option<DeckEvent> {
        if self.state.modal_open || self.state.is_animating {
            debug!(
                modal_open = self.state.modal_open,
                animating = self.state.is_animating,
                "dialog open refused"
            );
            return None;
        }
        self.state.modal_open = true;
        self.state.input_enabled = false;
        info!("dialog opened, deck input suspended");
        Some(DeckEvent::ModalOpened)
    }

    /// Called once the dialog's exit animation has finished. Input returns
    /// after the usual grace period.
    pub fn modal_closed(&mut self, now: Duration) -> Option<DeckEvent> {
        if !self.state.modal_open {
            return None;
        }
        self.state.modal_open = false;
        self.state.last_input = Some(now);
        let until = now + self.timing.grace;
        self.phase = match self.phase {
            Phase::Cooldown { until: pending } => Phase::Cooldown {
                until: pending.max(until),
            },
            _ => Phase::Cooldown { until },
        };
        info!("dialog closed");
        Some(DeckEvent::ModalClosed)
    }

    /// Remount `index` immediately, e.g. after the deck source was reloaded.
    /// Any transition in flight is dropped.
    pub fn restore(&mut self, total: usize, index: usize, now: Duration) -> Vec<DeckEvent> {
        let mut events = Vec::new();
        self.total = total.max(1);
        let index = index.clamp(1, self.total);

        if let Some(old) = self.exiting.take() {
            events.push(DeckEvent::Detached { index: old.index });
        }
        self.state.current_index = index;
        self.state.is_animating = false;
        self.state.input_enabled = !self.state.modal_open;
        self.state.last_input = Some(now);
        self.phase = Phase::Idle;
        self.mounted = Some(MountedSlide {
            index,
            mounted_at: now,
            entered_from: None,
        });
        info!(index, total = self.total, "deck restored");
        events.push(DeckEvent::Mounted {
            index,
            entered_from: None,
        });
        events
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Due {
    Construct,
    Detach,
    EntryComplete,
    EnableInput,
}
