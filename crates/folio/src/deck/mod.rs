//! The slide deck state machine: gating, phases and the mounted-slide handle.

mod controller;
mod state;
mod timing;

pub use controller::DeckController;
pub use state::{DeckEvent, Direction, Phase, StepOutcome};
#[cfg(test)]
pub use state::RejectReason;
pub use timing::DeckTiming;
