//! Per-channel state and the transition state machine.

mod state;
mod supervisor;

pub use state::*;
pub use supervisor::*;
