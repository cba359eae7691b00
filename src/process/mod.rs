//! Launching and terminating the external camera processes.

mod control;
mod launcher;
mod terminator;

pub use control::*;
pub use launcher::*;
pub use terminator::*;
