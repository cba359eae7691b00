//! External process termination.
//!
//! Two strategies exist, selected by the mode being stopped. Vision runs
//! as a directly tracked child and gets a SIGTERM to its recorded pid.
//! The viewing daemon may detach or be multiply instantiated, so the only
//! reliable way to free the camera device is to kill every process with
//! its executable name. Neither strategy waits for the target to die.

use tokio::process::Command;

use crate::command::Mode;
use crate::process::ProcessHandle;

/// Executable name of the streaming daemon, as seen by pkill.
pub const VIEWING_DAEMON: &str = "uv4l";

const PKILL: &str = "/usr/bin/pkill";

/// How a stop request is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminateStrategy {
    /// SIGTERM directly to the recorded pid.
    Signal,
    /// Kill any process matching the daemon's executable name.
    ByName,
}

impl TerminateStrategy {
    /// Select the strategy for stopping a process launched for `mode`.
    #[must_use]
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Viewing => Self::ByName,
            _ => Self::Signal,
        }
    }
}

/// Result of a stop request. Termination is never confirmed; `Requested`
/// only means the signal or killer process was dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationOutcome {
    /// The stop request was dispatched.
    Requested,
    /// The stop request could not be delivered. Non-fatal; the caller
    /// proceeds as if the process is gone.
    Failed,
}

/// Ask the process recorded for `mode` to stop.
pub fn terminate(handle: ProcessHandle, mode: Mode) -> TerminationOutcome {
    match TerminateStrategy::for_mode(mode) {
        TerminateStrategy::Signal => signal_terminate(handle),
        TerminateStrategy::ByName => kill_by_name(VIEWING_DAEMON, handle),
    }
}

#[cfg(unix)]
fn signal_terminate(handle: ProcessHandle) -> TerminationOutcome {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    let pid = Pid::from_raw(i32::try_from(handle.pid()).unwrap_or(i32::MAX));
    match kill(pid, Signal::SIGTERM) {
        Ok(()) => {
            tracing::debug!(pid = handle.pid(), "sent SIGTERM");
            TerminationOutcome::Requested
        }
        Err(err) => {
            tracing::warn!(pid = handle.pid(), error = %err, "failed to signal process");
            TerminationOutcome::Failed
        }
    }
}

#[cfg(not(unix))]
fn signal_terminate(handle: ProcessHandle) -> TerminationOutcome {
    tracing::warn!(
        pid = handle.pid(),
        "signal termination not supported on this platform"
    );
    TerminationOutcome::Failed
}

/// Spawn a one-shot killer that stops every process matching `name`.
fn kill_by_name(name: &str, handle: ProcessHandle) -> TerminationOutcome {
    match Command::new(PKILL).arg(name).spawn() {
        Ok(killer) => {
            tracing::debug!(
                name,
                tracked_pid = handle.pid(),
                killer_pid = ?killer.id(),
                "dispatched pkill"
            );
            TerminationOutcome::Requested
        }
        Err(err) => {
            tracing::warn!(name, error = %err, "failed to spawn pkill");
            TerminationOutcome::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewing_is_stopped_by_name() {
        assert_eq!(
            TerminateStrategy::for_mode(Mode::Viewing),
            TerminateStrategy::ByName
        );
    }

    #[test]
    fn test_vision_is_stopped_by_signal() {
        assert_eq!(
            TerminateStrategy::for_mode(Mode::VisionActive),
            TerminateStrategy::Signal
        );
    }
}
