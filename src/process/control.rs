//! Seam between the channel state machine and the OS process table.

use crate::command::Mode;
use crate::process::{launch, terminate};
use crate::process::{LaunchError, ProcessHandle, ProcessSpec, TerminationOutcome};

/// Process launch and termination as seen by a channel supervisor.
///
/// The production implementation touches the OS; tests substitute a
/// recorder to observe the supervisor's call sequence.
pub trait ProcessControl {
    /// Start the process described by `spec` and return its handle.
    ///
    /// # Errors
    ///
    /// Returns `LaunchError` if process creation fails; callers treat
    /// this as fatal to the whole supervisor.
    fn launch(&mut self, spec: &ProcessSpec) -> Result<ProcessHandle, LaunchError>;

    /// Ask the process recorded for `mode` to stop. Fire-and-forget.
    fn terminate(&mut self, handle: ProcessHandle, mode: Mode) -> TerminationOutcome;
}

/// `ProcessControl` backed by real OS processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsProcessControl;

impl ProcessControl for OsProcessControl {
    fn launch(&mut self, spec: &ProcessSpec) -> Result<ProcessHandle, LaunchError> {
        launch(spec)
    }

    fn terminate(&mut self, handle: ProcessHandle, mode: Mode) -> TerminationOutcome {
        terminate(handle, mode)
    }
}
