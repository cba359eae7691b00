//! Channel state record.

use crate::command::Mode;
use crate::process::ProcessHandle;

/// What one channel believes is running.
///
/// Owned exclusively by the channel's supervisor; invariant: the handle
/// is present if and only if the mode is active. State is in-memory
/// only - a fresh run always starts with nothing active, even if a
/// previous run's processes are still alive in the OS.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelState {
    mode: Mode,
    handle: Option<ProcessHandle>,
}

impl ChannelState {
    /// New state: `Off`, no handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mode. Never `Invalid`.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The tracked process, if the channel is active.
    #[must_use]
    pub fn handle(&self) -> Option<ProcessHandle> {
        self.handle
    }

    /// Record a newly launched process.
    pub(crate) fn set_active(&mut self, mode: Mode, handle: ProcessHandle) {
        debug_assert!(mode.is_active());
        self.mode = mode;
        self.handle = Some(handle);
    }

    /// Record that the channel is off and nothing is tracked.
    pub(crate) fn clear(&mut self) {
        self.mode = Mode::Off;
        self.handle = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_off_with_no_handle() {
        let state = ChannelState::new();
        assert_eq!(state.mode(), Mode::Off);
        assert!(state.handle().is_none());
    }

    #[test]
    fn test_set_active_then_clear() {
        let mut state = ChannelState::new();
        state.set_active(Mode::Viewing, ProcessHandle::new(7));
        assert_eq!(state.mode(), Mode::Viewing);
        assert_eq!(state.handle(), Some(ProcessHandle::new(7)));

        state.clear();
        assert_eq!(state.mode(), Mode::Off);
        assert!(state.handle().is_none());
    }
}
