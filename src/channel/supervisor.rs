//! The per-channel transition algorithm.

use crate::channel::ChannelState;
use crate::command::Mode;
use crate::process::{LaunchError, ProcessControl, ProcessHandle, ProcessSpec, TerminationOutcome};

/// Owns one channel's state and sequences terminate/launch calls.
///
/// All transitions run on the single control thread, in arrival order,
/// so no locking is needed. The model is optimistic: a stop request is
/// assumed to have worked, and processes started outside this run are
/// invisible to it.
#[derive(Debug)]
pub struct ChannelSupervisor<C> {
    name: String,
    state: ChannelState,
    control: C,
}

impl<C: ProcessControl> ChannelSupervisor<C> {
    /// Create a supervisor for the named channel, starting `Off`.
    #[must_use]
    pub fn new(name: impl Into<String>, control: C) -> Self {
        Self {
            name: name.into(),
            state: ChannelState::new(),
            control,
        }
    }

    /// The channel name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The channel's current mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.state.mode()
    }

    /// The tracked process, if any.
    #[must_use]
    pub fn handle(&self) -> Option<ProcessHandle> {
        self.state.handle()
    }

    /// Apply one incoming command.
    ///
    /// Unrecognized commands are dropped silently. A command matching
    /// the current mode is a logged no-op. Otherwise any running
    /// process is asked to stop first, then the requested mode's
    /// process is started.
    ///
    /// # Errors
    ///
    /// Returns `LaunchError` if a required process cannot be spawned.
    /// That error is fatal: callers shut the whole supervisor down.
    pub fn transition(&mut self, command: &str) -> Result<(), LaunchError> {
        let requested = Mode::parse(command);
        if requested == Mode::Invalid {
            tracing::debug!(channel = %self.name, command, "ignoring unrecognized command");
            return Ok(());
        }

        if requested == self.state.mode() {
            tracing::info!(channel = %self.name, mode = %requested, "already in requested mode");
            return Ok(());
        }

        if self.state.mode().is_active() {
            self.stop_current();
        }

        let Some(spec) = ProcessSpec::for_mode(requested) else {
            // Requested mode is Off; the stop above completed the transition.
            return Ok(());
        };

        let handle = self.control.launch(spec)?;
        self.state.set_active(requested, handle);
        tracing::info!(
            channel = %self.name,
            mode = %requested,
            pid = handle.pid(),
            "started new process"
        );
        Ok(())
    }

    /// Stop whatever is running and mark the channel off.
    ///
    /// The state is cleared whether or not the stop request landed;
    /// termination is never confirmed.
    fn stop_current(&mut self) {
        let stopping = self.state.mode();
        if let Some(handle) = self.state.handle() {
            tracing::info!(
                channel = %self.name,
                mode = %stopping,
                pid = handle.pid(),
                "stopping active process"
            );
            if self.control.terminate(handle, stopping) == TerminationOutcome::Failed {
                tracing::warn!(
                    channel = %self.name,
                    pid = handle.pid(),
                    "stop request failed; assuming process is gone"
                );
            }
        }
        self.state.clear();
    }
}
