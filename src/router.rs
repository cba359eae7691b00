//! Routing of incoming (topic, payload) pairs to channel supervisors.

use crate::channel::ChannelSupervisor;
use crate::process::{LaunchError, ProcessControl};

/// Subscription filter for one channel's control topic.
fn channel_filter(channel: &str) -> String {
    format!("/camera/controls/{channel}/+")
}

struct Route<C> {
    filter: String,
    supervisor: ChannelSupervisor<C>,
}

/// Dispatches command payloads to every channel whose filter matches
/// the message topic. Channels match independently; a message may drive
/// more than one supervisor if several are registered.
pub struct CommandRouter<C> {
    routes: Vec<Route<C>>,
}

impl<C> Default for CommandRouter<C> {
    fn default() -> Self {
        Self { routes: Vec::new() }
    }
}

impl<C: ProcessControl> CommandRouter<C> {
    /// Create an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a channel supervisor under its control-topic filter.
    pub fn add_channel(&mut self, supervisor: ChannelSupervisor<C>) {
        let filter = channel_filter(supervisor.name());
        tracing::debug!(channel = supervisor.name(), filter, "registered channel");
        self.routes.push(Route { filter, supervisor });
    }

    /// Forward a message to every matching channel.
    ///
    /// Non-UTF-8 payloads are dropped; so are messages matching no
    /// registered channel. Neither is an error.
    ///
    /// # Errors
    ///
    /// Returns `LaunchError` if a transition fails to spawn its
    /// process. Fatal to the supervisor.
    pub fn route(&mut self, topic: &str, payload: &[u8]) -> Result<(), LaunchError> {
        let Ok(command) = std::str::from_utf8(payload) else {
            tracing::debug!(topic, "dropping non-UTF-8 payload");
            return Ok(());
        };
        tracing::debug!(topic, command, "received message");

        for route in &mut self.routes {
            if topic_matches(&route.filter, topic) {
                tracing::info!(
                    channel = route.supervisor.name(),
                    command,
                    "command for channel"
                );
                route.supervisor.transition(command)?;
            }
        }
        Ok(())
    }

    /// Registered supervisors, in registration order.
    pub fn channels(&self) -> impl Iterator<Item = &ChannelSupervisor<C>> {
        self.routes.iter().map(|route| &route.supervisor)
    }
}

/// MQTT topic filter matching: `+` matches one level, `#` matches the
/// rest of the topic (including zero levels) and only as the last
/// filter segment.
#[must_use]
pub fn topic_matches(filter: &str, topic: &str) -> bool {
    let mut filter_parts = filter.split('/');
    let mut topic_parts = topic.split('/');
    loop {
        match (filter_parts.next(), topic_parts.next()) {
            (Some("#"), _) => return true,
            (Some("+"), Some(_)) => {}
            (Some(f), Some(t)) if f == t => {}
            (None, None) => return true,
            _ => return false,
        }
    }
}
