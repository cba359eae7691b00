//! MQTT transport: subscription, poll loop, and reconnect backoff.
//!
//! Transport failures never touch supervisor state; a connection error
//! just delays the next poll by a fixed interval, after which the
//! client reconnects and resubscribes.

use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use tokio_util::sync::CancellationToken;

use crate::config::BrokerConfig;
use crate::process::{LaunchError, ProcessControl};
use crate::router::CommandRouter;

/// One subscription covers every channel's control topic.
pub const CONTROL_SUBSCRIPTION: &str = "/camera/controls/+/+";

/// Error type for the transport run loop.
#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    /// The client request channel is gone; the transport cannot recover.
    #[error("MQTT client error: {0}")]
    Client(#[from] rumqttc::ClientError),
    /// A routed command failed to spawn its process. Fatal.
    #[error("launch failed: {0}")]
    Launch(#[from] LaunchError),
}

/// MQTT client plus the event loop driving it.
pub struct MqttTransport {
    client: AsyncClient,
    event_loop: EventLoop,
    reconnect_delay: Duration,
}

impl MqttTransport {
    /// Build a client for the configured broker. No I/O happens until
    /// the run loop polls.
    #[must_use]
    pub fn new(config: &BrokerConfig) -> Self {
        let client_id = format!("camsup_{}", std::process::id());
        let mut options = MqttOptions::new(client_id, &config.host, config.port);
        options.set_keep_alive(Duration::from_secs(config.keepalive_secs));

        let (client, event_loop) = AsyncClient::new(options, 16);
        Self {
            client,
            event_loop,
            reconnect_delay: Duration::from_secs(config.reconnect_delay_secs),
        }
    }

    /// Poll the broker and feed incoming messages to the router until
    /// `shutdown` fires.
    ///
    /// On shutdown any running camera processes are deliberately left
    /// behind; they outlive the supervisor.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the client breaks or a routed
    /// command cannot spawn its process.
    pub async fn run<C: ProcessControl>(
        self,
        router: &mut CommandRouter<C>,
        shutdown: CancellationToken,
    ) -> Result<(), TransportError> {
        let Self {
            client,
            mut event_loop,
            reconnect_delay,
        } = self;

        loop {
            tokio::select! {
                () = shutdown.cancelled() => {
                    tracing::info!("shutdown requested; leaving running camera processes behind");
                    return Ok(());
                }
                event = event_loop.poll() => match event {
                    Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                        tracing::info!(code = ?ack.code, "connected to broker");
                        // Clean session: resubscribe on every (re)connect.
                        client
                            .subscribe(CONTROL_SUBSCRIPTION, QoS::AtMostOnce)
                            .await?;
                    }
                    Ok(Event::Incoming(Packet::Publish(publish))) => {
                        router.route(&publish.topic, &publish.payload)?;
                    }
                    Ok(_) => {}
                    Err(err) => {
                        tracing::warn!(
                            error = %err,
                            delay_secs = reconnect_delay.as_secs(),
                            "connection error; retrying"
                        );
                        tokio::time::sleep(reconnect_delay).await;
                    }
                }
            }
        }
    }
}
