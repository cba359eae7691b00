//! Camsup - remote-controlled camera process supervisor.
//!
//! Listens for mode commands over MQTT and keeps at most one external
//! process (streaming daemon or computer-vision pipeline) running per
//! camera channel.

pub mod channel;
pub mod command;
pub mod config;
pub mod process;
pub mod router;
pub mod transport;
