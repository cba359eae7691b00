//! Camsup - remote-controlled camera process supervisor.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use camsup::channel::ChannelSupervisor;
use camsup::config::{CamsupConfig, ConfigError, ConfigLoader};
use camsup::process::OsProcessControl;
use camsup::router::CommandRouter;
use camsup::transport::{MqttTransport, TransportError};

#[derive(Parser)]
#[command(
    name = "camsup",
    about = "Remote-controlled camera process supervisor",
    version
)]
struct Cli {
    /// Channel (camera) this instance manages.
    channel: String,

    /// Path to a config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(thiserror::Error, Debug)]
enum CamsupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("unknown channel {name:?}; configured channels: {known}")]
    UnknownChannel { name: String, known: String },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

fn load_config(cli: &Cli) -> Result<CamsupConfig, ConfigError> {
    let loader = match &cli.config {
        Some(path) => ConfigLoader::with_path(path.clone()),
        None => ConfigLoader::new(),
    };
    loader.load()
}

/// Resolve when SIGINT or SIGTERM arrives.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate()).ok();
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            () = async {
                match sigterm.as_mut() {
                    Some(sig) => {
                        sig.recv().await;
                    }
                    None => std::future::pending().await,
                }
            } => {}
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

async fn run(cli: Cli) -> Result<(), CamsupError> {
    let config = load_config(&cli)?;

    if !config.channels.iter().any(|name| *name == cli.channel) {
        return Err(CamsupError::UnknownChannel {
            name: cli.channel,
            known: config.channels.join(", "),
        });
    }

    tracing::info!(
        channel = %cli.channel,
        broker = %config.broker.host,
        port = config.broker.port,
        "starting camera supervisor"
    );

    let mut router = CommandRouter::new();
    router.add_channel(ChannelSupervisor::new(cli.channel.clone(), OsProcessControl));

    let shutdown = CancellationToken::new();
    let token = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        token.cancel();
    });

    let transport = MqttTransport::new(&config.broker);
    transport.run(&mut router, shutdown).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "supervisor exiting");
            eprintln!("camsup: {err}");
            ExitCode::FAILURE
        }
    }
}
