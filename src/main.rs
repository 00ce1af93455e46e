//! Mutopia media gateway daemon.
//!
//! Startup order: CLI → logging → config (file, env override, validation)
//! → metrics → listener bind → signal waiter → serve until shutdown.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use media_gateway::config::{self, GatewayConfig};
use media_gateway::http::GatewayServer;
use media_gateway::lifecycle::{self, Shutdown};
use media_gateway::observability::{logging, metrics};

#[derive(Parser, Debug)]
#[command(name = "media-gateway", about = "CORS-friendly media proxy for the Mutopia API")]
struct Args {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config: GatewayConfig = match &args.config {
        Some(path) => config::load_config(path)?,
        None => config::default_config()?,
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability.log_level);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        request_timeout_secs = config.timeouts.request_secs,
        "configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        lifecycle::wait_for_signal().await;
        shutdown.trigger();
    });

    let server = GatewayServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
