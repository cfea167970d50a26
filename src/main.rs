//! Relay server binary.

use clap::Parser;

use relay_proxy::config::{loader, RelayConfig};
use relay_proxy::fetch::HttpFetcher;
use relay_proxy::lifecycle::Shutdown;
use relay_proxy::net::Listener;
use relay_proxy::observability::logging;
use relay_proxy::server::RelayServer;

#[derive(Parser)]
#[command(name = "relay-proxy")]
#[command(about = "Forward proxy relaying fetched URLs over a framed TCP protocol", long_about = None)]
struct Cli {
    /// Listen port; overrides the configured bind address port.
    port: Option<u16>,

    /// Bind address, e.g. 0.0.0.0:8888.
    #[arg(short, long)]
    bind: Option<String>,

    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init("relay_proxy=info");

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => loader::load_config(path)?,
        None => RelayConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(port) = cli.port {
        let host = config
            .listener
            .bind_address
            .rsplit_once(':')
            .map(|(host, _)| host.to_string())
            .unwrap_or_else(|| "0.0.0.0".to_string());
        config.listener.bind_address = format!("{host}:{port}");
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        client_io_secs = config.timeouts.client_io_secs,
        fetch_secs = config.timeouts.fetch_secs,
        "Configuration loaded"
    );

    let listener = Listener::bind(&config.listener)?;
    let fetcher = HttpFetcher::new()?;
    let server = RelayServer::new(config, fetcher);

    let shutdown = Shutdown::new();
    let signal = shutdown.subscribe();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            shutdown.trigger();
        }
    });

    server.run(listener, signal).await;

    tracing::info!("Shutdown complete");
    Ok(())
}
