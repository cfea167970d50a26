//! Relay client binary: fetch one URL through the relay, save the body.

use clap::Parser;

use relay_proxy::client::{filename, RelayClient};
use relay_proxy::observability::logging;

#[derive(Parser)]
#[command(name = "relay-client")]
#[command(about = "Fetch a URL through the relay proxy and save the response", long_about = None)]
struct Cli {
    /// Relay host to connect to.
    proxy_host: String,

    /// Relay port.
    proxy_port: u16,

    /// URL to fetch through the relay.
    url: String,
}

#[tokio::main]
async fn main() {
    logging::init("relay_client=warn");

    let cli = Cli::parse();
    let client = RelayClient::new(&cli.proxy_host, cli.proxy_port);

    let response = match client.fetch(&cli.url).await {
        Ok(response) => response,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };

    let path = filename::derive(&cli.url, &response.content_type);
    if let Err(e) = std::fs::write(&path, &response.body) {
        eprintln!("Error: failed to write {path}: {e}");
        std::process::exit(2);
    }

    println!(
        "Saved {} bytes to {} (Content-Type: {})",
        response.body.len(),
        path,
        response.content_type
    );
}
