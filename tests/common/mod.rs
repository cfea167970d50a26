//! Shared utilities for relay integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use relay_proxy::config::RelayConfig;
use relay_proxy::fetch::{Fetch, FetchError, FetchResponse};
use relay_proxy::lifecycle::Shutdown;
use relay_proxy::net::Listener;
use relay_proxy::server::RelayServer;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Fetcher returning a canned outcome, so tests control the collaborator.
#[derive(Clone)]
pub struct MockFetch {
    result: Result<FetchResponse, FetchError>,
}

impl MockFetch {
    pub fn ok(body: &[u8], content_type: &str) -> Self {
        Self {
            result: Ok(FetchResponse {
                body: body.to_vec(),
                content_type: content_type.to_string(),
            }),
        }
    }

    pub fn failing(error: FetchError) -> Self {
        Self { result: Err(error) }
    }
}

impl Fetch for MockFetch {
    async fn fetch(&self, _url: &str, _timeout: Duration) -> Result<FetchResponse, FetchError> {
        self.result.clone()
    }
}

/// Spawn a relay server on an ephemeral port with default config.
pub async fn start_relay<F: Fetch>(fetcher: F) -> (SocketAddr, Shutdown) {
    start_relay_with_config(fetcher, RelayConfig::default()).await
}

/// Spawn a relay server on an ephemeral port with the given config.
#[allow(dead_code)]
pub async fn start_relay_with_config<F: Fetch>(
    fetcher: F,
    mut config: RelayConfig,
) -> (SocketAddr, Shutdown) {
    config.listener.bind_address = "127.0.0.1:0".to_string();
    let listener = Listener::bind(&config.listener).expect("bind relay listener");
    let addr = listener.local_addr().expect("relay listener address");

    let shutdown = Shutdown::new();
    let signal = shutdown.subscribe();
    let server = RelayServer::new(config, fetcher);
    tokio::spawn(async move {
        server.run(listener, signal).await;
    });

    (addr, shutdown)
}

/// Send one raw request and read everything the relay sends back.
pub async fn raw_exchange(addr: SocketAddr, request: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request).await.unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    response
}

/// Start a mock HTTP origin returning a fixed body and content type.
#[allow(dead_code)]
pub async fn start_mock_origin(body: &'static str, content_type: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        // Drain the request before answering so the close
                        // below is a clean FIN rather than a reset.
                        let mut request = [0u8; 1024];
                        let _ = socket.read(&mut request).await;
                        let response = format!(
                            "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            content_type,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}
