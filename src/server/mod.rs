//! Relay server subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → net::Listener (accept)
//!     → one spawned task per connection (handler.rs)
//!         → read URL line → fetch → frame → write → close
//!     → accept loop keeps going, unaffected by any handler's fate
//! ```
//!
//! # Design Decisions
//! - Handlers share no mutable state, so there is no locking anywhere
//! - Every handler owns its stream; the socket closes on every exit path
//! - Shutdown stops accepting and drains handlers without cancelling them

pub mod handler;

use std::sync::Arc;

use tokio::task::JoinSet;

use crate::config::RelayConfig;
use crate::fetch::Fetch;
use crate::lifecycle::ShutdownSignal;
use crate::net::Listener;

/// The relay server: an accept loop over independent connection handlers.
pub struct RelayServer<F> {
    config: RelayConfig,
    fetcher: Arc<F>,
}

impl<F: Fetch> RelayServer<F> {
    pub fn new(config: RelayConfig, fetcher: F) -> Self {
        Self {
            config,
            fetcher: Arc::new(fetcher),
        }
    }

    /// Accept connections until shutdown, then drain in-flight handlers.
    pub async fn run(self, listener: Listener, mut shutdown: ShutdownSignal) {
        let mut handlers = JoinSet::new();

        loop {
            tokio::select! {
                _ = shutdown.triggered() => break,
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer_addr)) => {
                        let fetcher = Arc::clone(&self.fetcher);
                        let config = self.config.clone();
                        handlers.spawn(handler::handle_connection(
                            stream, peer_addr, fetcher, config,
                        ));
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Accept failed");
                    }
                },
                // Reap finished handlers so the set does not grow unbounded.
                Some(_) = handlers.join_next(), if !handlers.is_empty() => {}
            }
        }

        tracing::info!(in_flight = handlers.len(), "Listener stopped; draining handlers");
        while handlers.join_next().await.is_some() {}
    }
}
