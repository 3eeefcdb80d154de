//! `HousieServer` builder and accept loop.

use std::sync::Arc;

use tokio::sync::Mutex;

use housie_hub::BroadcastHub;
use housie_protocol::JsonCodec;
use housie_room::RoomManager;
use housie_store::Store;
use housie_transport::{Listener, WebSocketListener};

use crate::HousieError;
use crate::handler::handle_connection;

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState<S: Store> {
    pub(crate) rooms: Mutex<RoomManager<S>>,
    pub(crate) hub: Arc<BroadcastHub>,
    pub(crate) codec: JsonCodec,
}

/// Builder for configuring and starting a Housie server.
pub struct HousieServerBuilder {
    bind_addr: String,
}

impl HousieServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Binds the listener and assembles the server around `store`.
    pub async fn build<S: Store>(self, store: S) -> Result<HousieServer<S>, HousieError> {
        let listener = WebSocketListener::bind(&self.bind_addr).await?;

        let hub = Arc::new(BroadcastHub::new());
        let state = Arc::new(ServerState {
            rooms: Mutex::new(RoomManager::new(Arc::clone(&hub), store)),
            hub,
            codec: JsonCodec,
        });

        Ok(HousieServer { listener, state })
    }
}

impl Default for HousieServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Housie server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct HousieServer<S: Store> {
    listener: WebSocketListener,
    state: Arc<ServerState<S>>,
}

impl<S: Store> HousieServer<S> {
    /// Creates a new builder.
    pub fn builder() -> HousieServerBuilder {
        HousieServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop: each connection gets its own handler task.
    /// Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), HousieError> {
        tracing::info!("housie server running");

        loop {
            match self.listener.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
