//! Housie server binary: in-memory store, WebSocket on `HOUSIE_ADDR`.

use housie::{HousieError, HousieServer};
use housie_store::MemoryStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), HousieError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr = std::env::var("HOUSIE_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    let server = HousieServer::<MemoryStore>::builder()
        .bind(&addr)
        .build(MemoryStore::new())
        .await?;

    tracing::info!(%addr, "housie listening");
    server.run().await
}
