//! # Housie
//!
//! A live multi-player bingo server. Players join a room, receive
//! randomly generated cards, watch numbers be drawn (on a timer or on
//! demand), and submit win claims that are verified against the
//! authoritative call history and the room's declared pattern.
//!
//! This crate is the facade that wires the layers together: the
//! WebSocket transport, the JSON command surface, the room actors, the
//! broadcast hub, and the persistence boundary.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use housie::HousieServer;
//! use housie_store::MemoryStore;
//!
//! # async fn run() -> Result<(), housie::HousieError> {
//! let server = HousieServer::<MemoryStore>::builder()
//!     .bind("0.0.0.0:8080")
//!     .build(MemoryStore::new())
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;
mod wire;

pub use error::HousieError;
pub use server::{HousieServer, HousieServerBuilder};
pub use wire::{ClientCommand, ServerReply};
