//! Room lifecycle management for Housie.
//!
//! Each room runs as an isolated Tokio task (actor model) that owns the
//! room's draw pool, call history, cards, and winners. Every mutating
//! operation (join, start, draw, claim, mark) arrives as a command on
//! the actor's channel, so all mutations on one room are serialized by
//! construction: two concurrent draws can never pop the same pool head,
//! and a claim always sees a consistent call history. Rooms are fully
//! independent and mutate in parallel.
//!
//! # Key types
//!
//! - [`RoomManager`] — creates/destroys rooms, hands out handles
//! - [`RoomHandle`] — send operations to a running room actor
//! - [`RoomOptions`] — per-room settings (variant, pattern, auto-draw)
//! - [`DrawOutcome`] — a drawn number, or the pool running dry
//! - [`RoomError`] — rejected operations (preconditions, routing)

mod error;
mod manager;
mod options;
mod room;

pub use error::RoomError;
pub use manager::RoomManager;
pub use options::RoomOptions;
pub use room::{DrawOutcome, RoomHandle, RoomSnapshot};
