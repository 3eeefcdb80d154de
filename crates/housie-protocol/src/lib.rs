//! Wire-level vocabulary for Housie.
//!
//! This crate defines what every other layer agrees on:
//!
//! - **Identity types** ([`RoomId`], [`PlayerId`], [`CardId`]) — newtype
//!   ids used across the room, store, and server layers.
//! - **Events** ([`RoomEvent`]) — the messages fanned out to every
//!   subscriber of a room when its state changes.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how messages are
//!   converted to and from the text frames that travel on the wire.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while encoding
//!   or decoding.
//!
//! The protocol layer knows nothing about connections, rooms, or game
//! rules. It only defines shapes and their serialization.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{CardId, PlayerId, RoomEvent, RoomId};
