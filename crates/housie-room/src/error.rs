//! Error types for the room layer.
//!
//! These are rejected operations, not failures: the room's state is
//! untouched whenever one of them is returned.

use housie_protocol::{CardId, PlayerId, RoomId};

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// Joining is only legal while the room is in the lobby.
    #[error("room {0} is not accepting players")]
    NotJoinable(RoomId),

    /// Starting is only legal from the lobby.
    #[error("room {0} has already started")]
    AlreadyStarted(RoomId),

    /// Draws, claims, and marks are only legal while the room is running.
    #[error("room {0} is not running")]
    NotActive(RoomId),

    /// The referenced card was never dealt in this room.
    #[error("card {0} not found in room {1}")]
    UnknownCard(CardId, RoomId),

    /// The card belongs to a different player.
    #[error("card {0} does not belong to player {1}")]
    NotCardOwner(CardId, PlayerId),

    /// A mark/unmark named a number that isn't on the card.
    #[error("number {0} is not on card {1}")]
    NumberNotOnCard(u8, CardId),

    /// The room's command channel is closed or full: the actor is
    /// gone or shutting down.
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),
}
