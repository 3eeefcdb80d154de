//! Identity types and room events.
//!
//! These are the structures that travel on the wire and are embedded in
//! persisted records, so their JSON shapes are load-bearing: clients and
//! the audit trail both depend on them staying stable.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a player.
///
/// Newtype over `u64` so a player id can never be confused with a room
/// or card id in a signature. `#[serde(transparent)]` keeps the JSON
/// representation a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A unique identifier for a room (one bingo session).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

/// A unique identifier for a single bingo card.
///
/// One player holds `cards_per_player` of these per room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u64);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Room events
// ---------------------------------------------------------------------------

/// An event published to every subscriber of a room.
///
/// The broadcast hub fans these out whenever the room's authoritative
/// state changes. The JSON shape is internally tagged with a snake_case
/// `type` field, e.g.:
///
/// ```json
/// { "type": "number_drawn", "number": 42, "sequence": 7 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoomEvent {
    /// A player joined the room while it was in the lobby.
    PlayerJoined { player_id: PlayerId },

    /// The room transitioned from lobby to running.
    GameStarted { room_id: RoomId },

    /// A number was drawn. `sequence` is its 1-based position in the
    /// call history.
    NumberDrawn { number: u8, sequence: u32 },

    /// The outcome of a claim attempt. Valid or not, every attempt is
    /// announced so the room can see rejected claims too.
    ClaimResult {
        player_id: PlayerId,
        valid: bool,
        message: String,
    },
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! The event JSON shapes are consumed by browser clients; these tests
    //! pin the exact serde output so an attribute change can't silently
    //! break them.

    use super::*;

    #[test]
    fn test_player_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&PlayerId(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn test_player_id_deserializes_from_plain_number() {
        let pid: PlayerId = serde_json::from_str("42").unwrap();
        assert_eq!(pid, PlayerId(42));
    }

    #[test]
    fn test_id_display() {
        assert_eq!(PlayerId(7).to_string(), "P-7");
        assert_eq!(RoomId(3).to_string(), "R-3");
        assert_eq!(CardId(12).to_string(), "C-12");
    }

    #[test]
    fn test_number_drawn_json_format() {
        let event = RoomEvent::NumberDrawn {
            number: 42,
            sequence: 7,
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "number_drawn");
        assert_eq!(json["number"], 42);
        assert_eq!(json["sequence"], 7);
    }

    #[test]
    fn test_player_joined_json_format() {
        let event = RoomEvent::PlayerJoined {
            player_id: PlayerId(5),
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "player_joined");
        assert_eq!(json["player_id"], 5);
    }

    #[test]
    fn test_game_started_json_format() {
        let event = RoomEvent::GameStarted { room_id: RoomId(9) };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "game_started");
        assert_eq!(json["room_id"], 9);
    }

    #[test]
    fn test_claim_result_json_format() {
        let event = RoomEvent::ClaimResult {
            player_id: PlayerId(3),
            valid: false,
            message: "pattern 'diagonal' not satisfied".into(),
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "claim_result");
        assert_eq!(json["player_id"], 3);
        assert_eq!(json["valid"], false);
        assert_eq!(json["message"], "pattern 'diagonal' not satisfied");
    }

    #[test]
    fn test_room_event_round_trip() {
        let event = RoomEvent::ClaimResult {
            player_id: PlayerId(1),
            valid: true,
            message: "Valid bingo!".into(),
        };
        let text = serde_json::to_string(&event).unwrap();
        let decoded: RoomEvent = serde_json::from_str(&text).unwrap();
        assert_eq!(event, decoded);
    }

    #[test]
    fn test_decode_unknown_event_type_returns_error() {
        let unknown = r#"{"type": "jackpot_hit", "amount": 9000}"#;
        let result: Result<RoomEvent, _> = serde_json::from_str(unknown);
        assert!(result.is_err());
    }
}
