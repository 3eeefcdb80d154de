//! The JSON command surface clients speak.
//!
//! Commands and replies are internally tagged with a snake_case `type`
//! field, the same convention as the fan-out events in
//! `housie-protocol`. Room events arrive on the same socket as replies;
//! clients dispatch on `type`.

use serde::{Deserialize, Serialize};

use housie_game::Card;
use housie_protocol::{CardId, PlayerId, RoomId};

fn default_variant() -> String {
    "75".into()
}

fn default_cards_per_player() -> u32 {
    1
}

fn default_pattern() -> String {
    "horizontal_line".into()
}

fn default_auto_draw() -> bool {
    true
}

fn default_draw_interval() -> u64 {
    5
}

/// A request from a connected client.
///
/// The first command on every connection must be `hello`; identity
/// issuance itself (who may use which player id) belongs to the
/// authentication collaborator in front of this server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientCommand {
    /// Identifies the connection.
    Hello { player_id: PlayerId },

    /// Creates a room. Absent fields take the classic defaults: one
    /// 75-ball horizontal-line card per player, auto-draw every 5s.
    CreateRoom {
        #[serde(default = "default_variant")]
        variant: String,
        #[serde(default = "default_cards_per_player")]
        cards_per_player: u32,
        #[serde(default = "default_pattern")]
        pattern: String,
        #[serde(default = "default_auto_draw")]
        auto_draw: bool,
        #[serde(default = "default_draw_interval")]
        draw_interval: u64,
    },

    /// Joins a room (lobby only) and subscribes to its events.
    JoinRoom { room_id: RoomId },

    /// Starts the game (lobby only).
    StartGame { room_id: RoomId },

    /// Draws the next number manually (running only).
    DrawNumber { room_id: RoomId },

    /// Claims bingo on one of the caller's cards.
    ClaimBingo { room_id: RoomId, card_id: CardId },

    /// Marks or unmarks a called number on one of the caller's cards.
    MarkCell {
        room_id: RoomId,
        card_id: CardId,
        number: u8,
        marked: bool,
    },

    /// Keep-alive.
    Ping,
}

/// A direct reply to one client command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerReply {
    Welcome { player_id: PlayerId },
    RoomCreated { room_id: RoomId },
    Joined { room_id: RoomId, cards: Vec<Card> },
    Started { room_id: RoomId },
    Drawn { number: u8, sequence: u32 },
    NoMoreNumbers,
    ClaimChecked { valid: bool, message: String },
    Marked,
    Pong,
    Error { message: String },
}
