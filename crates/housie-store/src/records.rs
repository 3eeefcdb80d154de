//! The record structs that cross the persistence boundary.
//!
//! These are the exact shapes a storage engine must round-trip. Field
//! names and serde representations are load-bearing: external tooling
//! (audit verifiers, dashboards) reads the same JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use housie_game::{DrawRecord, Pattern, RoomPhase, Variant};
use housie_protocol::{CardId, PlayerId, RoomId};

/// One accepted claim, in acceptance order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Winner {
    pub player_id: PlayerId,
    pub card_id: CardId,
    pub timestamp: DateTime<Utc>,
}

/// A room's full persisted state.
///
/// `called_numbers` and `draw_pool` are both ordered: the former is the
/// append-only call history, the latter the remaining draw order. Their
/// union is always the full `[number_range_min, number_range_max]`
/// range and their intersection is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomRecord {
    pub room_id: RoomId,
    pub variant: Variant,
    pub number_range_min: u8,
    pub number_range_max: u8,
    pub cards_per_player: u32,
    pub pattern: Pattern,
    pub state: RoomPhase,
    pub called_numbers: Vec<u8>,
    pub draw_pool: Vec<u8>,
    pub winners: Vec<Winner>,
    pub draw_interval: u64,
    pub auto_draw: bool,
    pub seed: u64,
}

/// Outcome of a recorded claim attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimStatus {
    Accepted,
    Rejected,
}

/// One claim attempt, kept for audit whether it was accepted or not,
/// and never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub room_id: RoomId,
    pub player_id: PlayerId,
    pub card_id: CardId,
    pub claimed_pattern: String,
    pub status: ClaimStatus,
    pub verification_message: String,
    pub created_at: DateTime<Utc>,
    /// Set only when the claim was accepted.
    pub verified_at: Option<DateTime<Utc>>,
}

/// A room's draw audit: the shuffle seed, the ordered draw records, and
/// the integrity digest over both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawAuditRecord {
    pub room_id: RoomId,
    pub seed: u64,
    pub entries: Vec<DrawRecord>,
    pub digest: String,
}
