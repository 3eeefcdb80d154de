//! Persistence boundary for Housie.
//!
//! The core never talks to a database directly. It sees the [`Store`]
//! trait: a key-addressed save/load surface for rooms, cards, claims,
//! and draw audits, with read-your-writes consistency per room and no
//! cross-room transactions. The actual engine (Redis, SQL, ...) lives
//! with the persistence collaborator; this crate ships the records that
//! cross the boundary and an in-memory implementation used by tests and
//! the default server wiring.
//!
//! JSON is used only at this edge: records are explicit structs
//! in memory and serialize to JSON strings exactly at save time.

mod error;
mod memory;
mod records;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use records::{ClaimRecord, ClaimStatus, DrawAuditRecord, RoomRecord, Winner};

use std::future::Future;

use housie_game::Card;
use housie_protocol::{CardId, RoomId};

/// The key-addressed persistence interface the core depends on.
///
/// `Clone` because every room actor holds its own handle; expected to
/// be a cheap reference clone (the memory store is an `Arc`).
///
/// The methods return `impl Future + Send` rather than using `async fn`
/// so the futures can cross `tokio::spawn` (room actors are spawned
/// generically over the store). Implementations can still be written
/// with plain `async fn`.
pub trait Store: Clone + Send + Sync + 'static {
    /// Saves (upserts) a room record under its id.
    fn save_room(&self, room: &RoomRecord)
    -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Loads a room record by id.
    fn load_room(
        &self,
        room_id: RoomId,
    ) -> impl Future<Output = Result<Option<RoomRecord>, StoreError>> + Send;

    /// Saves (upserts) a card under its id.
    fn save_card(&self, card: &Card) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Loads a card by id.
    fn load_card(
        &self,
        card_id: CardId,
    ) -> impl Future<Output = Result<Option<Card>, StoreError>> + Send;

    /// Appends a claim record to the room's claim history. Claims are
    /// an append-only audit trail, rejected attempts included.
    fn save_claim(&self, claim: &ClaimRecord)
    -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Loads a room's claim history, in recording order.
    fn load_claims(
        &self,
        room_id: RoomId,
    ) -> impl Future<Output = Result<Vec<ClaimRecord>, StoreError>> + Send;

    /// Saves (upserts) a room's draw audit.
    fn save_audit(
        &self,
        audit: &DrawAuditRecord,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Loads a room's draw audit.
    fn load_audit(
        &self,
        room_id: RoomId,
    ) -> impl Future<Output = Result<Option<DrawAuditRecord>, StoreError>> + Send;
}
