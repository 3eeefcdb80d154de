//! Game rules for Housie: cards, draws, and patterns.
//!
//! Everything in this crate is pure game logic with no async, no I/O,
//! and no knowledge of rooms or transports:
//!
//! - [`Variant`] — the ruleset (75-ball 5×5 or 90-ball 3×9) and its
//!   column sub-ranges.
//! - [`Card`] / [`CardGrid`] — card generation with card-wide value
//!   uniqueness, driven by a cryptographically strong RNG.
//! - [`DrawPool`] — the seeded, shuffled draw sequence. Identical
//!   `(range, seed)` always reproduce the same order; that determinism
//!   is the fairness proof.
//! - [`pattern`] — mask-based win patterns and the two-stage claim
//!   verification that cross-checks client mark state against the
//!   authoritative call history.
//! - [`DrawAudit`] — the seed + ordered draw records + integrity digest
//!   kept for offline verification.
//! - [`RoomPhase`] — the lobby → running → finished lifecycle shared by
//!   the room layer and the persisted records.

mod audit;
mod card;
mod draw;
pub mod pattern;
mod phase;
mod variant;

pub use audit::{DrawAudit, DrawRecord};
pub use card::{Card, CardGrid, Cell};
pub use draw::DrawPool;
pub use pattern::{ClaimVerdict, Pattern};
pub use phase::RoomPhase;
pub use variant::Variant;
