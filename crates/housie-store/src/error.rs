//! Error types for the persistence boundary.

/// Errors surfaced by a [`Store`](crate::Store) implementation.
///
/// A failing store is never fatal to the process: the room layer logs
/// save failures and keeps its in-memory state authoritative, and a
/// room's auto-draw loop stops (for that room only) when the store
/// becomes unreachable mid-game.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Serializing a record at the JSON edge failed.
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// A stored value failed to parse back into its record type.
    #[error("decode failed: {0}")]
    Decode(#[source] serde_json::Error),

    /// The backing engine rejected the operation or is unreachable.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
