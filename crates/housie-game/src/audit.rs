//! Draw audit trail.
//!
//! A room's fairness proof is the pair (seed, ordered draw sequence):
//! anyone can rebuild the pool from the seed and check that the calls
//! are exactly its prefix. The digest binds the two together so a
//! stored sequence can't be edited without detection.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::DrawPool;

/// One drawn number and its 1-based position in the call history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRecord {
    pub number: u8,
    pub sequence: u32,
}

/// The ordered record of every draw a room has made, plus the seed its
/// pool was shuffled with. Lives as long as the room; persisted through
/// the store so fairness can be re-checked after the fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawAudit {
    seed: u64,
    entries: Vec<DrawRecord>,
}

impl DrawAudit {
    /// Starts an empty audit for a pool shuffled with `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            entries: Vec::new(),
        }
    }

    /// Rehydrates an audit from persisted parts.
    pub fn from_parts(seed: u64, entries: Vec<DrawRecord>) -> Self {
        Self { seed, entries }
    }

    /// Appends a drawn number, returning its sequence index (1-based).
    pub fn record(&mut self, number: u8) -> u32 {
        let sequence = self.entries.len() as u32 + 1;
        self.entries.push(DrawRecord { number, sequence });
        sequence
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn entries(&self) -> &[DrawRecord] {
        &self.entries
    }

    /// Hex SHA-256 over the seed and the ordered draw sequence.
    ///
    /// The digest is recomputable from public data; comparing it against
    /// the stored value detects after-the-fact edits of either.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.seed.to_be_bytes());
        for entry in &self.entries {
            hasher.update([entry.number]);
        }
        hex::encode(hasher.finalize())
    }

    /// Checks that the recorded draws are exactly the prefix of the
    /// shuffle this seed produces over `[min, max]`. This is the
    /// offline fairness proof.
    pub fn matches_shuffle(&self, min: u8, max: u8) -> bool {
        let pool = DrawPool::initialize(min, max, Some(self.seed));
        if self.entries.len() > pool.len() {
            return false;
        }
        self.entries
            .iter()
            .zip(pool.remaining())
            .enumerate()
            .all(|(i, (entry, expected))| {
                entry.number == *expected && entry.sequence == i as u32 + 1
            })
    }
}
