//! The draw engine: a seeded, shuffled pool of numbers.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// The remaining, not-yet-called numbers of a room, in draw order.
///
/// The pool is built from the full inclusive range and shuffled by a
/// PRNG keyed on `seed`. The same `(range, seed)` always produce the
/// same order, so anyone holding the seed and the published call
/// history can recompute the shuffle offline and verify that the draws
/// were fair. When no seed is supplied, one is taken from the
/// thread-local CSPRNG and kept so it can be persisted for audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawPool {
    numbers: Vec<u8>,
    seed: u64,
}

impl DrawPool {
    /// Builds and shuffles the pool over `[min, max]` inclusive.
    pub fn initialize(min: u8, max: u8, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::rng().random());
        let mut numbers: Vec<u8> = (min..=max).collect();
        numbers.shuffle(&mut StdRng::seed_from_u64(seed));
        Self { numbers, seed }
    }

    /// Rehydrates a pool from persisted state. The order is the
    /// remaining draw order; no reshuffle happens here.
    pub fn from_parts(numbers: Vec<u8>, seed: u64) -> Self {
        Self { numbers, seed }
    }

    /// Removes and returns the next number in pool order.
    ///
    /// Returns `None` once the pool is exhausted, a normal terminal
    /// condition rather than an error.
    pub fn draw_next(&mut self) -> Option<u8> {
        if self.numbers.is_empty() {
            None
        } else {
            Some(self.numbers.remove(0))
        }
    }

    /// The seed the shuffle was keyed on.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The remaining numbers, in draw order.
    pub fn remaining(&self) -> &[u8] {
        &self.numbers
    }

    /// How many numbers are left to draw.
    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    /// `true` once every number has been drawn.
    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }
}
