//! Card generation.
//!
//! Cards are generated with a cryptographically strong RNG: an
//! adversary who doesn't control the generator must not be able to
//! predict or replay card contents. The seeded, *reproducible* RNG is
//! reserved for the draw pool ([`crate::DrawPool`]), never for cards.

use rand::Rng;
use rand::seq::index;
use serde::{Deserialize, Serialize};

use std::collections::HashSet;

use housie_protocol::{CardId, PlayerId, RoomId};

use crate::Variant;

/// One cell of a card grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// The number in this cell, or `None` for the free center (75-ball)
    /// and for blanks (90-ball).
    pub value: Option<u8>,
    /// Whether the holder has marked this cell.
    pub marked: bool,
    /// `true` only for the designated free center cell of a 5×5 card.
    pub free: bool,
}

impl Cell {
    /// A cell holding a number, initially unmarked.
    pub fn number(value: u8) -> Self {
        Self {
            value: Some(value),
            marked: false,
            free: false,
        }
    }

    /// A 90-ball blank: no value, not free, never markable.
    pub fn blank() -> Self {
        Self {
            value: None,
            marked: false,
            free: false,
        }
    }

    /// The 75-ball free center: no value, pre-marked.
    pub fn free() -> Self {
        Self {
            value: None,
            marked: true,
            free: true,
        }
    }
}

/// A card's grid of cells: 5×5 for 75-ball, 3×9 for 90-ball.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardGrid {
    rows: Vec<Vec<Cell>>,
}

impl CardGrid {
    /// Generates a fresh grid for `variant` using the thread-local CSPRNG.
    pub fn generate(variant: Variant) -> Self {
        Self::generate_with(variant, &mut rand::rng())
    }

    /// Generates a fresh grid using the caller's RNG.
    ///
    /// Exposed so tests can drive generation deterministically; real
    /// card allocation goes through [`CardGrid::generate`].
    pub fn generate_with<R: Rng + ?Sized>(variant: Variant, rng: &mut R) -> Self {
        match variant {
            Variant::SeventyFive => Self::generate_seventy_five(rng),
            Variant::Ninety => Self::generate_ninety(rng),
        }
    }

    /// 5×5 grid: every column draws from its 15-wide sub-range, the
    /// center is free and pre-marked, and values are unique card-wide
    /// (redrawn on collision, not just per column).
    fn generate_seventy_five<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let variant = Variant::SeventyFive;
        let mut used = HashSet::new();
        let rows = (0..5)
            .map(|row| {
                (0..5)
                    .map(|col| {
                        if row == 2 && col == 2 {
                            Cell::free()
                        } else {
                            Cell::number(draw_unique(rng, variant, col, &mut used))
                        }
                    })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    /// 3×9 grid: each row holds numbers in exactly 5 of the 9 columns
    /// (chosen uniformly without replacement), blanks elsewhere. Values
    /// come from the column sub-ranges and are unique card-wide.
    fn generate_ninety<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let variant = Variant::Ninety;
        let mut used = HashSet::new();
        let rows = (0..3)
            .map(|_| {
                let chosen: HashSet<usize> = index::sample(rng, 9, 5).into_iter().collect();
                (0..9)
                    .map(|col| {
                        if chosen.contains(&col) {
                            Cell::number(draw_unique(rng, variant, col, &mut used))
                        } else {
                            Cell::blank()
                        }
                    })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    /// Builds a grid from explicit rows. Intended for rehydrating
    /// persisted cards and for tests; no shape validation is performed.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// The grid's rows.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Iterates over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.rows.iter().flatten()
    }

    /// All numbers present on the card, row-major.
    pub fn values(&self) -> Vec<u8> {
        self.cells().filter_map(|c| c.value).collect()
    }

    /// Sets the marked flag of the cell holding `number`.
    ///
    /// Returns `false` if no cell holds that number. Free cells and
    /// blanks have no number and can never be flipped through here.
    pub fn mark_value(&mut self, number: u8, marked: bool) -> bool {
        for cell in self.rows.iter_mut().flatten() {
            if cell.value == Some(number) {
                cell.marked = marked;
                return true;
            }
        }
        false
    }
}

/// Draws a value from `col`'s sub-range, redrawing until it collides
/// with nothing already placed anywhere on the card.
fn draw_unique<R: Rng + ?Sized>(
    rng: &mut R,
    variant: Variant,
    col: usize,
    used: &mut HashSet<u8>,
) -> u8 {
    let range = variant.column_range(col);
    loop {
        let value = rng.random_range(range.clone());
        if used.insert(value) {
            return value;
        }
    }
}

/// A player's card in a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub room_id: RoomId,
    pub owner_id: PlayerId,
    pub variant: Variant,
    pub grid: CardGrid,
}

impl Card {
    /// Allocates a card with a freshly generated grid.
    pub fn generate(id: CardId, room_id: RoomId, owner_id: PlayerId, variant: Variant) -> Self {
        Self {
            id,
            room_id,
            owner_id,
            variant,
            grid: CardGrid::generate(variant),
        }
    }
}
