//! Win patterns and claim verification.
//!
//! 75-ball patterns are fixed boolean masks over the 5×5 grid; a card
//! satisfies a pattern when at least one of its masks has every required
//! cell marked. 90-ball patterns are row-based (one line, two lines,
//! full house) over the non-blank cells.
//!
//! Claim verification is the anti-cheat core: the client's reported mark
//! state is untrusted, so every marked value is cross-checked against
//! the authoritative call history *before* any pattern logic runs.

use serde::{Deserialize, Serialize};

use crate::{CardGrid, Variant};

/// A room's declared win condition: a pattern name bound to the variant
/// it is evaluated under. This is the structured form persisted with the
/// room (`{"id": "horizontal_line", "variant": "75"}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub id: String,
    pub variant: Variant,
}

impl Pattern {
    pub fn new(id: impl Into<String>, variant: Variant) -> Self {
        Self {
            id: id.into(),
            variant,
        }
    }
}

/// The outcome of verifying one claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimVerdict {
    pub valid: bool,
    /// Human-readable reason, suitable for showing to the claimant and
    /// recording on the claim's audit record.
    pub message: String,
}

impl ClaimVerdict {
    fn accepted(message: impl Into<String>) -> Self {
        Self {
            valid: true,
            message: message.into(),
        }
    }

    fn rejected(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// 75-ball masks
// ---------------------------------------------------------------------------

/// One required-cell mask over a 5×5 grid. `1` = cell must be marked.
type Mask = [[u8; 5]; 5];

const HORIZONTAL_LINE: [Mask; 5] = [
    [
        [1, 1, 1, 1, 1],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
    ],
    [
        [0, 0, 0, 0, 0],
        [1, 1, 1, 1, 1],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
    ],
    [
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
        [1, 1, 1, 1, 1],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
    ],
    [
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
        [1, 1, 1, 1, 1],
        [0, 0, 0, 0, 0],
    ],
    [
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
        [1, 1, 1, 1, 1],
    ],
];

const VERTICAL_LINE: [Mask; 5] = [
    [
        [1, 0, 0, 0, 0],
        [1, 0, 0, 0, 0],
        [1, 0, 0, 0, 0],
        [1, 0, 0, 0, 0],
        [1, 0, 0, 0, 0],
    ],
    [
        [0, 1, 0, 0, 0],
        [0, 1, 0, 0, 0],
        [0, 1, 0, 0, 0],
        [0, 1, 0, 0, 0],
        [0, 1, 0, 0, 0],
    ],
    [
        [0, 0, 1, 0, 0],
        [0, 0, 1, 0, 0],
        [0, 0, 1, 0, 0],
        [0, 0, 1, 0, 0],
        [0, 0, 1, 0, 0],
    ],
    [
        [0, 0, 0, 1, 0],
        [0, 0, 0, 1, 0],
        [0, 0, 0, 1, 0],
        [0, 0, 0, 1, 0],
        [0, 0, 0, 1, 0],
    ],
    [
        [0, 0, 0, 0, 1],
        [0, 0, 0, 0, 1],
        [0, 0, 0, 0, 1],
        [0, 0, 0, 0, 1],
        [0, 0, 0, 0, 1],
    ],
];

const DIAGONAL: [Mask; 2] = [
    // Top-left to bottom-right.
    [
        [1, 0, 0, 0, 0],
        [0, 1, 0, 0, 0],
        [0, 0, 1, 0, 0],
        [0, 0, 0, 1, 0],
        [0, 0, 0, 0, 1],
    ],
    // Top-right to bottom-left.
    [
        [0, 0, 0, 0, 1],
        [0, 0, 0, 1, 0],
        [0, 0, 1, 0, 0],
        [0, 1, 0, 0, 0],
        [1, 0, 0, 0, 0],
    ],
];

const FOUR_CORNERS: [Mask; 1] = [[
    [1, 0, 0, 0, 1],
    [0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0],
    [1, 0, 0, 0, 1],
]];

const FULL_HOUSE_75: [Mask; 1] = [[
    [1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1],
]];

fn masks_75(pattern_name: &str) -> Option<&'static [Mask]> {
    match pattern_name {
        "horizontal_line" => Some(&HORIZONTAL_LINE),
        "vertical_line" => Some(&VERTICAL_LINE),
        "diagonal" => Some(&DIAGONAL),
        "four_corners" => Some(&FOUR_CORNERS),
        "full_house" => Some(&FULL_HOUSE_75),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Pattern satisfaction
// ---------------------------------------------------------------------------

/// Returns `true` if the card's marked cells satisfy the named pattern.
///
/// Unknown pattern names are unsatisfiable, not an error: a claim
/// naming a pattern the verifier doesn't know simply never wins.
pub fn pattern_satisfied(grid: &CardGrid, pattern_name: &str, variant: Variant) -> bool {
    match variant {
        Variant::SeventyFive => satisfied_75(grid, pattern_name),
        Variant::Ninety => satisfied_90(grid, pattern_name),
    }
}

fn satisfied_75(grid: &CardGrid, pattern_name: &str) -> bool {
    let Some(masks) = masks_75(pattern_name) else {
        tracing::debug!(pattern = pattern_name, "unknown 75-ball pattern, unsatisfiable");
        return false;
    };

    masks.iter().any(|mask| {
        grid.rows().iter().enumerate().all(|(r, row)| {
            row.iter()
                .enumerate()
                .all(|(c, cell)| mask[r][c] == 0 || cell.marked)
        })
    })
}

fn satisfied_90(grid: &CardGrid, pattern_name: &str) -> bool {
    // A row counts as complete when every non-blank cell is marked.
    let complete_rows = grid
        .rows()
        .iter()
        .filter(|row| {
            row.iter()
                .filter(|cell| cell.value.is_some())
                .all(|cell| cell.marked)
        })
        .count();

    match pattern_name {
        "one_line" => complete_rows >= 1,
        "two_lines" => complete_rows >= 2,
        "full_house" => complete_rows == grid.rows().len(),
        other => {
            tracing::debug!(pattern = other, "unknown 90-ball pattern, unsatisfiable");
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Claim verification
// ---------------------------------------------------------------------------

/// Verifies a bingo claim in two stages.
///
/// Stage one is the integrity pass: every marked, non-free cell's value
/// must appear in `called_numbers`. A single marked-but-never-called
/// value rejects the claim immediately, naming the offending number.
/// That check defeats clients that tamper with their own mark state.
/// Stage two evaluates the pattern over the (now trusted) marks.
pub fn verify_claim(
    grid: &CardGrid,
    called_numbers: &[u8],
    pattern_name: &str,
    variant: Variant,
) -> ClaimVerdict {
    for cell in grid.cells() {
        if cell.marked && !cell.free {
            if let Some(value) = cell.value {
                if !called_numbers.contains(&value) {
                    return ClaimVerdict::rejected(format!(
                        "number {value} was marked but not called"
                    ));
                }
            }
        }
    }

    if pattern_satisfied(grid, pattern_name, variant) {
        ClaimVerdict::accepted("Valid bingo!")
    } else {
        ClaimVerdict::rejected(format!("pattern '{pattern_name}' not satisfied"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cell;

    /// Builds a 5×5 grid with in-range values; `marked` decides which
    /// cells start marked (the free center is always marked).
    fn grid_75(marked: impl Fn(usize, usize) -> bool) -> CardGrid {
        CardGrid::from_rows(
            (0..5)
                .map(|r| {
                    (0..5)
                        .map(|c| {
                            if r == 2 && c == 2 {
                                Cell::free()
                            } else {
                                let mut cell = Cell::number((c * 15 + r + 1) as u8);
                                cell.marked = marked(r, c);
                                cell
                            }
                        })
                        .collect()
                })
                .collect(),
        )
    }

    /// Builds a 3×9 grid with values in columns 0..5 of each row;
    /// `marked_rows` lists rows whose values start marked.
    fn grid_90(marked_rows: &[usize]) -> CardGrid {
        CardGrid::from_rows(
            (0..3)
                .map(|r| {
                    (0..9)
                        .map(|c| {
                            if c < 5 {
                                let range = Variant::Ninety.column_range(c);
                                let mut cell = Cell::number(*range.start() + r as u8);
                                cell.marked = marked_rows.contains(&r);
                                cell
                            } else {
                                Cell::blank()
                            }
                        })
                        .collect()
                })
                .collect(),
        )
    }

    #[test]
    fn test_horizontal_line_any_full_row() {
        let top = grid_75(|r, _| r == 0);
        assert!(pattern_satisfied(&top, "horizontal_line", Variant::SeventyFive));

        let bottom = grid_75(|r, _| r == 4);
        assert!(pattern_satisfied(&bottom, "horizontal_line", Variant::SeventyFive));
    }

    #[test]
    fn test_horizontal_line_four_of_five_everywhere_fails() {
        // Every row has 4 of 5 marked; close is not a line.
        let grid = grid_75(|_, c| c < 4);
        assert!(!pattern_satisfied(&grid, "horizontal_line", Variant::SeventyFive));
    }

    #[test]
    fn test_middle_row_uses_free_center() {
        // Row 2 needs only its four numbered cells marked; the free
        // center supplies the fifth.
        let grid = grid_75(|r, _| r == 2);
        assert!(pattern_satisfied(&grid, "horizontal_line", Variant::SeventyFive));
    }

    #[test]
    fn test_vertical_line() {
        let grid = grid_75(|_, c| c == 0);
        assert!(pattern_satisfied(&grid, "vertical_line", Variant::SeventyFive));
        assert!(!pattern_satisfied(&grid, "horizontal_line", Variant::SeventyFive));
    }

    #[test]
    fn test_diagonal_passes_through_free_center() {
        let grid = grid_75(|r, c| r == c && !(r == 2 && c == 2));
        assert!(pattern_satisfied(&grid, "diagonal", Variant::SeventyFive));

        let anti = grid_75(|r, c| r + c == 4 && !(r == 2 && c == 2));
        assert!(pattern_satisfied(&anti, "diagonal", Variant::SeventyFive));
    }

    #[test]
    fn test_four_corners() {
        let grid = grid_75(|r, c| (r == 0 || r == 4) && (c == 0 || c == 4));
        assert!(pattern_satisfied(&grid, "four_corners", Variant::SeventyFive));

        let missing = grid_75(|r, c| (r == 0 && c == 0) || (r == 0 && c == 4) || (r == 4 && c == 0));
        assert!(!pattern_satisfied(&missing, "four_corners", Variant::SeventyFive));
    }

    #[test]
    fn test_full_house_75() {
        assert!(pattern_satisfied(&grid_75(|_, _| true), "full_house", Variant::SeventyFive));
        assert!(!pattern_satisfied(&grid_75(|r, _| r != 3), "full_house", Variant::SeventyFive));
    }

    #[test]
    fn test_unknown_pattern_is_unsatisfiable() {
        let grid = grid_75(|_, _| true);
        assert!(!pattern_satisfied(&grid, "lucky_sevens", Variant::SeventyFive));
        let grid = grid_90(&[0, 1, 2]);
        assert!(!pattern_satisfied(&grid, "lucky_sevens", Variant::Ninety));
    }

    #[test]
    fn test_ninety_one_line() {
        assert!(pattern_satisfied(&grid_90(&[1]), "one_line", Variant::Ninety));
        assert!(!pattern_satisfied(&grid_90(&[]), "one_line", Variant::Ninety));
    }

    #[test]
    fn test_ninety_two_lines() {
        assert!(pattern_satisfied(&grid_90(&[0, 2]), "two_lines", Variant::Ninety));
        assert!(!pattern_satisfied(&grid_90(&[1]), "two_lines", Variant::Ninety));
    }

    #[test]
    fn test_ninety_full_house() {
        assert!(pattern_satisfied(&grid_90(&[0, 1, 2]), "full_house", Variant::Ninety));
        assert!(!pattern_satisfied(&grid_90(&[0, 1]), "full_house", Variant::Ninety));
    }

    #[test]
    fn test_verify_claim_accepts_honest_line() {
        let grid = grid_75(|r, _| r == 0);
        let called: Vec<u8> = grid.rows()[0].iter().filter_map(|c| c.value).collect();

        let verdict = verify_claim(&grid, &called, "horizontal_line", Variant::SeventyFive);
        assert!(verdict.valid);
        assert_eq!(verdict.message, "Valid bingo!");
    }

    #[test]
    fn test_verify_claim_rejects_tampered_marks() {
        // The top row is fully marked but one of its values was never
        // called. The pattern would pass; the integrity pass must not.
        let grid = grid_75(|r, _| r == 0);
        let mut called: Vec<u8> = grid.rows()[0].iter().filter_map(|c| c.value).collect();
        let missing = called.pop().unwrap();

        let verdict = verify_claim(&grid, &called, "horizontal_line", Variant::SeventyFive);
        assert!(!verdict.valid);
        assert!(verdict.message.contains("not called"));
        assert!(verdict.message.contains(&missing.to_string()));
    }

    #[test]
    fn test_verify_claim_rejects_unmet_pattern() {
        let grid = grid_75(|r, c| r == 0 && c < 4);
        let called: Vec<u8> = (1..=75).collect();

        let verdict = verify_claim(&grid, &called, "horizontal_line", Variant::SeventyFive);
        assert!(!verdict.valid);
        assert!(verdict.message.contains("horizontal_line"));
    }

    #[test]
    fn test_verify_claim_free_cell_needs_no_call() {
        // Middle row: four numbers called, free center marked from the
        // start. The free cell must not trip the integrity pass.
        let grid = grid_75(|r, _| r == 2);
        let called: Vec<u8> = grid.rows()[2].iter().filter_map(|c| c.value).collect();
        assert_eq!(called.len(), 4);

        let verdict = verify_claim(&grid, &called, "horizontal_line", Variant::SeventyFive);
        assert!(verdict.valid);
    }

    #[test]
    fn test_pattern_serde_shape() {
        let pattern = Pattern::new("horizontal_line", Variant::SeventyFive);
        let json: serde_json::Value = serde_json::to_value(&pattern).unwrap();
        assert_eq!(json["id"], "horizontal_line");
        assert_eq!(json["variant"], "75");
    }
}
