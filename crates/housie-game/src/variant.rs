//! Game variants and their column layouts.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::ops::RangeInclusive;

/// The ruleset a room plays under.
///
/// Serialized as the variant token (`"75"` / `"90"`), which is also the
/// form it round-trips through persisted room records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    /// 75-ball bingo: 5×5 grid, columns B/I/N/G/O, free center cell.
    #[serde(rename = "75")]
    SeventyFive,
    /// 90-ball bingo: 3×9 grid, 5 numbers and 4 blanks per row.
    #[serde(rename = "90")]
    Ninety,
}

impl Variant {
    /// Parses a variant token.
    ///
    /// Anything that isn't `"90"` falls back to 75-ball. The fallback is
    /// deliberate (permissive inputs from chat commands and old stored
    /// rooms) but it is logged so it never happens silently.
    pub fn from_token(token: &str) -> Self {
        match token {
            "90" => Self::Ninety,
            "75" => Self::SeventyFive,
            other => {
                tracing::warn!(token = other, "unknown variant token, falling back to 75-ball");
                Self::SeventyFive
            }
        }
    }

    /// The canonical token for this variant.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SeventyFive => "75",
            Self::Ninety => "90",
        }
    }

    /// The inclusive range of drawable numbers.
    pub fn number_range(self) -> (u8, u8) {
        match self {
            Self::SeventyFive => (1, 75),
            Self::Ninety => (1, 90),
        }
    }

    /// Grid dimensions as `(rows, columns)`.
    pub fn dimensions(self) -> (usize, usize) {
        match self {
            Self::SeventyFive => (5, 5),
            Self::Ninety => (3, 9),
        }
    }

    /// The sub-range of numbers allowed in the given column.
    ///
    /// 75-ball columns are 15 wide (B 1–15 through O 61–75). 90-ball
    /// column 0 is 1–9, columns 1–7 are 10 wide, and column 8 absorbs
    /// the tail at 80–90.
    pub fn column_range(self, col: usize) -> RangeInclusive<u8> {
        match self {
            Self::SeventyFive => {
                let low = col as u8 * 15 + 1;
                low..=low + 14
            }
            Self::Ninety => match col {
                0 => 1..=9,
                8 => 80..=90,
                c => {
                    let low = c as u8 * 10;
                    low..=low + 9
                }
            },
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_token_known_variants() {
        assert_eq!(Variant::from_token("75"), Variant::SeventyFive);
        assert_eq!(Variant::from_token("90"), Variant::Ninety);
    }

    #[test]
    fn test_from_token_unknown_falls_back_to_seventy_five() {
        assert_eq!(Variant::from_token("banana"), Variant::SeventyFive);
        assert_eq!(Variant::from_token(""), Variant::SeventyFive);
    }

    #[test]
    fn test_serde_uses_token() {
        assert_eq!(serde_json::to_string(&Variant::Ninety).unwrap(), "\"90\"");
        let v: Variant = serde_json::from_str("\"75\"").unwrap();
        assert_eq!(v, Variant::SeventyFive);
    }

    #[test]
    fn test_column_ranges_seventy_five() {
        assert_eq!(Variant::SeventyFive.column_range(0), 1..=15);
        assert_eq!(Variant::SeventyFive.column_range(2), 31..=45);
        assert_eq!(Variant::SeventyFive.column_range(4), 61..=75);
    }

    #[test]
    fn test_column_ranges_ninety() {
        assert_eq!(Variant::Ninety.column_range(0), 1..=9);
        assert_eq!(Variant::Ninety.column_range(1), 10..=19);
        assert_eq!(Variant::Ninety.column_range(7), 70..=79);
        assert_eq!(Variant::Ninety.column_range(8), 80..=90);
    }

    #[test]
    fn test_column_ranges_cover_full_range() {
        for variant in [Variant::SeventyFive, Variant::Ninety] {
            let (_, cols) = variant.dimensions();
            let (min, max) = variant.number_range();
            let mut covered: Vec<u8> =
                (0..cols).flat_map(|c| variant.column_range(c)).collect();
            covered.sort_unstable();
            let expected: Vec<u8> = (min..=max).collect();
            assert_eq!(covered, expected, "{variant} columns must tile the range");
        }
    }
}
