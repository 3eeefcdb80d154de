//! Per-room configuration.

use housie_game::{Pattern, Variant};

/// Settings a room is created with. Fixed for the room's lifetime.
#[derive(Debug, Clone)]
pub struct RoomOptions {
    /// The ruleset (75-ball or 90-ball).
    pub variant: Variant,

    /// Inclusive draw range. Defaults to the variant's full range.
    pub number_range_min: u8,
    pub number_range_max: u8,

    /// How many cards each joining player receives.
    pub cards_per_player: u32,

    /// The declared win condition claims are verified against.
    pub pattern: Pattern,

    /// Whether the room draws numbers on a timer once started.
    pub auto_draw: bool,

    /// Seconds between automatic draws.
    pub draw_interval: u64,
}

impl RoomOptions {
    /// Options for a variant with its full number range and the given
    /// winning pattern; one card per player, auto-draw every 5 seconds.
    pub fn for_variant(variant: Variant, pattern_id: impl Into<String>) -> Self {
        let (number_range_min, number_range_max) = variant.number_range();
        Self {
            variant,
            number_range_min,
            number_range_max,
            cards_per_player: 1,
            pattern: Pattern::new(pattern_id, variant),
            auto_draw: true,
            draw_interval: 5,
        }
    }
}

impl Default for RoomOptions {
    fn default() -> Self {
        Self::for_variant(Variant::SeventyFive, "horizontal_line")
    }
}
