//! Room lifecycle state machine.

use serde::{Deserialize, Serialize};

use std::fmt;

/// The lifecycle phase of a room.
///
/// Transitions are strictly ordered and never reverse:
///
/// ```text
/// Lobby → Running → Finished
/// ```
///
/// - **Lobby**: room exists, players may join and receive cards.
/// - **Running**: numbers are being drawn, claims are accepted.
/// - **Finished**: a claim was accepted (or an operator ended the game).
///   Terminal: no further draws, joins, or marks.
///
/// Serialized lowercase (`"lobby"` / `"running"` / `"finished"`), the
/// form persisted room records use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomPhase {
    Lobby,
    Running,
    Finished,
}

impl RoomPhase {
    /// Returns `true` if the room is accepting new players.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Lobby)
    }

    /// Returns `true` if the game is actively running.
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// The next phase in the strict ordering, or `None` from the
    /// terminal phase.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Lobby => Some(Self::Running),
            Self::Running => Some(Self::Finished),
            Self::Finished => None,
        }
    }

    /// Returns `true` if transitioning to `target` is legal.
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }
}

impl fmt::Display for RoomPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lobby => write!(f, "lobby"),
            Self::Running => write!(f, "running"),
            Self::Finished => write!(f, "finished"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_next_follows_strict_order() {
        assert_eq!(RoomPhase::Lobby.next(), Some(RoomPhase::Running));
        assert_eq!(RoomPhase::Running.next(), Some(RoomPhase::Finished));
        assert_eq!(RoomPhase::Finished.next(), None);
    }

    #[test]
    fn test_phase_cannot_skip_or_reverse() {
        assert!(RoomPhase::Lobby.can_transition_to(RoomPhase::Running));
        assert!(!RoomPhase::Lobby.can_transition_to(RoomPhase::Finished));
        assert!(!RoomPhase::Running.can_transition_to(RoomPhase::Lobby));
        assert!(!RoomPhase::Finished.can_transition_to(RoomPhase::Running));
    }

    #[test]
    fn test_phase_predicates() {
        assert!(RoomPhase::Lobby.is_joinable());
        assert!(!RoomPhase::Running.is_joinable());
        assert!(RoomPhase::Running.is_running());
        assert!(!RoomPhase::Finished.is_running());
    }

    #[test]
    fn test_phase_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&RoomPhase::Lobby).unwrap(), "\"lobby\"");
        let p: RoomPhase = serde_json::from_str("\"finished\"").unwrap();
        assert_eq!(p, RoomPhase::Finished);
    }
}
