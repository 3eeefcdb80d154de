//! Unified error type for the Housie server.

use housie_protocol::ProtocolError;
use housie_room::RoomError;
use housie_store::StoreError;
use housie_transport::TransportError;

/// Top-level error wrapping the layer-specific errors.
///
/// Embedders of the `housie` facade deal with this single type; the
/// `#[from]` impls let `?` convert sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum HousieError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room-level error (preconditions, routing).
    #[error(transparent)]
    Room(#[from] RoomError),

    /// A persistence-level error.
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use housie_protocol::RoomId;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ConnectionClosed("gone".into());
        let housie_err: HousieError = err.into();
        assert!(matches!(housie_err, HousieError::Transport(_)));
        assert!(housie_err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidMessage("bad".into());
        let housie_err: HousieError = err.into();
        assert!(matches!(housie_err, HousieError::Protocol(_)));
    }

    #[test]
    fn test_from_room_error() {
        let err = RoomError::NotFound(RoomId(1));
        let housie_err: HousieError = err.into();
        assert!(matches!(housie_err, HousieError::Room(_)));
        assert!(housie_err.to_string().contains("R-1"));
    }

    #[test]
    fn test_from_store_error() {
        let err = StoreError::Unavailable("redis down".into());
        let housie_err: HousieError = err.into();
        assert!(matches!(housie_err, HousieError::Store(_)));
    }
}
