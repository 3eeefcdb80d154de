//! Per-room event fan-out.
//!
//! The [`BroadcastHub`] tracks, per room, the set of live listeners and
//! delivers every published [`RoomEvent`] to all of them. It is an
//! explicitly owned registry, constructed once and handed (behind an
//! `Arc`) to the room layer and the connection handlers, never ambient
//! global state.
//!
//! Delivery is best-effort: a listener whose channel has closed is
//! treated as dead and dropped from the set on the spot. Sends are
//! unbounded-channel pushes, so one slow or dead listener can never
//! block another listener or the publishing room's own mutation path.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;

use housie_protocol::{RoomEvent, RoomId};

/// Counter for generating unique listener IDs.
static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies one subscription. Returned by [`BroadcastHub::subscribe`]
/// and used to unsubscribe the same listener later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "L-{}", self.0)
    }
}

/// The sending half a listener registers with the hub. The receiving
/// half typically feeds a connection's outbound pump.
pub type EventSender = mpsc::UnboundedSender<RoomEvent>;

/// Fan-out registry: room → set of live listeners.
///
/// All methods are `&self` and safe under concurrent access from room
/// actors and request handlers. The inner mutex is only ever held for
/// map bookkeeping, never across an await point (publishing is a
/// non-blocking unbounded send).
#[derive(Debug, Default)]
pub struct BroadcastHub {
    rooms: Mutex<HashMap<RoomId, HashMap<ListenerId, EventSender>>>,
}

impl BroadcastHub {
    /// Creates an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener for a room's events and returns its id.
    ///
    /// Idempotent per channel: subscribing the same sending half twice
    /// returns the existing id instead of registering a duplicate.
    pub fn subscribe(&self, room_id: RoomId, sender: EventSender) -> ListenerId {
        let mut rooms = self.rooms.lock().expect("hub lock poisoned");
        let listeners = rooms.entry(room_id).or_default();

        if let Some((existing, _)) = listeners
            .iter()
            .find(|(_, registered)| registered.same_channel(&sender))
        {
            return *existing;
        }

        let id = ListenerId(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed));
        listeners.insert(id, sender);
        tracing::debug!(%room_id, listener = %id, "listener subscribed");
        id
    }

    /// Removes a listener. Idempotent: unknown ids and rooms are a
    /// no-op. Removing the last listener releases the room's entry.
    pub fn unsubscribe(&self, room_id: RoomId, listener: ListenerId) {
        let mut rooms = self.rooms.lock().expect("hub lock poisoned");
        if let Some(listeners) = rooms.get_mut(&room_id) {
            if listeners.remove(&listener).is_some() {
                tracing::debug!(%room_id, %listener, "listener unsubscribed");
            }
            if listeners.is_empty() {
                rooms.remove(&room_id);
            }
        }
    }

    /// Delivers `event` to every current subscriber of the room.
    ///
    /// Listeners whose channel has closed are dropped from the set:
    /// no retry, no error to the publisher. Returns how many listeners
    /// the event reached.
    pub fn publish(&self, room_id: RoomId, event: &RoomEvent) -> usize {
        let mut rooms = self.rooms.lock().expect("hub lock poisoned");
        let Some(listeners) = rooms.get_mut(&room_id) else {
            return 0;
        };

        let before = listeners.len();
        listeners.retain(|id, sender| {
            let alive = sender.send(event.clone()).is_ok();
            if !alive {
                tracing::debug!(%room_id, listener = %id, "dropping dead listener");
            }
            alive
        });
        let delivered = listeners.len();

        if listeners.is_empty() {
            rooms.remove(&room_id);
        }
        if delivered < before {
            tracing::debug!(
                %room_id,
                dropped = before - delivered,
                "pruned dead listeners during publish"
            );
        }
        delivered
    }

    /// Number of live subscribers for a room.
    pub fn subscriber_count(&self, room_id: RoomId) -> usize {
        self.rooms
            .lock()
            .expect("hub lock poisoned")
            .get(&room_id)
            .map_or(0, HashMap::len)
    }

    /// Number of rooms with at least one subscriber.
    pub fn room_count(&self) -> usize {
        self.rooms.lock().expect("hub lock poisoned").len()
    }
}
