//! Room manager: creates, tracks, and routes operations to rooms.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use housie_hub::BroadcastHub;
use housie_protocol::RoomId;
use housie_store::Store;

use crate::room::spawn_room;
use crate::{RoomError, RoomHandle, RoomOptions};

/// Counter for generating unique room IDs.
static NEXT_ROOM_ID: AtomicU64 = AtomicU64::new(1);

/// Default command channel size for room actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Manages all active rooms.
///
/// Entry point for the server layer: it allocates room ids, spawns the
/// actor tasks, and hands out [`RoomHandle`]s. The hub and store are
/// passed in at construction (explicitly owned collaborators, not
/// globals) and every spawned room gets its own clone.
pub struct RoomManager<S: Store> {
    rooms: HashMap<RoomId, RoomHandle>,
    hub: Arc<BroadcastHub>,
    store: S,
}

impl<S: Store> RoomManager<S> {
    /// Creates an empty manager publishing through `hub` and persisting
    /// through `store`.
    pub fn new(hub: Arc<BroadcastHub>, store: S) -> Self {
        Self {
            rooms: HashMap::new(),
            hub,
            store,
        }
    }

    /// Creates a new room in the lobby and returns its ID.
    pub fn create_room(&mut self, options: RoomOptions) -> RoomId {
        let room_id = RoomId(NEXT_ROOM_ID.fetch_add(1, Ordering::Relaxed));
        let handle = spawn_room(
            room_id,
            options,
            Arc::clone(&self.hub),
            self.store.clone(),
            DEFAULT_CHANNEL_SIZE,
        );
        self.rooms.insert(room_id, handle);
        tracing::info!(%room_id, "room created");
        room_id
    }

    /// Returns a handle to a room.
    pub fn room(&self, room_id: RoomId) -> Result<RoomHandle, RoomError> {
        self.rooms
            .get(&room_id)
            .cloned()
            .ok_or(RoomError::NotFound(room_id))
    }

    /// Shuts a room down and forgets it.
    pub async fn destroy_room(&mut self, room_id: RoomId) -> Result<(), RoomError> {
        let handle = self
            .rooms
            .remove(&room_id)
            .ok_or(RoomError::NotFound(room_id))?;
        let _ = handle.shutdown().await;
        tracing::info!(%room_id, "room destroyed");
        Ok(())
    }

    /// The hub rooms publish through.
    pub fn hub(&self) -> &Arc<BroadcastHub> {
        &self.hub
    }

    /// Number of tracked rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// IDs of all tracked rooms.
    pub fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.keys().copied().collect()
    }
}
