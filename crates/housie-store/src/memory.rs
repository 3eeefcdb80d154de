//! In-memory store: the default wiring for tests and single-node runs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use housie_game::Card;
use housie_protocol::{CardId, RoomId};

use crate::records::{ClaimRecord, DrawAuditRecord, RoomRecord};
use crate::{Store, StoreError};

/// Values are kept as the JSON strings they would occupy in an external
/// key-value engine, so the serialize/deserialize edge is exercised the
/// same way it would be in production.
#[derive(Debug, Default)]
struct MemoryInner {
    rooms: HashMap<RoomId, String>,
    cards: HashMap<CardId, String>,
    claims: HashMap<RoomId, Vec<String>>,
    audits: HashMap<RoomId, String>,
}

/// A [`Store`] backed by mutexed hash maps.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn encode<T: serde::Serialize>(value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(StoreError::Encode)
}

fn decode<T: serde::de::DeserializeOwned>(json: &str) -> Result<T, StoreError> {
    serde_json::from_str(json).map_err(StoreError::Decode)
}

impl Store for MemoryStore {
    async fn save_room(&self, room: &RoomRecord) -> Result<(), StoreError> {
        let json = encode(room)?;
        self.inner
            .lock()
            .expect("store lock poisoned")
            .rooms
            .insert(room.room_id, json);
        Ok(())
    }

    async fn load_room(&self, room_id: RoomId) -> Result<Option<RoomRecord>, StoreError> {
        let json = self
            .inner
            .lock()
            .expect("store lock poisoned")
            .rooms
            .get(&room_id)
            .cloned();
        json.as_deref().map(decode).transpose()
    }

    async fn save_card(&self, card: &Card) -> Result<(), StoreError> {
        let json = encode(card)?;
        self.inner
            .lock()
            .expect("store lock poisoned")
            .cards
            .insert(card.id, json);
        Ok(())
    }

    async fn load_card(&self, card_id: CardId) -> Result<Option<Card>, StoreError> {
        let json = self
            .inner
            .lock()
            .expect("store lock poisoned")
            .cards
            .get(&card_id)
            .cloned();
        json.as_deref().map(decode).transpose()
    }

    async fn save_claim(&self, claim: &ClaimRecord) -> Result<(), StoreError> {
        let json = encode(claim)?;
        self.inner
            .lock()
            .expect("store lock poisoned")
            .claims
            .entry(claim.room_id)
            .or_default()
            .push(json);
        Ok(())
    }

    async fn load_claims(&self, room_id: RoomId) -> Result<Vec<ClaimRecord>, StoreError> {
        let jsons = self
            .inner
            .lock()
            .expect("store lock poisoned")
            .claims
            .get(&room_id)
            .cloned()
            .unwrap_or_default();
        jsons.iter().map(|j| decode(j)).collect()
    }

    async fn save_audit(&self, audit: &DrawAuditRecord) -> Result<(), StoreError> {
        let json = encode(audit)?;
        self.inner
            .lock()
            .expect("store lock poisoned")
            .audits
            .insert(audit.room_id, json);
        Ok(())
    }

    async fn load_audit(&self, room_id: RoomId) -> Result<Option<DrawAuditRecord>, StoreError> {
        let json = self
            .inner
            .lock()
            .expect("store lock poisoned")
            .audits
            .get(&room_id)
            .cloned();
        json.as_deref().map(decode).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::ClaimStatus;
    use chrono::Utc;
    use housie_game::{Pattern, RoomPhase, Variant};
    use housie_protocol::PlayerId;

    fn room(id: u64) -> RoomRecord {
        RoomRecord {
            room_id: RoomId(id),
            variant: Variant::Ninety,
            number_range_min: 1,
            number_range_max: 90,
            cards_per_player: 1,
            pattern: Pattern::new("one_line", Variant::Ninety),
            state: RoomPhase::Lobby,
            called_numbers: vec![],
            draw_pool: (1..=90).collect(),
            winners: vec![],
            draw_interval: 5,
            auto_draw: false,
            seed: 17,
        }
    }

    #[tokio::test]
    async fn test_room_save_load_read_your_writes() {
        let store = MemoryStore::new();
        let mut record = room(1);
        store.save_room(&record).await.unwrap();

        record.state = RoomPhase::Running;
        record.called_numbers.push(42);
        record.draw_pool.retain(|n| *n != 42);
        store.save_room(&record).await.unwrap();

        let loaded = store.load_room(RoomId(1)).await.unwrap().unwrap();
        assert_eq!(loaded, record);
    }

    #[tokio::test]
    async fn test_load_missing_room_is_none() {
        let store = MemoryStore::new();
        assert!(store.load_room(RoomId(404)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_card_round_trip() {
        let store = MemoryStore::new();
        let card = Card::generate(CardId(7), RoomId(1), PlayerId(2), Variant::SeventyFive);
        store.save_card(&card).await.unwrap();

        let loaded = store.load_card(CardId(7)).await.unwrap().unwrap();
        assert_eq!(loaded, card);
    }

    #[tokio::test]
    async fn test_claims_append_in_order() {
        let store = MemoryStore::new();
        for (i, status) in [ClaimStatus::Rejected, ClaimStatus::Accepted]
            .into_iter()
            .enumerate()
        {
            store
                .save_claim(&ClaimRecord {
                    room_id: RoomId(1),
                    player_id: PlayerId(i as u64),
                    card_id: CardId(i as u64),
                    claimed_pattern: "one_line".into(),
                    status,
                    verification_message: String::new(),
                    created_at: Utc::now(),
                    verified_at: None,
                })
                .await
                .unwrap();
        }

        let claims = store.load_claims(RoomId(1)).await.unwrap();
        assert_eq!(claims.len(), 2);
        assert_eq!(claims[0].status, ClaimStatus::Rejected);
        assert_eq!(claims[1].status, ClaimStatus::Accepted);
        assert!(store.load_claims(RoomId(2)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_audit_round_trip() {
        let store = MemoryStore::new();
        let audit = DrawAuditRecord {
            room_id: RoomId(1),
            seed: 99,
            entries: vec![],
            digest: "00".repeat(32),
        };
        store.save_audit(&audit).await.unwrap();
        let loaded = store.load_audit(RoomId(1)).await.unwrap().unwrap();
        assert_eq!(loaded, audit);
    }
}
