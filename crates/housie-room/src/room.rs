//! Room actor: an isolated Tokio task that owns one bingo session.
//!
//! The actor is the serialization point the consistency guarantees hang
//! off: commands arrive one at a time on an mpsc channel, and the
//! auto-draw timer fires in the same `select!` loop, so a timed draw
//! can never interleave with a claim half-way through. A claim that is
//! accepted flips the room to finished *within the same actor turn*,
//! which is what makes "first valid claim wins" strict: every claim
//! processed afterwards observes the finished phase and is rejected.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, oneshot};

use housie_game::{Card, ClaimVerdict, DrawAudit, DrawPool, RoomPhase, pattern};
use housie_hub::BroadcastHub;
use housie_protocol::{CardId, PlayerId, RoomEvent, RoomId};
use housie_store::{
    ClaimRecord, ClaimStatus, DrawAuditRecord, RoomRecord, Store, StoreError, Winner,
};
use housie_tick::DrawScheduler;

use crate::{RoomError, RoomOptions};

/// Counter for card ids, unique across all rooms in the process.
static NEXT_CARD_ID: AtomicU64 = AtomicU64::new(1);

/// The result of a draw operation.
///
/// Exhaustion is a normal outcome, not an error: the room stays running
/// until a claim resolves it or an operator shuts it down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOutcome {
    /// A number was drawn; `sequence` is its 1-based call index.
    Drawn { number: u8, sequence: u32 },
    /// The pool is empty: "no more numbers".
    Exhausted,
}

/// A consistent point-in-time view of a room, taken inside the actor.
#[derive(Debug, Clone)]
pub struct RoomSnapshot {
    pub room_id: RoomId,
    pub phase: RoomPhase,
    pub players: usize,
    pub cards: usize,
    pub called_numbers: Vec<u8>,
    pub draw_pool: Vec<u8>,
    pub winners: Vec<Winner>,
    /// Whether the auto-draw timer is currently armed.
    pub auto_draw_armed: bool,
}

/// Commands sent to a room actor through its channel. Each carries a
/// oneshot reply the caller awaits.
enum RoomCommand {
    Join {
        player: PlayerId,
        reply: oneshot::Sender<Result<Vec<Card>, RoomError>>,
    },
    Start {
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    Draw {
        reply: oneshot::Sender<Result<DrawOutcome, RoomError>>,
    },
    Claim {
        player: PlayerId,
        card: CardId,
        reply: oneshot::Sender<Result<ClaimVerdict, RoomError>>,
    },
    Mark {
        player: PlayerId,
        card: CardId,
        number: u8,
        marked: bool,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    Snapshot {
        reply: oneshot::Sender<RoomSnapshot>,
    },
    Shutdown,
}

/// Handle to a running room actor. Cheap to clone (it wraps an
/// `mpsc::Sender`). The [`RoomManager`](crate::RoomManager) holds one
/// per room.
#[derive(Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// The room this handle points at.
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> RoomCommand,
    ) -> Result<T, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(make(reply_tx))
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }

    /// Adds a player (lobby only) and returns their freshly dealt cards.
    pub async fn join(&self, player: PlayerId) -> Result<Vec<Card>, RoomError> {
        self.request(|reply| RoomCommand::Join { player, reply }).await?
    }

    /// Starts the game (lobby only).
    pub async fn start(&self) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::Start { reply }).await?
    }

    /// Draws the next number (running only).
    pub async fn draw(&self) -> Result<DrawOutcome, RoomError> {
        self.request(|reply| RoomCommand::Draw { reply }).await?
    }

    /// Submits a claim for verification (running only).
    pub async fn claim(&self, player: PlayerId, card: CardId) -> Result<ClaimVerdict, RoomError> {
        self.request(|reply| RoomCommand::Claim { player, card, reply }).await?
    }

    /// Marks or unmarks a number on one of the player's cards
    /// (running only; the core never auto-marks).
    pub async fn mark(
        &self,
        player: PlayerId,
        card: CardId,
        number: u8,
        marked: bool,
    ) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::Mark {
            player,
            card,
            number,
            marked,
            reply,
        })
        .await?
    }

    /// Takes a consistent snapshot of the room.
    pub async fn snapshot(&self) -> Result<RoomSnapshot, RoomError> {
        self.request(|reply| RoomCommand::Snapshot { reply }).await
    }

    /// Tells the room actor to stop.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor<S: Store> {
    room_id: RoomId,
    options: RoomOptions,
    phase: RoomPhase,
    pool: DrawPool,
    called_numbers: Vec<u8>,
    audit: DrawAudit,
    players: HashSet<PlayerId>,
    cards: HashMap<CardId, Card>,
    winners: Vec<Winner>,
    hub: Arc<BroadcastHub>,
    store: S,
}

impl<S: Store> RoomActor<S> {
    /// Runs the actor loop: commands and the auto-draw timer, until
    /// shutdown or the last handle is dropped.
    async fn run(mut self, mut receiver: mpsc::Receiver<RoomCommand>) {
        // A zero interval would busy-spin the timer; clamp to one second.
        let interval = Duration::from_secs(self.options.draw_interval.max(1));
        let mut scheduler = DrawScheduler::new(interval);

        tracing::info!(
            room_id = %self.room_id,
            variant = %self.options.variant,
            pattern = %self.options.pattern.id,
            seed = self.pool.seed(),
            "room actor started"
        );
        self.persist_state_logged().await;
        self.persist_audit_logged().await;

        loop {
            tokio::select! {
                cmd = receiver.recv() => match cmd {
                    Some(RoomCommand::Shutdown) | None => {
                        tracing::info!(room_id = %self.room_id, "room shutting down");
                        break;
                    }
                    Some(cmd) => self.handle_command(cmd, &mut scheduler).await,
                },
                _ = scheduler.wait_for_draw() => {
                    self.handle_auto_draw(&mut scheduler).await;
                }
            }
        }

        tracing::info!(room_id = %self.room_id, "room actor stopped");
    }

    async fn handle_command(&mut self, cmd: RoomCommand, scheduler: &mut DrawScheduler) {
        match cmd {
            RoomCommand::Join { player, reply } => {
                let _ = reply.send(self.handle_join(player).await);
            }
            RoomCommand::Start { reply } => {
                let result = self.handle_start().await;
                if result.is_ok() && self.options.auto_draw {
                    scheduler.arm();
                }
                let _ = reply.send(result);
            }
            RoomCommand::Draw { reply } => {
                let result = self.handle_draw().await;
                if let Ok(DrawOutcome::Exhausted) = result {
                    scheduler.disarm();
                }
                let _ = reply.send(result);
            }
            RoomCommand::Claim { player, card, reply } => {
                let result = self.handle_claim(player, card).await;
                if matches!(&result, Ok(verdict) if verdict.valid) {
                    scheduler.disarm();
                }
                let _ = reply.send(result);
            }
            RoomCommand::Mark {
                player,
                card,
                number,
                marked,
                reply,
            } => {
                let _ = reply.send(self.handle_mark(player, card, number, marked).await);
            }
            RoomCommand::Snapshot { reply } => {
                let _ = reply.send(self.snapshot(scheduler.is_armed()));
            }
            // Matched by the run loop before dispatch.
            RoomCommand::Shutdown => {}
        }
    }

    /// One auto-draw timer tick. The timer observes the room's state
    /// here and disarms itself the moment the room is no longer
    /// running, the pool runs dry, or persistence fails. The loop
    /// terminates instead of erroring forever.
    async fn handle_auto_draw(&mut self, scheduler: &mut DrawScheduler) {
        if !self.phase.is_running() {
            tracing::debug!(room_id = %self.room_id, phase = %self.phase, "room no longer running, auto-draw stopping");
            scheduler.disarm();
            return;
        }

        match self.perform_draw() {
            DrawOutcome::Drawn { .. } => {
                if let Err(error) = self.persist_draw().await {
                    tracing::error!(
                        room_id = %self.room_id,
                        %error,
                        "persistence failed during auto-draw, stopping the loop for this room"
                    );
                    scheduler.disarm();
                }
            }
            DrawOutcome::Exhausted => {
                tracing::info!(room_id = %self.room_id, "draw pool exhausted, auto-draw stopping");
                scheduler.disarm();
            }
        }
    }

    async fn handle_join(&mut self, player: PlayerId) -> Result<Vec<Card>, RoomError> {
        if !self.phase.is_joinable() {
            return Err(RoomError::NotJoinable(self.room_id));
        }

        let cards: Vec<Card> = (0..self.options.cards_per_player)
            .map(|_| {
                let id = CardId(NEXT_CARD_ID.fetch_add(1, Ordering::Relaxed));
                Card::generate(id, self.room_id, player, self.options.variant)
            })
            .collect();

        for card in &cards {
            self.cards.insert(card.id, card.clone());
            if let Err(error) = self.store.save_card(card).await {
                tracing::warn!(room_id = %self.room_id, card_id = %card.id, %error, "failed to persist card");
            }
        }
        self.players.insert(player);
        self.persist_state_logged().await;

        tracing::info!(
            room_id = %self.room_id,
            %player,
            cards = cards.len(),
            players = self.players.len(),
            "player joined"
        );
        self.hub
            .publish(self.room_id, &RoomEvent::PlayerJoined { player_id: player });

        Ok(cards)
    }

    async fn handle_start(&mut self) -> Result<(), RoomError> {
        if !self.phase.can_transition_to(RoomPhase::Running) {
            return Err(RoomError::AlreadyStarted(self.room_id));
        }

        self.phase = RoomPhase::Running;
        self.persist_state_logged().await;

        tracing::info!(
            room_id = %self.room_id,
            players = self.players.len(),
            auto_draw = self.options.auto_draw,
            "game started"
        );
        self.hub.publish(
            self.room_id,
            &RoomEvent::GameStarted {
                room_id: self.room_id,
            },
        );
        Ok(())
    }

    async fn handle_draw(&mut self) -> Result<DrawOutcome, RoomError> {
        if !self.phase.is_running() {
            return Err(RoomError::NotActive(self.room_id));
        }

        let outcome = self.perform_draw();
        if let DrawOutcome::Drawn { .. } = outcome {
            if let Err(error) = self.persist_draw().await {
                tracing::warn!(room_id = %self.room_id, %error, "failed to persist draw");
            }
        }
        Ok(outcome)
    }

    /// Pops the next number, appends it to the call history and audit,
    /// and announces it. The caller has already checked the phase.
    fn perform_draw(&mut self) -> DrawOutcome {
        let Some(number) = self.pool.draw_next() else {
            return DrawOutcome::Exhausted;
        };

        self.called_numbers.push(number);
        let sequence = self.audit.record(number);
        tracing::debug!(
            room_id = %self.room_id,
            number,
            sequence,
            remaining = self.pool.len(),
            "number drawn"
        );
        self.hub
            .publish(self.room_id, &RoomEvent::NumberDrawn { number, sequence });

        DrawOutcome::Drawn { number, sequence }
    }

    async fn handle_claim(
        &mut self,
        player: PlayerId,
        card_id: CardId,
    ) -> Result<ClaimVerdict, RoomError> {
        if !self.phase.is_running() {
            return Err(RoomError::NotActive(self.room_id));
        }
        let Some(card) = self.cards.get(&card_id) else {
            return Err(RoomError::UnknownCard(card_id, self.room_id));
        };
        if card.owner_id != player {
            return Err(RoomError::NotCardOwner(card_id, player));
        }

        // Claims are judged against the room's declared pattern; the
        // claimant doesn't get to pick an easier one.
        let pattern = self.options.pattern.clone();
        let verdict = pattern::verify_claim(
            &card.grid,
            &self.called_numbers,
            &pattern.id,
            pattern.variant,
        );

        let now = Utc::now();
        let record = ClaimRecord {
            room_id: self.room_id,
            player_id: player,
            card_id,
            claimed_pattern: pattern.id,
            status: if verdict.valid {
                ClaimStatus::Accepted
            } else {
                ClaimStatus::Rejected
            },
            verification_message: verdict.message.clone(),
            created_at: now,
            verified_at: verdict.valid.then_some(now),
        };
        if let Err(error) = self.store.save_claim(&record).await {
            tracing::warn!(room_id = %self.room_id, %error, "failed to persist claim record");
        }

        if verdict.valid {
            self.winners.push(Winner {
                player_id: player,
                card_id,
                timestamp: now,
            });
            self.phase = RoomPhase::Finished;
            self.persist_state_logged().await;
            tracing::info!(
                room_id = %self.room_id,
                %player,
                card = %card_id,
                "claim accepted, game finished"
            );
        } else {
            tracing::info!(
                room_id = %self.room_id,
                %player,
                card = %card_id,
                reason = %verdict.message,
                "claim rejected"
            );
        }

        self.hub.publish(
            self.room_id,
            &RoomEvent::ClaimResult {
                player_id: player,
                valid: verdict.valid,
                message: verdict.message.clone(),
            },
        );

        Ok(verdict)
    }

    async fn handle_mark(
        &mut self,
        player: PlayerId,
        card_id: CardId,
        number: u8,
        marked: bool,
    ) -> Result<(), RoomError> {
        if !self.phase.is_running() {
            return Err(RoomError::NotActive(self.room_id));
        }
        let Some(card) = self.cards.get_mut(&card_id) else {
            return Err(RoomError::UnknownCard(card_id, self.room_id));
        };
        if card.owner_id != player {
            return Err(RoomError::NotCardOwner(card_id, player));
        }
        if !card.grid.mark_value(number, marked) {
            return Err(RoomError::NumberNotOnCard(number, card_id));
        }

        if let Err(error) = self.store.save_card(card).await {
            tracing::warn!(room_id = %self.room_id, card_id = %card_id, %error, "failed to persist card marks");
        }
        Ok(())
    }

    fn snapshot(&self, auto_draw_armed: bool) -> RoomSnapshot {
        RoomSnapshot {
            room_id: self.room_id,
            phase: self.phase,
            players: self.players.len(),
            cards: self.cards.len(),
            called_numbers: self.called_numbers.clone(),
            draw_pool: self.pool.remaining().to_vec(),
            winners: self.winners.clone(),
            auto_draw_armed,
        }
    }

    fn room_record(&self) -> RoomRecord {
        RoomRecord {
            room_id: self.room_id,
            variant: self.options.variant,
            number_range_min: self.options.number_range_min,
            number_range_max: self.options.number_range_max,
            cards_per_player: self.options.cards_per_player,
            pattern: self.options.pattern.clone(),
            state: self.phase,
            called_numbers: self.called_numbers.clone(),
            draw_pool: self.pool.remaining().to_vec(),
            winners: self.winners.clone(),
            draw_interval: self.options.draw_interval,
            auto_draw: self.options.auto_draw,
            seed: self.pool.seed(),
        }
    }

    fn audit_record(&self) -> DrawAuditRecord {
        DrawAuditRecord {
            room_id: self.room_id,
            seed: self.audit.seed(),
            entries: self.audit.entries().to_vec(),
            digest: self.audit.digest(),
        }
    }

    /// Persists the room and audit after a draw. Unlike the logged
    /// variants, failures propagate so the auto-draw loop can stop.
    async fn persist_draw(&self) -> Result<(), StoreError> {
        self.store.save_room(&self.room_record()).await?;
        self.store.save_audit(&self.audit_record()).await
    }

    /// Persists the room record; a failure is logged, never fatal.
    /// In-memory state stays authoritative while the actor lives.
    async fn persist_state_logged(&self) {
        if let Err(error) = self.store.save_room(&self.room_record()).await {
            tracing::warn!(room_id = %self.room_id, %error, "failed to persist room state");
        }
    }

    async fn persist_audit_logged(&self) {
        if let Err(error) = self.store.save_audit(&self.audit_record()).await {
            tracing::warn!(room_id = %self.room_id, %error, "failed to persist draw audit");
        }
    }
}

/// Spawns a new room actor task and returns a handle to it.
///
/// The room starts in the lobby with a freshly seeded, shuffled pool
/// and empty history. `channel_size` bounds the command channel.
pub(crate) fn spawn_room<S: Store>(
    room_id: RoomId,
    options: RoomOptions,
    hub: Arc<BroadcastHub>,
    store: S,
    channel_size: usize,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(channel_size);

    let pool = DrawPool::initialize(options.number_range_min, options.number_range_max, None);
    let audit = DrawAudit::new(pool.seed());

    let actor = RoomActor {
        room_id,
        options,
        phase: RoomPhase::Lobby,
        pool,
        called_numbers: Vec::new(),
        audit,
        players: HashSet::new(),
        cards: HashMap::new(),
        winners: Vec::new(),
        hub,
        store,
    };

    tokio::spawn(actor.run(rx));

    RoomHandle {
        room_id,
        sender: tx,
    }
}
