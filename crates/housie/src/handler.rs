//! Per-connection handler: identification, command routing, event pump.
//!
//! Each accepted connection gets its own Tokio task running this
//! handler. The flow:
//!
//! 1. Receive `hello` → the connection is bound to a player id.
//! 2. Spawn the event pump: a task forwarding hub events for every
//!    room this connection subscribes to.
//! 3. Loop: receive commands → dispatch to the room layer → reply.
//!
//! The connection's hub subscriptions are released when the handler
//! exits, so a finished room's fan-out entry drains once its players
//! disconnect.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use housie_game::Variant;
use housie_hub::ListenerId;
use housie_protocol::{Codec, PlayerId, ProtocolError, RoomId};
use housie_room::{DrawOutcome, RoomHandle, RoomOptions};
use housie_store::Store;
use housie_transport::{Connection, WebSocketConnection};

use crate::server::ServerState;
use crate::wire::{ClientCommand, ServerReply};
use crate::HousieError;

/// How long a fresh connection gets to say `hello`.
const HELLO_TIMEOUT: Duration = Duration::from_secs(10);

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<S: Store>(
    conn: WebSocketConnection,
    state: Arc<ServerState<S>>,
) -> Result<(), HousieError> {
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    // --- Step 1: identification ---
    let player_id = expect_hello(&conn, &state).await?;
    send_reply(&conn, &state, &ServerReply::Welcome { player_id }).await?;
    tracing::info!(%conn_id, %player_id, "player identified");

    // --- Step 2: event pump ---
    // Hub events for subscribed rooms flow through this channel onto
    // the socket, interleaved with command replies. The connection is
    // cloneable (shared stream), so the pump owns its own handle.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let pump_conn = conn.clone();
    let pump_codec = state.codec;
    let pump = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            let text = match pump_codec.encode(&event) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to encode room event");
                    continue;
                }
            };
            if pump_conn.send(&text).await.is_err() {
                break;
            }
        }
    });

    // --- Step 3: command loop ---
    let mut subscriptions: Vec<(RoomId, ListenerId)> = Vec::new();
    let result = command_loop(&conn, &state, player_id, &event_tx, &mut subscriptions).await;

    // Cleanup: release hub subscriptions so the room's fan-out entry
    // can drain, then stop the pump.
    for (room_id, listener) in subscriptions {
        state.hub.unsubscribe(room_id, listener);
    }
    pump.abort();
    tracing::debug!(%conn_id, %player_id, "connection closed");

    result
}

/// Waits for the `hello` command that binds the connection to a player.
async fn expect_hello<S: Store>(
    conn: &WebSocketConnection,
    state: &Arc<ServerState<S>>,
) -> Result<PlayerId, HousieError> {
    let frame = match tokio::time::timeout(HELLO_TIMEOUT, conn.recv()).await {
        Ok(Ok(Some(frame))) => frame,
        Ok(Ok(None)) => {
            return Err(ProtocolError::InvalidMessage("connection closed before hello".into()).into());
        }
        Ok(Err(e)) => return Err(e.into()),
        Err(_) => {
            return Err(ProtocolError::InvalidMessage("hello timed out".into()).into());
        }
    };

    match state.codec.decode(&frame) {
        Ok(ClientCommand::Hello { player_id }) => Ok(player_id),
        Ok(_) => {
            send_reply(
                conn,
                state,
                &ServerReply::Error {
                    message: "first command must be hello".into(),
                },
            )
            .await?;
            Err(ProtocolError::InvalidMessage("first command must be hello".into()).into())
        }
        Err(e) => Err(e.into()),
    }
}

async fn command_loop<S: Store>(
    conn: &WebSocketConnection,
    state: &Arc<ServerState<S>>,
    player_id: PlayerId,
    event_tx: &housie_hub::EventSender,
    subscriptions: &mut Vec<(RoomId, ListenerId)>,
) -> Result<(), HousieError> {
    loop {
        let frame = match conn.recv().await {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                tracing::info!(%player_id, "connection closed cleanly");
                return Ok(());
            }
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "recv error");
                return Ok(());
            }
        };

        let command: ClientCommand = match state.codec.decode(&frame) {
            Ok(command) => command,
            Err(e) => {
                send_error(conn, state, format!("invalid command: {e}")).await?;
                continue;
            }
        };

        match command {
            ClientCommand::Hello { .. } => {
                send_error(conn, state, "already identified".into()).await?;
            }

            ClientCommand::Ping => {
                send_reply(conn, state, &ServerReply::Pong).await?;
            }

            ClientCommand::CreateRoom {
                variant,
                cards_per_player,
                pattern,
                auto_draw,
                draw_interval,
            } => {
                let variant = Variant::from_token(&variant);
                let mut options = RoomOptions::for_variant(variant, pattern);
                options.cards_per_player = cards_per_player;
                options.auto_draw = auto_draw;
                options.draw_interval = draw_interval;

                // Lock only for the creation, drop before network I/O.
                let room_id = { state.rooms.lock().await.create_room(options) };
                send_reply(conn, state, &ServerReply::RoomCreated { room_id }).await?;
            }

            ClientCommand::JoinRoom { room_id } => {
                match room(state, room_id).await {
                    Ok(handle) => match handle.join(player_id).await {
                        Ok(cards) => {
                            let listener = state.hub.subscribe(room_id, event_tx.clone());
                            subscriptions.push((room_id, listener));
                            send_reply(conn, state, &ServerReply::Joined { room_id, cards })
                                .await?;
                        }
                        Err(e) => send_error(conn, state, e.to_string()).await?,
                    },
                    Err(e) => send_error(conn, state, e.to_string()).await?,
                }
            }

            ClientCommand::StartGame { room_id } => {
                match room_op(state, room_id, |h| async move { h.start().await }).await {
                    Ok(()) => send_reply(conn, state, &ServerReply::Started { room_id }).await?,
                    Err(e) => send_error(conn, state, e.to_string()).await?,
                }
            }

            ClientCommand::DrawNumber { room_id } => {
                match room_op(state, room_id, |h| async move { h.draw().await }).await {
                    Ok(DrawOutcome::Drawn { number, sequence }) => {
                        send_reply(conn, state, &ServerReply::Drawn { number, sequence }).await?;
                    }
                    Ok(DrawOutcome::Exhausted) => {
                        send_reply(conn, state, &ServerReply::NoMoreNumbers).await?;
                    }
                    Err(e) => send_error(conn, state, e.to_string()).await?,
                }
            }

            ClientCommand::ClaimBingo { room_id, card_id } => {
                let op = |h: RoomHandle| async move { h.claim(player_id, card_id).await };
                match room_op(state, room_id, op).await {
                    Ok(verdict) => {
                        send_reply(
                            conn,
                            state,
                            &ServerReply::ClaimChecked {
                                valid: verdict.valid,
                                message: verdict.message,
                            },
                        )
                        .await?;
                    }
                    Err(e) => send_error(conn, state, e.to_string()).await?,
                }
            }

            ClientCommand::MarkCell {
                room_id,
                card_id,
                number,
                marked,
            } => {
                let op =
                    |h: RoomHandle| async move { h.mark(player_id, card_id, number, marked).await };
                match room_op(state, room_id, op).await {
                    Ok(()) => send_reply(conn, state, &ServerReply::Marked).await?,
                    Err(e) => send_error(conn, state, e.to_string()).await?,
                }
            }
        }
    }
}

/// Looks up a room handle, holding the manager lock only for the lookup.
async fn room<S: Store>(
    state: &Arc<ServerState<S>>,
    room_id: RoomId,
) -> Result<RoomHandle, housie_room::RoomError> {
    state.rooms.lock().await.room(room_id)
}

/// Looks up a room and runs one operation on it.
async fn room_op<S, F, Fut, T>(
    state: &Arc<ServerState<S>>,
    room_id: RoomId,
    op: F,
) -> Result<T, housie_room::RoomError>
where
    S: Store,
    F: FnOnce(RoomHandle) -> Fut,
    Fut: Future<Output = Result<T, housie_room::RoomError>>,
{
    let handle = room(state, room_id).await?;
    op(handle).await
}

async fn send_reply<S: Store>(
    conn: &WebSocketConnection,
    state: &Arc<ServerState<S>>,
    reply: &ServerReply,
) -> Result<(), HousieError> {
    let text = state.codec.encode(reply)?;
    conn.send(&text).await?;
    Ok(())
}

async fn send_error<S: Store>(
    conn: &WebSocketConnection,
    state: &Arc<ServerState<S>>,
    message: String,
) -> Result<(), HousieError> {
    send_reply(conn, state, &ServerReply::Error { message }).await
}
