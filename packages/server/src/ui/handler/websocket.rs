//! WebSocket connection handlers.
//!
//! The transport layer owns the full wire format: it decodes client frames
//! into [`ClientEvent`]s, builds the outbound [`ServerEvent`] frames, and
//! hands pre-encoded strings to the use cases. Malformed frames and routing
//! failures are logged and dropped without closing the connection.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde_json::json;
use tokio::sync::mpsc;

use crate::{
    domain::{ChatMessage, ConnectionId, DisplayName, RoomId, Timestamp, UserId},
    infrastructure::dto::websocket::{
        AnswerForwardDto, CaptionDto, ChatMessageDto, ClientEvent, IceCandidateForwardDto,
        MediaStateDto, OfferForwardDto, ParticipantDto, ServerEvent, SignLanguageDto, UserLeftDto,
    },
    ui::state::AppState,
};
use hiroba_shared::time::now_millis;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    // The server assigns connection ids; clients learn theirs from peers'
    // `user-joined` / forwarded signaling frames.
    let connection_id = ConnectionId::generate();

    ws.on_upgrade(move |socket| handle_socket(socket, state, connection_id))
}

/// Spawns a task that drains the connection's delivery channel into the
/// WebSocket sender. Fan-out happens on the senders' tasks; this task is the
/// only writer to the socket.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, connection_id: ConnectionId) {
    let (sender, mut receiver) = socket.split();

    // Register the delivery channel and the ledger entry before any frame
    // from this client can be processed.
    let (tx, rx) = mpsc::unbounded_channel();
    state
        .message_pusher
        .register_client(connection_id.clone(), tx)
        .await;
    state.registry.register(connection_id.clone()).await;
    tracing::info!("Connection '{}' established", connection_id);

    let mut send_task = pusher_loop(rx, sender);

    let state_clone = state.clone();
    let connection_id_clone = connection_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!("WebSocket error on '{}': {}", connection_id_clone, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(event) => {
                            dispatch(&state_clone, &connection_id_clone, event).await;
                        }
                        Err(e) => {
                            tracing::warn!(
                                "Dropping malformed frame from '{}': {}",
                                connection_id_clone,
                                e
                            );
                        }
                    }
                }
                Message::Ping(_) => {
                    // Pong is sent automatically by the protocol layer.
                    tracing::debug!("Received ping from '{}'", connection_id_clone);
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Cleanup runs for every termination path, clean close or not.
    if let Some(outcome) = state
        .disconnect_participant_usecase
        .execute(&connection_id)
        .await
    {
        let left_frame = ServerEvent::UserLeft(UserLeftDto {
            connection_id: connection_id.as_str().to_string(),
        })
        .to_frame();
        state
            .disconnect_participant_usecase
            .broadcast_user_left(outcome.notify_targets, &left_frame)
            .await;
    }
}

/// Route one decoded client event to its use case.
async fn dispatch(state: &Arc<AppState>, connection_id: &ConnectionId, event: ClientEvent) {
    match event {
        ClientEvent::JoinRoom(data) => {
            let Some(room_id) = parse_room_id(connection_id, "join-room", &data.room_id) else {
                return;
            };
            handle_join_room(state, connection_id, room_id, data.user_id, data.user_name).await;
        }
        ClientEvent::Offer(data) => {
            let frame = ServerEvent::Offer(OfferForwardDto {
                offer: data.offer,
                connection_id: connection_id.as_str().to_string(),
            })
            .to_frame();
            relay(state, "offer", data.target_connection_id, &frame).await;
        }
        ClientEvent::Answer(data) => {
            let frame = ServerEvent::Answer(AnswerForwardDto {
                answer: data.answer,
                connection_id: connection_id.as_str().to_string(),
            })
            .to_frame();
            relay(state, "answer", data.target_connection_id, &frame).await;
        }
        ClientEvent::IceCandidate(data) => {
            let frame = ServerEvent::IceCandidate(IceCandidateForwardDto {
                candidate: data.candidate,
                connection_id: connection_id.as_str().to_string(),
            })
            .to_frame();
            relay(state, "ice-candidate", data.target_connection_id, &frame).await;
        }
        ClientEvent::ToggleAudio(data) => {
            let Some(room_id) = parse_room_id(connection_id, "toggle-audio", &data.room_id)
            else {
                return;
            };
            let frame = ServerEvent::UserAudioChanged(MediaStateDto {
                connection_id: connection_id.as_str().to_string(),
                enabled: data.audio_enabled,
            })
            .to_frame();
            if let Err(reason) = state
                .toggle_media_usecase
                .execute(connection_id, &room_id, &frame)
                .await
            {
                tracing::debug!("Dropping toggle-audio frame: {}", reason);
            }
        }
        ClientEvent::ToggleVideo(data) => {
            let Some(room_id) = parse_room_id(connection_id, "toggle-video", &data.room_id)
            else {
                return;
            };
            let frame = ServerEvent::UserVideoChanged(MediaStateDto {
                connection_id: connection_id.as_str().to_string(),
                enabled: data.video_enabled,
            })
            .to_frame();
            if let Err(reason) = state
                .toggle_media_usecase
                .execute(connection_id, &room_id, &frame)
                .await
            {
                tracing::debug!("Dropping toggle-video frame: {}", reason);
            }
        }
        ClientEvent::ChatMessage(data) => {
            let Some(room_id) = parse_room_id(connection_id, "chat-message", &data.room_id)
            else {
                return;
            };
            // Client timestamps are kept when present so history ordering
            // matches what the sender displayed.
            let timestamp = Timestamp::new(data.timestamp.unwrap_or_else(now_millis));
            let message = ChatMessage::new(
                data.message,
                DisplayName::new(data.user_name),
                data.user_id.map(UserId::new),
                connection_id.clone(),
                timestamp,
            );
            let frame = ServerEvent::ChatMessage(ChatMessageDto::from(message.clone())).to_frame();
            if let Err(reason) = state
                .send_chat_message_usecase
                .execute(&room_id, message, &frame)
                .await
            {
                tracing::debug!("Dropping chat-message frame: {}", reason);
            }
        }
        ClientEvent::Caption(data) => {
            let Some(room_id) = parse_room_id(connection_id, "caption", &data.room_id) else {
                return;
            };
            let frame = ServerEvent::Caption(CaptionDto {
                caption: data.caption.clone(),
                user_name: DisplayName::new(data.user_name).into_string(),
                user_id: data.user_id,
                connection_id: connection_id.as_str().to_string(),
                timestamp: now_millis(),
            })
            .to_frame();
            if let Err(reason) = state
                .send_caption_usecase
                .execute(connection_id, &room_id, &data.caption, &frame)
                .await
            {
                tracing::debug!("Dropping caption frame: {}", reason);
            }
        }
        ClientEvent::SignLanguage(data) => {
            let Some(room_id) = parse_room_id(connection_id, "sign-language", &data.room_id)
            else {
                return;
            };
            // A missing or malformed word list still renders as "nothing
            // committed yet" on every peer.
            let sentence = if data.sentence.is_array() {
                data.sentence
            } else {
                json!([])
            };
            let frame = ServerEvent::SignLanguage(SignLanguageDto {
                sequence: data.sequence,
                text: data.text.unwrap_or_default(),
                sentence,
                user_name: DisplayName::new(data.user_name).into_string(),
                user_id: data.user_id,
                connection_id: connection_id.as_str().to_string(),
                timestamp: now_millis(),
            })
            .to_frame();
            if let Err(reason) = state
                .send_sign_language_usecase
                .execute(&room_id, &frame)
                .await
            {
                tracing::debug!("Dropping sign-language frame: {}", reason);
            }
        }
    }
}

async fn handle_join_room(
    state: &Arc<AppState>,
    connection_id: &ConnectionId,
    room_id: RoomId,
    user_id: Option<String>,
    user_name: Option<String>,
) {
    let display_name = DisplayName::new(user_name);
    let (summary, lease) = state
        .join_room_usecase
        .execute(
            connection_id.clone(),
            room_id,
            user_id.clone().map(UserId::new),
            display_name.clone(),
        )
        .await;

    // A migrating connection left its previous room just now; tell that room.
    if let Some(previous) = summary.previous_room {
        let left_frame = ServerEvent::UserLeft(UserLeftDto {
            connection_id: connection_id.as_str().to_string(),
        })
        .to_frame();
        state
            .disconnect_participant_usecase
            .broadcast_user_left(previous.notify_targets, &left_frame)
            .await;
    }

    // Reply to the joiner: who is here, and what was said.
    let existing: Vec<ParticipantDto> = summary
        .existing_participants
        .into_iter()
        .map(ParticipantDto::from)
        .collect();
    let history: Vec<ChatMessageDto> = summary
        .chat_history
        .into_iter()
        .map(ChatMessageDto::from)
        .collect();
    state
        .join_room_usecase
        .push_to_joiner(
            connection_id,
            &ServerEvent::ExistingParticipants(existing).to_frame(),
        )
        .await;
    state
        .join_room_usecase
        .push_to_joiner(connection_id, &ServerEvent::ChatHistory(history).to_frame())
        .await;

    // Both reply frames are queued; a chat appended from here on is newer
    // than the snapshot and may be delivered after it.
    drop(lease);

    // Announce the joiner to everyone already in the room.
    let joined_frame = ServerEvent::UserJoined(ParticipantDto {
        connection_id: connection_id.as_str().to_string(),
        user_id,
        user_name: display_name.into_string(),
    })
    .to_frame();
    state
        .join_room_usecase
        .broadcast_user_joined(summary.notify_targets, &joined_frame)
        .await;
}

/// Forward an encoded signaling frame to its explicit target.
async fn relay(state: &Arc<AppState>, event_name: &str, target: String, frame: &str) {
    let target = ConnectionId::new(target);
    if let Err(reason) = state.relay_signal_usecase.execute(&target, frame).await {
        tracing::debug!("Dropping {} frame: {}", event_name, reason);
    }
}

fn parse_room_id(connection_id: &ConnectionId, event_name: &str, raw: &str) -> Option<RoomId> {
    match RoomId::new(raw.to_string()) {
        Ok(room_id) => Some(room_id),
        Err(e) => {
            tracing::warn!(
                "Dropping {} frame from '{}': {}",
                event_name,
                connection_id,
                e
            );
            None
        }
    }
}
