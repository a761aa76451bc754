//! UseCase: chat messages.
//!
//! Chat is broadcast to the whole room *including* the sender: every
//! client's view of "what have I said" is driven by the relay, not by
//! optimistic local UI state, so sender and peers can never diverge.
//! The append to the room's bounded log and the computation of the
//! broadcast targets happen in one per-room critical section, which keeps
//! history replay and live delivery exactly-once for concurrent joiners.
//! The broadcast itself is queued under the same section (via the append's
//! room lease), so a joiner whose history snapshot lacks this message can
//! never receive the live frame ahead of that snapshot.

use std::sync::Arc;

use crate::domain::{ChatMessage, MessagePusher, RoomId, RoomRepository};

use super::error::DropReason;

pub struct SendChatMessageUseCase {
    rooms: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl SendChatMessageUseCase {
    pub fn new(rooms: Arc<dyn RoomRepository>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            rooms,
            message_pusher,
        }
    }

    /// Append `message` to the room's log and broadcast `frame` (the encoded
    /// form of the same message) to all members. Returns the number of
    /// recipients.
    pub async fn execute(
        &self,
        room_id: &RoomId,
        message: ChatMessage,
        frame: &str,
    ) -> Result<usize, DropReason> {
        if message.text.trim().is_empty() {
            return Err(DropReason::EmptyText);
        }

        let Some((targets, lease)) = self.rooms.append_chat(room_id, message).await else {
            return Err(DropReason::UnknownRoom(room_id.as_str().to_string()));
        };

        // Queue the broadcast before releasing the room, so it cannot
        // overtake a concurrent joiner's pending history snapshot.
        let recipients = targets.len();
        self.message_pusher.broadcast(targets, frame).await;
        drop(lease);
        Ok(recipients)
    }
}
