//! UseCase: live captions.
//!
//! Captions are ephemeral: broadcast to the room *excluding* the sender
//! (the sender already sees its own speech) and never persisted, unlike
//! chat.

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, RoomId, RoomRepository};

use super::error::DropReason;

pub struct SendCaptionUseCase {
    rooms: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl SendCaptionUseCase {
    pub fn new(rooms: Arc<dyn RoomRepository>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            rooms,
            message_pusher,
        }
    }

    /// Broadcast an encoded caption frame to every room member except the
    /// sender. Returns the number of recipients.
    pub async fn execute(
        &self,
        sender: &ConnectionId,
        room_id: &RoomId,
        caption: &str,
        frame: &str,
    ) -> Result<usize, DropReason> {
        if caption.trim().is_empty() {
            return Err(DropReason::EmptyText);
        }

        let Some(members) = self.rooms.members(room_id).await else {
            return Err(DropReason::UnknownRoom(room_id.as_str().to_string()));
        };

        let targets: Vec<ConnectionId> =
            members.into_iter().filter(|id| id != sender).collect();
        let recipients = targets.len();
        self.message_pusher.broadcast(targets, frame).await;
        Ok(recipients)
    }
}
