//! UseCase: audio/video mute state changes.
//!
//! Pure local-control notifications: broadcast to the room excluding the
//! sender, who already knows its own state. Nothing is persisted.

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, RoomId, RoomRepository};

use super::error::DropReason;

pub struct ToggleMediaUseCase {
    rooms: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl ToggleMediaUseCase {
    pub fn new(rooms: Arc<dyn RoomRepository>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            rooms,
            message_pusher,
        }
    }

    /// Broadcast an encoded `user-audio-changed` / `user-video-changed`
    /// frame to every room member except the sender.
    pub async fn execute(
        &self,
        sender: &ConnectionId,
        room_id: &RoomId,
        frame: &str,
    ) -> Result<usize, DropReason> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessagePusher as _, Timestamp};
    use crate::infrastructure::message_pusher::WebSocketMessagePusher;
    use crate::infrastructure::repository::InMemoryRoomRepository;
    use tokio::sync::mpsc;

    fn room_id(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_toggle_is_not_echoed_to_the_sender() {
        // given:
        let rooms = Arc::new(InMemoryRoomRepository::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = ToggleMediaUseCase::new(rooms.clone(), pusher.clone());

        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        pusher.register_client(alice.clone(), tx_a).await;
        pusher.register_client(bob.clone(), tx_b).await;
        rooms.join_room(&room_id("abc"), alice.clone(), Timestamp::new(0)).await;
        rooms.join_room(&room_id("abc"), bob.clone(), Timestamp::new(0)).await;

        // when:
        let result = usecase.execute(&alice, &room_id("abc"), "frame").await;

        // then:
        assert_eq!(result, Ok(1));
        assert_eq!(rx_b.recv().await, Some("frame".to_string()));
        assert!(rx_a.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_toggle_in_unknown_room_is_dropped() {
        // given:
        let rooms = Arc::new(InMemoryRoomRepository::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = ToggleMediaUseCase::new(rooms, pusher);
        let alice = ConnectionId::generate();

        // when:
        let result = usecase.execute(&alice, &room_id("ghost"), "frame").await;

        // then:
        assert_eq!(result, Err(DropReason::UnknownRoom("ghost".to_string())));
    }
}
