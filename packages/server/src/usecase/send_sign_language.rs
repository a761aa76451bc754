//! UseCase: sign-language recognition state.
//!
//! The accumulated recognition state (word in progress, committed words) is
//! broadcast to the whole room *including* the sender, for the same reason
//! chat is: the relay is the single source of truth for what the sender has
//! "said". An empty state is a valid message, it tells every peer to clear
//! the sender's overlay.

use std::sync::Arc;

use crate::domain::{MessagePusher, RoomId, RoomRepository};

use super::error::DropReason;

pub struct SendSignLanguageUseCase {
    rooms: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl SendSignLanguageUseCase {
    pub fn new(rooms: Arc<dyn RoomRepository>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            rooms,
            message_pusher,
        }
    }

    /// Broadcast an encoded sign-language frame to every room member,
    /// sender included. Returns the number of recipients.
    pub async fn execute(&self, room_id: &RoomId, frame: &str) -> Result<usize, DropReason> {
        let Some(targets) = self.rooms.members(room_id).await else {
            return Err(DropReason::UnknownRoom(room_id.as_str().to_string()));
        };

        let recipients = targets.len();
        self.message_pusher.broadcast(targets, frame).await;
        Ok(recipients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionId, MessagePusher as _, Timestamp};
    use crate::infrastructure::message_pusher::WebSocketMessagePusher;
    use crate::infrastructure::repository::InMemoryRoomRepository;
    use tokio::sync::mpsc;

    fn room_id(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_sign_language_state_is_echoed_to_the_sender() {
        // given:
        let rooms = Arc::new(InMemoryRoomRepository::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = SendSignLanguageUseCase::new(rooms.clone(), pusher.clone());

        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        pusher.register_client(alice.clone(), tx_a).await;
        pusher.register_client(bob.clone(), tx_b).await;
        rooms.join_room(&room_id("abc"), alice.clone(), Timestamp::new(0)).await;
        rooms.join_room(&room_id("abc"), bob.clone(), Timestamp::new(0)).await;

        // when: an empty state, which is still a meaningful "clear" message
        let result = usecase.execute(&room_id("abc"), "frame").await;

        // then: both members receive it
        assert_eq!(result, Ok(2));
        assert_eq!(rx_a.recv().await, Some("frame".to_string()));
        assert_eq!(rx_b.recv().await, Some("frame".to_string()));
    }

    #[tokio::test]
    async fn test_sign_language_in_unknown_room_is_dropped() {
        // given:
        let rooms = Arc::new(InMemoryRoomRepository::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = SendSignLanguageUseCase::new(rooms, pusher);

        // when:
        let result = usecase.execute(&room_id("ghost"), "frame").await;

        // then:
        assert_eq!(result, Err(DropReason::UnknownRoom("ghost".to_string())));
    }
}
