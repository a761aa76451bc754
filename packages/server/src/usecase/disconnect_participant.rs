//! UseCase: transport disconnection cleanup.
//!
//! Runs whenever a WebSocket closes, cleanly or not. Idempotent, and safe
//! to race an in-flight join for the same connection: the registry record
//! is removed first, so a late join can no longer re-associate the
//! connection with a room, and membership removal plus empty-room deletion
//! happen in one per-room critical section.

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry, MessagePusher, RoomId, RoomRepository};

/// Result of a disconnect that affected a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisconnectOutcome {
    pub room_id: RoomId,
    /// Remaining members that must receive `user-left`.
    pub notify_targets: Vec<ConnectionId>,
    pub room_deleted: bool,
}

pub struct DisconnectParticipantUseCase {
    rooms: Arc<dyn RoomRepository>,
    registry: Arc<dyn ConnectionRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectParticipantUseCase {
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        registry: Arc<dyn ConnectionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            rooms,
            registry,
            message_pusher,
        }
    }

    /// Tear down a connection. Returns `None` when the connection never
    /// joined a room (or cleanup already ran); there is nobody to notify.
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<DisconnectOutcome> {
        self.message_pusher.unregister_client(connection_id).await;

        let room_id = self.registry.unregister(connection_id).await?;
        let outcome = self.rooms.remove_member(&room_id, connection_id).await?;

        tracing::info!(
            "Connection '{}' left room '{}' ({} member(s) remain)",
            connection_id,
            room_id,
            outcome.remaining_members.len()
        );

        Some(DisconnectOutcome {
            room_id,
            notify_targets: outcome.remaining_members,
            room_deleted: outcome.room_deleted,
        })
    }

    /// Announce the departure to the remaining room members.
    pub async fn broadcast_user_left(&self, targets: Vec<ConnectionId>, frame: &str) {
        self.message_pusher.broadcast(targets, frame).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DisplayName, Timestamp};
    use crate::infrastructure::message_pusher::WebSocketMessagePusher;
    use crate::infrastructure::repository::{InMemoryConnectionRegistry, InMemoryRoomRepository};

    fn room_id(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    struct Fixture {
        rooms: Arc<InMemoryRoomRepository>,
        registry: Arc<InMemoryConnectionRegistry>,
        usecase: DisconnectParticipantUseCase,
    }

    fn fixture() -> Fixture {
        let rooms = Arc::new(InMemoryRoomRepository::new());
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase =
            DisconnectParticipantUseCase::new(rooms.clone(), registry.clone(), pusher);
        Fixture {
            rooms,
            registry,
            usecase,
        }
    }

    async fn joined_connection(f: &Fixture, room: &RoomId) -> ConnectionId {
        let conn = ConnectionId::generate();
        f.registry.register(conn.clone()).await;
        f.registry
            .set_identity(&conn, None, DisplayName::default(), room.clone())
            .await;
        f.rooms
            .join_room(room, conn.clone(), Timestamp::new(0))
            .await;
        conn
    }

    #[tokio::test]
    async fn test_disconnect_notifies_remaining_members() {
        // given:
        let f = fixture();
        let alice = joined_connection(&f, &room_id("abc")).await;
        let bob = joined_connection(&f, &room_id("abc")).await;

        // when: bob disconnects
        let outcome = f.usecase.execute(&bob).await.unwrap();

        // then: alice is notified, the room survives
        assert_eq!(outcome.room_id, room_id("abc"));
        assert_eq!(outcome.notify_targets, vec![alice]);
        assert!(!outcome.room_deleted);
        assert_eq!(f.rooms.room_count().await, 1);
    }

    #[tokio::test]
    async fn test_last_disconnect_deletes_the_room() {
        // given:
        let f = fixture();
        let alice = joined_connection(&f, &room_id("abc")).await;

        // when:
        let outcome = f.usecase.execute(&alice).await.unwrap();

        // then:
        assert_eq!(outcome.notify_targets, vec![]);
        assert!(outcome.room_deleted);
        assert_eq!(f.rooms.room_count().await, 0);
    }

    #[tokio::test]
    async fn test_disconnect_is_idempotent() {
        // given:
        let f = fixture();
        let alice = joined_connection(&f, &room_id("abc")).await;
        f.usecase.execute(&alice).await;

        // when: cleanup runs a second time
        let outcome = f.usecase.execute(&alice).await;

        // then:
        assert_eq!(outcome, None);
    }

    #[tokio::test]
    async fn test_disconnect_before_join_is_a_noop() {
        // given: a connection that opened a socket but never joined
        let f = fixture();
        let conn = ConnectionId::generate();
        f.registry.register(conn.clone()).await;

        // when:
        let outcome = f.usecase.execute(&conn).await;

        // then:
        assert_eq!(outcome, None);
    }
}
