//! In-memory room store.
//!
//! Locking discipline: the outer mutex guards the room map itself; each room
//! carries its own mutex so operations on different rooms do not serialize.
//! `join_room` and `remove_member` hold the map lock across the room lock,
//! which serializes implicit room creation against empty-room deletion.
//! Without that, a join could resurrect a room handle that a concurrent last
//! disconnect is deleting from the map, silently dropping the join.
//! Chat append and member reads take the map lock only long enough to clone
//! the room handle.
//!
//! `join_room` and `append_chat` hand their room guard back to the caller as
//! a [`RoomLease`], so the caller can queue outbound frames before the next
//! operation on the same room runs. Per-connection channels are FIFO, which
//! makes a joiner's history snapshot arrive ahead of any chat message
//! appended after the snapshot was taken.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ChatMessage, ConnectionId, JoinOutcome, RemoveOutcome, Room, RoomId, RoomIdFactory,
    RoomLease, RoomRepository, RoomSummary, Timestamp,
};

/// In-memory [`RoomRepository`] implementation.
pub struct InMemoryRoomRepository {
    rooms: Mutex<HashMap<RoomId, Arc<Mutex<Room>>>>,
}

impl InMemoryRoomRepository {
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }

    async fn room_handle(&self, room_id: &RoomId) -> Option<Arc<Mutex<Room>>> {
        let rooms = self.rooms.lock().await;
        rooms.get(room_id).cloned()
    }
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn create_room(&self, created_at: Timestamp) -> RoomId {
        let mut rooms = self.rooms.lock().await;
        let room_id = loop {
            let candidate = RoomIdFactory::generate();
            if !rooms.contains_key(&candidate) {
                break candidate;
            }
        };
        rooms.insert(
            room_id.clone(),
            Arc::new(Mutex::new(Room::new(room_id.clone(), created_at))),
        );
        tracing::info!("Room '{}' created", room_id);
        room_id
    }

    async fn join_room(
        &self,
        room_id: &RoomId,
        connection_id: ConnectionId,
        created_at: Timestamp,
    ) -> (JoinOutcome, RoomLease) {
        let mut rooms = self.rooms.lock().await;
        let newly_created = !rooms.contains_key(room_id);
        let room = rooms
            .entry(room_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(Room::new(room_id.clone(), created_at))))
            .clone();
        if newly_created {
            tracing::info!("Room '{}' implicitly created by join", room_id);
        }

        // Member insert and snapshot happen in one critical section so the
        // joiner sees each chat message exactly once: in this snapshot or
        // via a later live broadcast. The lease keeps that section open
        // until the caller has queued the snapshot for delivery.
        let mut guard = room.lock_owned().await;
        guard.add_member(connection_id.clone());
        let outcome = JoinOutcome {
            existing_members: guard.member_ids_except(&connection_id),
            chat_history: guard.chat_history(),
            newly_created,
        };
        (outcome, RoomLease::new(guard))
    }

    async fn remove_member(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Option<RemoveOutcome> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms.get(room_id).cloned()?;

        let remaining_members = {
            let mut room = room.lock().await;
            room.remove_member(connection_id);
            room.member_ids()
        };

        let room_deleted = remaining_members.is_empty();
        if room_deleted {
            // Sole eviction policy: the chat log goes with the room.
            rooms.remove(room_id);
            tracing::info!("Room '{}' deleted (last member left)", room_id);
        }

        Some(RemoveOutcome {
            remaining_members,
            room_deleted,
        })
    }

    async fn append_chat(
        &self,
        room_id: &RoomId,
        message: ChatMessage,
    ) -> Option<(Vec<ConnectionId>, RoomLease)> {
        let room = self.room_handle(room_id).await?;
        let mut guard = room.lock_owned().await;
        guard.append_chat(message);
        let targets = guard.member_ids();
        Some((targets, RoomLease::new(guard)))
    }

    async fn members(&self, room_id: &RoomId) -> Option<Vec<ConnectionId>> {
        let room = self.room_handle(room_id).await?;
        let room = room.lock().await;
        Some(room.member_ids())
    }

    async fn room_summaries(&self) -> Vec<RoomSummary> {
        let handles: Vec<Arc<Mutex<Room>>> = {
            let rooms = self.rooms.lock().await;
            rooms.values().cloned().collect()
        };

        let mut summaries = Vec::with_capacity(handles.len());
        for handle in handles {
            let room = handle.lock().await;
            summaries.push(RoomSummary {
                id: room.id.clone(),
                member_count: room.member_count(),
                created_at: room.created_at,
            });
        }
        summaries
    }

    async fn room_count(&self) -> usize {
        let rooms = self.rooms.lock().await;
        rooms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CHAT_LOG_CAPACITY, DisplayName};

    fn room_id(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    fn chat_message(text: &str, sender: &ConnectionId) -> ChatMessage {
        ChatMessage::new(
            text.to_string(),
            DisplayName::new(Some("Alice".to_string())),
            None,
            sender.clone(),
            Timestamp::new(1000),
        )
    }

    #[tokio::test]
    async fn test_create_room_generates_unique_live_ids() {
        // given:
        let repo = InMemoryRoomRepository::new();

        // when:
        let first = repo.create_room(Timestamp::new(0)).await;
        let second = repo.create_room(Timestamp::new(0)).await;

        // then:
        assert_ne!(first, second);
        assert_eq!(repo.room_count().await, 2);
    }

    #[tokio::test]
    async fn test_join_unknown_room_creates_it_exactly_once() {
        // given:
        let repo = InMemoryRoomRepository::new();
        let id = room_id("abc");
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();

        // when:
        let (first, _) = repo.join_room(&id, alice.clone(), Timestamp::new(0)).await;
        let (second, _) = repo.join_room(&id, bob.clone(), Timestamp::new(0)).await;

        // then:
        assert!(first.newly_created);
        assert!(!second.newly_created);
        assert_eq!(repo.room_count().await, 1);
        assert_eq!(first.existing_members, vec![]);
        assert_eq!(second.existing_members, vec![alice]);
    }

    #[tokio::test]
    async fn test_rejoin_is_idempotent() {
        // given:
        let repo = InMemoryRoomRepository::new();
        let id = room_id("abc");
        let alice = ConnectionId::generate();
        repo.join_room(&id, alice.clone(), Timestamp::new(0)).await;

        // when:
        let (outcome, _) = repo.join_room(&id, alice.clone(), Timestamp::new(0)).await;

        // then: still one member, and the joiner is not its own peer
        assert_eq!(outcome.existing_members, vec![]);
        assert_eq!(repo.members(&id).await.unwrap(), vec![alice]);
    }

    #[tokio::test]
    async fn test_removing_last_member_deletes_the_room() {
        // given:
        let repo = InMemoryRoomRepository::new();
        let id = room_id("abc");
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        repo.join_room(&id, alice.clone(), Timestamp::new(0)).await;
        repo.join_room(&id, bob.clone(), Timestamp::new(0)).await;

        // when:
        let first = repo.remove_member(&id, &bob).await.unwrap();
        let second = repo.remove_member(&id, &alice).await.unwrap();

        // then:
        assert!(!first.room_deleted);
        assert_eq!(first.remaining_members, vec![alice]);
        assert!(second.room_deleted);
        assert_eq!(second.remaining_members, vec![]);
        assert_eq!(repo.room_count().await, 0);
        assert_eq!(repo.members(&id).await, None);
    }

    #[tokio::test]
    async fn test_no_stale_history_after_room_deletion() {
        // given: a room with chat history whose last member leaves
        let repo = InMemoryRoomRepository::new();
        let id = room_id("abc");
        let alice = ConnectionId::generate();
        repo.join_room(&id, alice.clone(), Timestamp::new(0)).await;
        repo.append_chat(&id, chat_message("hello", &alice)).await;
        repo.remove_member(&id, &alice).await;

        // when: the same id is joined again
        let (outcome, _) = repo.join_room(&id, alice.clone(), Timestamp::new(0)).await;

        // then: a fresh room with an empty chat log
        assert!(outcome.newly_created);
        assert_eq!(outcome.chat_history, vec![]);
    }

    #[tokio::test]
    async fn test_append_chat_returns_members_and_bounds_the_log() {
        // given:
        let repo = InMemoryRoomRepository::new();
        let id = room_id("abc");
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        repo.join_room(&id, alice.clone(), Timestamp::new(0)).await;
        repo.join_room(&id, bob.clone(), Timestamp::new(0)).await;

        // when: append 250 messages
        let mut last_targets = vec![];
        for n in 0..250 {
            last_targets = repo
                .append_chat(&id, chat_message(&format!("message {n}"), &alice))
                .await
                .unwrap()
                .0;
        }

        // then: targets include both members, log holds the most recent 200
        assert_eq!(last_targets.len(), 2);
        let (outcome, _) = repo
            .join_room(&id, ConnectionId::generate(), Timestamp::new(0))
            .await;
        let history = outcome.chat_history;
        assert_eq!(history.len(), CHAT_LOG_CAPACITY);
        assert_eq!(history[0].text, "message 50");
        assert_eq!(history[CHAT_LOG_CAPACITY - 1].text, "message 249");
    }

    #[tokio::test]
    async fn test_operations_on_unknown_room_are_noops() {
        // given:
        let repo = InMemoryRoomRepository::new();
        let id = room_id("ghost");
        let alice = ConnectionId::generate();

        // when / then:
        assert_eq!(repo.remove_member(&id, &alice).await, None);
        assert!(repo.append_chat(&id, chat_message("hi", &alice)).await.is_none());
        assert_eq!(repo.members(&id).await, None);
    }

    #[tokio::test]
    async fn test_room_summaries_reflect_live_rooms() {
        // given:
        let repo = InMemoryRoomRepository::new();
        let id = room_id("abc");
        let alice = ConnectionId::generate();
        repo.join_room(&id, alice.clone(), Timestamp::new(42)).await;

        // when:
        let summaries = repo.room_summaries().await;

        // then:
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].id, id);
        assert_eq!(summaries[0].member_count, 1);
        assert_eq!(summaries[0].created_at, Timestamp::new(42));
    }

    #[tokio::test]
    async fn test_concurrent_joins_to_the_same_unknown_room() {
        // given:
        let repo = Arc::new(InMemoryRoomRepository::new());
        let id = room_id("race");

        // when: many connections join the same unknown room concurrently
        let mut handles = Vec::new();
        for _ in 0..32 {
            let repo = repo.clone();
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                repo.join_room(&id, ConnectionId::generate(), Timestamp::new(0))
                    .await
                    .0
            }));
        }
        let outcomes: Vec<JoinOutcome> = futures_util::future::join_all(handles)
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        // then: the room was created exactly once and no join was lost
        let created = outcomes.iter().filter(|o| o.newly_created).count();
        assert_eq!(created, 1);
        assert_eq!(repo.members(&id).await.unwrap().len(), 32);
    }

    #[tokio::test]
    async fn test_append_waits_for_an_open_join_lease() {
        // given: bob's join lease still open (reply frames not yet queued)
        let repo = Arc::new(InMemoryRoomRepository::new());
        let id = room_id("abc");
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        repo.join_room(&id, alice.clone(), Timestamp::new(0)).await;
        let (_outcome, lease) = repo.join_room(&id, bob.clone(), Timestamp::new(0)).await;

        // when: a chat append races the join
        let append = tokio::spawn({
            let repo = repo.clone();
            let id = id.clone();
            let alice = alice.clone();
            async move {
                repo.append_chat(&id, chat_message("hi", &alice))
                    .await
                    .map(|(targets, _)| targets)
            }
        });
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        // then: the append runs only after the lease is dropped, so its
        // broadcast cannot be queued ahead of the joiner's snapshot
        assert!(!append.is_finished());
        drop(lease);
        assert_eq!(append.await.unwrap().unwrap().len(), 2);
    }
}
