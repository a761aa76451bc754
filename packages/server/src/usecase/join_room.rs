//! UseCase: joining a meeting room.
//!
//! Joining an unknown room id creates the room implicitly, so a meeting
//! link keeps working even if the server restarted since `create-room`.
//! The joiner learns the current members (minus itself) and the room's chat
//! history; everyone else learns about the joiner.
//!
//! A connection belongs to at most one room. A second `join-room` on an
//! already-joined connection migrates it: it leaves the old room first
//! (with the usual `user-left` notification and empty-room deletion) and
//! then joins the new one.

use std::sync::Arc;

use hiroba_shared::time::now_millis;

use crate::domain::{
    ChatMessage, ConnectionId, ConnectionRecord, ConnectionRegistry, DisplayName, MessagePusher,
    RoomId, RoomLease, RoomRepository, Timestamp, UserId,
};

/// Everything the transport layer must deliver after a join.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinSummary {
    /// Members present before this join, with their identities.
    pub existing_participants: Vec<(ConnectionId, ConnectionRecord)>,
    /// Chat log snapshot taken atomically with the member insert.
    pub chat_history: Vec<ChatMessage>,
    /// Connections that must be told about the joiner (members minus self).
    pub notify_targets: Vec<ConnectionId>,
    /// Set when this join migrated the connection out of another room.
    pub previous_room: Option<PreviousRoom>,
}

/// The room a migrating connection left, and who must be told.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviousRoom {
    pub room_id: RoomId,
    pub notify_targets: Vec<ConnectionId>,
}

pub struct JoinRoomUseCase {
    rooms: Arc<dyn RoomRepository>,
    registry: Arc<dyn ConnectionRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl JoinRoomUseCase {
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

    /// Join `room_id`, migrating out of any previous room first.
    ///
    /// The returned [`RoomLease`] keeps the joined room serialized; the
    /// caller must queue the joiner's reply frames before dropping it, so a
    /// racing chat append cannot reach the joiner ahead of the history
    /// snapshot it was cut from.
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        room_id: RoomId,
        user_id: Option<UserId>,
        display_name: DisplayName,
    ) -> (JoinSummary, RoomLease) {
        // 1. Migrate out of the previous room, if any.
        let previous_room = match self.registry.lookup(&connection_id).await {
            Some(record) => match record.room_id {
                Some(old_room_id) if old_room_id != room_id => self
                    .rooms
                    .remove_member(&old_room_id, &connection_id)
                    .await
                    .map(|outcome| PreviousRoom {
                        room_id: old_room_id,
                        notify_targets: outcome.remaining_members,
                    }),
                _ => None,
            },
            None => None,
        };

        // 2. Record identity before becoming visible as a member, so peers
        //    racing their own join never see a nameless participant.
        self.registry
            .set_identity(&connection_id, user_id, display_name, room_id.clone())
            .await;

        // 3. Enter the room (implicitly creating it) and snapshot its state.
        let (outcome, lease) = self
            .rooms
            .join_room(&room_id, connection_id.clone(), Timestamp::new(now_millis()))
            .await;

        // 4. Resolve the identities of the members found there. Runs under
        //    the lease; the registry is never locked around room operations,
        //    so the lock order here is acyclic.
        let existing_participants = self.registry.lookup_many(&outcome.existing_members).await;

        tracing::info!(
            "Connection '{}' joined room '{}' ({} existing member(s))",
            connection_id,
            room_id,
            existing_participants.len()
        );

        let summary = JoinSummary {
            existing_participants,
            chat_history: outcome.chat_history,
            notify_targets: outcome.existing_members,
            previous_room,
        };
        (summary, lease)
    }

    /// Deliver a frame to the joiner itself. A push failure means the joiner
    /// already disconnected; there is nobody to tell.
    pub async fn push_to_joiner(&self, connection_id: &ConnectionId, frame: &str) {
        if let Err(e) = self.message_pusher.push_to(connection_id, frame).await {
            tracing::debug!("Could not deliver join reply to '{}': {}", connection_id, e);
        }
    }

    /// Announce the joiner to the rest of the room.
    pub async fn broadcast_user_joined(&self, targets: Vec<ConnectionId>, frame: &str) {
        self.message_pusher.broadcast(targets, frame).await;
    }
}
