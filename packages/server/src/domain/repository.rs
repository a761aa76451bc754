//! RoomRepository trait: the room store interface the use-case layer
//! depends on. The in-memory implementation lives in the infrastructure
//! layer (dependency inversion).
//!
//! Operations that must be atomic with respect to a concurrent join on the
//! same room (member insert + history snapshot, chat append + member list,
//! member removal + empty-room deletion) are expressed as single composite
//! methods so implementations can run each in one per-room critical section.
//!
//! Atomicity alone is not enough for the history contract: the joiner's
//! history snapshot must also be *queued for delivery* before any later
//! append on the same room queues its live broadcast, or the joiner can see
//! a live message ahead of a history frame that lacks it. `join_room` and
//! `append_chat` therefore return a [`RoomLease`] that keeps the room
//! serialized until the caller has queued its outbound frames; per-channel
//! FIFO then preserves history-before-live order.

use async_trait::async_trait;
use tokio::sync::OwnedMutexGuard;

use super::entity::{ChatMessage, Room};
use super::value_object::{ConnectionId, RoomId, Timestamp};

/// Extends a room's critical section past the repository call, until the
/// caller has queued its outbound frames. While a lease is alive no other
/// operation on the same room can run. Holders must only queue deliveries
/// (registry lookups, channel sends) and must never call back into the
/// repository.
pub struct RoomLease {
    _guard: OwnedMutexGuard<Room>,
}

impl RoomLease {
    pub fn new(guard: OwnedMutexGuard<Room>) -> Self {
        Self { _guard: guard }
    }
}

/// Result of joining a room: everything the joiner must be told, captured
/// in the same critical section as the member insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    /// Members present before this join (i.e. members minus self).
    pub existing_members: Vec<ConnectionId>,
    /// Chat log snapshot at the moment of joining, oldest first. A message
    /// is either in this snapshot or delivered live afterwards, never both.
    pub chat_history: Vec<ChatMessage>,
    /// Whether the room was implicitly created by this join.
    pub newly_created: bool,
}

/// Result of removing a member from a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveOutcome {
    /// Members remaining after the removal.
    pub remaining_members: Vec<ConnectionId>,
    /// Whether the removal emptied the room and deleted it.
    pub room_deleted: bool,
}

/// Read-only view of one live room, for the HTTP observability surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSummary {
    pub id: RoomId,
    pub member_count: usize,
    pub created_at: Timestamp,
}

#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Create an empty room with a generated short id, collision-checked
    /// against live rooms. Always succeeds.
    async fn create_room(&self, created_at: Timestamp) -> RoomId;

    /// Add a member to `room_id`, creating the room first if it does not
    /// exist (rooms are implicitly creatable by joining). Idempotent for a
    /// connection that is already a member.
    ///
    /// The returned lease must be dropped once the joiner's reply frames
    /// have been queued; until then no append on the room can queue a live
    /// broadcast, so the joiner cannot see a live message ahead of a history
    /// snapshot that lacks it.
    async fn join_room(
        &self,
        room_id: &RoomId,
        connection_id: ConnectionId,
        created_at: Timestamp,
    ) -> (JoinOutcome, RoomLease);

    /// Remove a member; deletes the room (including its chat log) when the
    /// member set empties. Returns `None` for an unknown room (no-op).
    async fn remove_member(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Option<RemoveOutcome>;

    /// Append to the room's bounded chat log and return the member set at
    /// append time (the inclusive broadcast targets). Returns `None` for an
    /// unknown room (no-op). The lease must be held until the broadcast has
    /// been queued.
    async fn append_chat(
        &self,
        room_id: &RoomId,
        message: ChatMessage,
    ) -> Option<(Vec<ConnectionId>, RoomLease)>;

    /// Current members of a room, or `None` for an unknown room.
    async fn members(&self, room_id: &RoomId) -> Option<Vec<ConnectionId>>;

    /// Summaries of all live rooms.
    async fn room_summaries(&self) -> Vec<RoomSummary>;

    /// Number of live rooms.
    async fn room_count(&self) -> usize;
}
