//! ConnectionRegistry trait: per-connection identity and room association.
//!
//! Invariant: every connection id present in any room's member set has a
//! registry record. The reverse is not required; a registered connection
//! that has not joined a room yet is valid.

use async_trait::async_trait;

use super::entity::ConnectionRecord;
use super::value_object::{ConnectionId, DisplayName, RoomId, UserId};

#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// Create an empty record when a transport session opens.
    async fn register(&self, connection_id: ConnectionId);

    /// Overwrite the identity fields on join.
    async fn set_identity(
        &self,
        connection_id: &ConnectionId,
        user_id: Option<UserId>,
        display_name: DisplayName,
        room_id: RoomId,
    );

    async fn lookup(&self, connection_id: &ConnectionId) -> Option<ConnectionRecord>;

    /// Batch lookup preserving input order; ids without a record are
    /// skipped. Used to build participant lists.
    async fn lookup_many(
        &self,
        connection_ids: &[ConnectionId],
    ) -> Vec<(ConnectionId, ConnectionRecord)>;

    /// Remove the record on disconnect and return the room the connection
    /// belonged to, so the caller can remove it from that room. Idempotent;
    /// returns `None` if the record is gone or never joined a room.
    async fn unregister(&self, connection_id: &ConnectionId) -> Option<RoomId>;
}
