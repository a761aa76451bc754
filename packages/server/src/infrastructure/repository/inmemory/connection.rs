//! In-memory connection registry.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, ConnectionRecord, ConnectionRegistry, DisplayName, RoomId, UserId,
};

/// In-memory [`ConnectionRegistry`] implementation.
pub struct InMemoryConnectionRegistry {
    connections: Mutex<HashMap<ConnectionId, ConnectionRecord>>,
}

impl InMemoryConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn register(&self, connection_id: ConnectionId) {
        let mut connections = self.connections.lock().await;
        connections.insert(connection_id.clone(), ConnectionRecord::new());
        tracing::debug!("Connection '{}' registered", connection_id);
    }

    async fn set_identity(
        &self,
        connection_id: &ConnectionId,
        user_id: Option<UserId>,
        display_name: DisplayName,
        room_id: RoomId,
    ) {
        let mut connections = self.connections.lock().await;
        // A join racing a disconnect may arrive after unregister; recreating
        // the record here would leak it, so the entry is only updated.
        if let Some(record) = connections.get_mut(connection_id) {
            record.user_id = user_id;
            record.display_name = display_name;
            record.room_id = Some(room_id);
        } else {
            tracing::debug!(
                "Ignoring identity for unregistered connection '{}'",
                connection_id
            );
        }
    }

    async fn lookup(&self, connection_id: &ConnectionId) -> Option<ConnectionRecord> {
        let connections = self.connections.lock().await;
        connections.get(connection_id).cloned()
    }

    async fn lookup_many(
        &self,
        connection_ids: &[ConnectionId],
    ) -> Vec<(ConnectionId, ConnectionRecord)> {
        let connections = self.connections.lock().await;
        connection_ids
            .iter()
            .filter_map(|id| connections.get(id).map(|r| (id.clone(), r.clone())))
            .collect()
    }

    async fn unregister(&self, connection_id: &ConnectionId) -> Option<RoomId> {
        let mut connections = self.connections.lock().await;
        let record = connections.remove(connection_id);
        tracing::debug!("Connection '{}' unregistered", connection_id);
        record.and_then(|r| r.room_id)
    }
}
