//! WebSocket-backed MessagePusher.
//!
//! The UI layer accepts the WebSocket and creates one unbounded channel per
//! connection; this implementation keeps the sender halves and performs all
//! outbound delivery. Sends never block: a slow consumer only grows its own
//! channel, it cannot stall delivery to other members of a broadcast.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel};

/// WebSocket [`MessagePusher`] implementation.
pub struct WebSocketMessagePusher {
    clients: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(connection_id.clone(), sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(connection_id);
        tracing::debug!(
            "Connection '{}' unregistered from MessagePusher",
            connection_id
        );
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;

        let Some(sender) = clients.get(connection_id) else {
            return Err(MessagePushError::ConnectionNotFound(
                connection_id.as_str().to_string(),
            ));
        };
        sender
            .send(content.to_string())
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed message to connection '{}'", connection_id);
        Ok(())
    }

    async fn broadcast(&self, targets: Vec<ConnectionId>, content: &str) {
        let clients = self.clients.lock().await;

        for target in targets {
            match clients.get(&target) {
                Some(sender) => {
                    // Partial failure is tolerated on broadcast.
                    if let Err(e) = sender.send(content.to_string()) {
                        tracing::warn!("Failed to push message to connection '{}': {}", target, e);
                    }
                }
                None => {
                    tracing::debug!("Connection '{}' gone during broadcast, skipping", target);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn create_test_pusher() -> WebSocketMessagePusher {
        WebSocketMessagePusher::new()
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // given:
        let pusher = create_test_pusher();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let conn = ConnectionId::generate();
        pusher.register_client(conn.clone(), tx).await;

        // when:
        let result = pusher.push_to(&conn, "Hello").await;

        // then:
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some("Hello".to_string()));
    }

    #[tokio::test]
    async fn test_push_to_unknown_connection_is_an_error() {
        // given:
        let pusher = create_test_pusher();
        let conn = ConnectionId::generate();

        // when:
        let result = pusher.push_to(&conn, "Hello").await;

        // then:
        assert!(matches!(
            result.unwrap_err(),
            MessagePushError::ConnectionNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_broadcast_reaches_all_targets() {
        // given:
        let pusher = create_test_pusher();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        pusher.register_client(alice.clone(), tx1).await;
        pusher.register_client(bob.clone(), tx2).await;

        // when:
        pusher.broadcast(vec![alice, bob], "Broadcast message").await;

        // then:
        assert_eq!(rx1.recv().await, Some("Broadcast message".to_string()));
        assert_eq!(rx2.recv().await, Some("Broadcast message".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_skips_gone_connections() {
        // given:
        let pusher = create_test_pusher();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let alice = ConnectionId::generate();
        let gone = ConnectionId::generate();
        pusher.register_client(alice.clone(), tx1).await;

        // when:
        pusher.broadcast(vec![alice, gone], "Broadcast message").await;

        // then: delivery to the live connection still happens
        assert_eq!(rx1.recv().await, Some("Broadcast message".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_with_no_targets_is_a_noop() {
        // given:
        let pusher = create_test_pusher();

        // when / then: no panic
        pusher.broadcast(vec![], "Message").await;
    }

    #[tokio::test]
    async fn test_unregister_makes_push_fail() {
        // given:
        let pusher = create_test_pusher();
        let (tx, _rx) = mpsc::unbounded_channel();
        let conn = ConnectionId::generate();
        pusher.register_client(conn.clone(), tx).await;

        // when:
        pusher.unregister_client(&conn).await;
        let result = pusher.push_to(&conn, "Hello").await;

        // then:
        assert!(result.is_err());
    }
}
