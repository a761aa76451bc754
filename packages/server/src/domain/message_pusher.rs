//! MessagePusher trait: outbound delivery abstraction.
//!
//! The use-case layer routes events through this trait; the WebSocket
//! implementation lives in the infrastructure layer. Delivery is decoupled
//! per connection (one unbounded channel each), so a slow consumer only
//! affects its own connection, never room-wide delivery.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::value_object::ConnectionId;

/// Sender half of a connection's outbound channel. The receiving half is
/// drained by that connection's WebSocket writer task.
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[derive(Debug, Error)]
pub enum MessagePushError {
    /// The target connection is not registered (it may have disconnected
    /// mid-negotiation). Callers treat this as a silent no-op.
    #[error("connection '{0}' is not registered")]
    ConnectionNotFound(String),
    #[error("failed to push message: {0}")]
    PushFailed(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Register a connection's outbound channel. Called when the transport
    /// session opens.
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// Remove a connection's outbound channel. Idempotent.
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// Deliver a frame to a single connection.
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError>;

    /// Deliver a frame to every target, skipping ones that are gone.
    /// Partial failure is tolerated; this is a best-effort channel.
    async fn broadcast(&self, targets: Vec<ConnectionId>, content: &str);
}
