//! UseCase: point-to-point signaling relay (`offer`, `answer`,
//! `ice-candidate`).
//!
//! The relay trusts the explicit `targetConnectionId` and never inspects
//! the payload; no room lookup is involved. A target that disconnected
//! mid-negotiation is a silent no-op.

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher};

use super::error::DropReason;

pub struct RelaySignalUseCase {
    message_pusher: Arc<dyn MessagePusher>,
}

impl RelaySignalUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// Forward an already-encoded frame to a single connection.
    pub async fn execute(&self, target: &ConnectionId, frame: &str) -> Result<(), DropReason> {
        match self.message_pusher.push_to(target, frame).await {
            Ok(()) => Ok(()),
            Err(MessagePushError::ConnectionNotFound(id)) => Err(DropReason::UnknownTarget(id)),
            // A closed channel means the target is tearing down right now.
            Err(MessagePushError::PushFailed(_)) => {
                Err(DropReason::UnknownTarget(target.as_str().to_string()))
            }
        }
    }
}
