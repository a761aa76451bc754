//! Use-case errors.
//!
//! The relay is a best-effort fire-and-forget channel: events that cannot be
//! routed are dropped silently, never answered with an error frame. These
//! variants exist so the transport layer can log why an event was dropped.

use thiserror::Error;

/// Why an inbound event was dropped without any reply to the sender.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DropReason {
    #[error("message text is empty")]
    EmptyText,
    /// The referenced room does not exist (it may have been deleted when its
    /// last member left).
    #[error("room '{0}' does not exist")]
    UnknownRoom(String),
    /// The target connection no longer exists; peer negotiation failure
    /// surfaces through the peer's own connection state, not through the
    /// relay.
    #[error("target connection '{0}' is gone")]
    UnknownTarget(String),
}
