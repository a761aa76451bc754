//! Domain layer: value objects, entities, and the traits the use-case layer
//! depends on. Concrete implementations live in the infrastructure layer
//! (dependency inversion).

mod entity;
mod error;
mod message_pusher;
mod registry;
mod repository;
mod value_object;

pub use entity::{CHAT_LOG_CAPACITY, ChatMessage, ConnectionRecord, Room};
pub use error::DomainError;
pub use message_pusher::{MessagePushError, MessagePusher, PusherChannel};
pub use registry::ConnectionRegistry;
pub use repository::{JoinOutcome, RemoveOutcome, RoomLease, RoomRepository, RoomSummary};
pub use value_object::{ConnectionId, DisplayName, RoomId, RoomIdFactory, Timestamp, UserId};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
