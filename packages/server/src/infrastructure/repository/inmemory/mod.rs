//! In-memory implementations of the room store and connection registry.
//! All state lives for the process lifetime only.

mod connection;
mod room;

pub use connection::InMemoryConnectionRegistry;
pub use room::InMemoryRoomRepository;
