//! Domain-level errors.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A room id from the wire was empty or whitespace-only.
    #[error("room id must not be empty")]
    EmptyRoomId,
}
