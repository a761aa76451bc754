//! Value objects of the signaling domain.

use std::fmt;

use rand::Rng;
use uuid::Uuid;

use super::error::DomainError;

/// Identifier of one live transport session (roughly one browser tab).
///
/// Assigned by the server when the WebSocket opens; never chosen by the
/// client. Inbound `targetConnectionId` fields are parsed into this type
/// without validation because unknown targets are a silent no-op anyway.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Wrap a raw id received from a client (e.g. a signaling target).
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Generate a fresh transport-assigned id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a meeting room.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomId(String);

impl RoomId {
    /// Validate and wrap a client-supplied room id.
    pub fn new(id: String) -> Result<Self, DomainError> {
        if id.trim().is_empty() {
            return Err(DomainError::EmptyRoomId);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

const ROOM_ID_LEN: usize = 7;
const ROOM_ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Generator of short opaque room ids.
///
/// Uniqueness among live rooms is the room store's responsibility; the
/// store re-draws on the rare collision.
pub struct RoomIdFactory;

impl RoomIdFactory {
    pub fn generate() -> RoomId {
        let mut rng = rand::thread_rng();
        let id: String = (0..ROOM_ID_LEN)
            .map(|_| ROOM_ID_ALPHABET[rng.gen_range(0..ROOM_ID_ALPHABET.len())] as char)
            .collect();
        RoomId(id)
    }
}

/// Client-supplied opaque identity, used for "is this me" comparisons
/// across reconnects. Not validated and not guaranteed unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Display name shown to other participants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    pub const DEFAULT: &'static str = "Anonymous";

    /// Build from an optional client-supplied name; blank or absent names
    /// fall back to [`DisplayName::DEFAULT`].
    pub fn new(name: Option<String>) -> Self {
        match name {
            Some(n) if !n.trim().is_empty() => Self(n),
            _ => Self(Self::DEFAULT.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Default for DisplayName {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Unix epoch milliseconds (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_connection_id_generate_is_unique() {
        // given:

        // when:
        let ids: HashSet<String> = (0..100)
            .map(|_| ConnectionId::generate().into_string())
            .collect();

        // then:
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_room_id_rejects_empty_string() {
        // given:
        let raw = "   ".to_string();

        // when:
        let result = RoomId::new(raw);

        // then:
        assert_eq!(result, Err(DomainError::EmptyRoomId));
    }

    #[test]
    fn test_room_id_accepts_client_chosen_id() {
        // given:
        let raw = "abc".to_string();

        // when:
        let result = RoomId::new(raw);

        // then:
        assert_eq!(result.unwrap().as_str(), "abc");
    }

    #[test]
    fn test_room_id_factory_generates_short_lowercase_ids() {
        // given:

        // when:
        let id = RoomIdFactory::generate();

        // then:
        assert_eq!(id.as_str().len(), ROOM_ID_LEN);
        assert!(
            id.as_str()
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn test_display_name_defaults_to_anonymous() {
        // given:

        // when:
        let absent = DisplayName::new(None);
        let blank = DisplayName::new(Some("  ".to_string()));
        let named = DisplayName::new(Some("Alice".to_string()));

        // then:
        assert_eq!(absent.as_str(), "Anonymous");
        assert_eq!(blank.as_str(), "Anonymous");
        assert_eq!(named.as_str(), "Alice");
    }
}
