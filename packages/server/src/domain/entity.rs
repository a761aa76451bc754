//! Entities of the signaling domain: meeting rooms, chat messages, and
//! per-connection records.

use std::collections::{HashSet, VecDeque};

use super::value_object::{ConnectionId, DisplayName, RoomId, Timestamp, UserId};

/// Maximum number of chat messages retained per room. Oldest entries are
/// evicted first (FIFO; there is no re-read pattern that would justify LRU).
pub const CHAT_LOG_CAPACITY: usize = 200;

/// One chat message record. Immutable once appended to a room's log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub text: String,
    pub sender_display_name: DisplayName,
    pub sender_user_id: Option<UserId>,
    pub sender_connection_id: ConnectionId,
    pub timestamp: Timestamp,
}

impl ChatMessage {
    pub fn new(
        text: String,
        sender_display_name: DisplayName,
        sender_user_id: Option<UserId>,
        sender_connection_id: ConnectionId,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            text,
            sender_display_name,
            sender_user_id,
            sender_connection_id,
            timestamp,
        }
    }
}

/// A named group of connections exchanging signaling and chat events.
///
/// Rooms reference connections by id only; the records themselves are owned
/// by the connection registry. A room with zero members is deleted by the
/// room store immediately, so an instance reachable through the store always
/// has at least one member (except in the window of its very first join).
#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    members: HashSet<ConnectionId>,
    chat_log: VecDeque<ChatMessage>,
    pub created_at: Timestamp,
}

impl Room {
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self {
            id,
            members: HashSet::new(),
            chat_log: VecDeque::new(),
            created_at,
        }
    }

    /// Add a member. Idempotent; returns `true` if the connection was not
    /// already a member.
    pub fn add_member(&mut self, connection_id: ConnectionId) -> bool {
        self.members.insert(connection_id)
    }

    /// Remove a member; returns `true` if it was present.
    pub fn remove_member(&mut self, connection_id: &ConnectionId) -> bool {
        self.members.remove(connection_id)
    }

    pub fn has_member(&self, connection_id: &ConnectionId) -> bool {
        self.members.contains(connection_id)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn member_ids(&self) -> Vec<ConnectionId> {
        self.members.iter().cloned().collect()
    }

    pub fn member_ids_except(&self, exclude: &ConnectionId) -> Vec<ConnectionId> {
        self.members
            .iter()
            .filter(|id| *id != exclude)
            .cloned()
            .collect()
    }

    /// Append a chat message, evicting the oldest entries beyond
    /// [`CHAT_LOG_CAPACITY`]. O(1) per append.
    pub fn append_chat(&mut self, message: ChatMessage) {
        self.chat_log.push_back(message);
        while self.chat_log.len() > CHAT_LOG_CAPACITY {
            self.chat_log.pop_front();
        }
    }

    /// Snapshot of the chat log, oldest first.
    pub fn chat_history(&self) -> Vec<ChatMessage> {
        self.chat_log.iter().cloned().collect()
    }

    pub fn chat_log_len(&self) -> usize {
        self.chat_log.len()
    }
}

/// Per-connection state: chosen identity and current room.
///
/// Exclusively owned by the connection registry; rooms hold only the
/// connection id. A connection belongs to at most one room at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionRecord {
    pub user_id: Option<UserId>,
    pub display_name: DisplayName,
    pub room_id: Option<RoomId>,
}

impl ConnectionRecord {
    /// Empty record created when the transport session opens, before any
    /// `join-room` has been seen.
    pub fn new() -> Self {
        Self {
            user_id: None,
            display_name: DisplayName::default(),
            room_id: None,
        }
    }
}

impl Default for ConnectionRecord {
    fn default() -> Self {
        Self::new()
    }
}
