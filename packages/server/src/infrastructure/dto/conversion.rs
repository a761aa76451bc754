//! Conversion logic between domain entities and wire DTOs.

use crate::domain::{ChatMessage, ConnectionId, ConnectionRecord};
use crate::infrastructure::dto::websocket as dto;

impl From<ChatMessage> for dto::ChatMessageDto {
    fn from(message: ChatMessage) -> Self {
        Self {
            message: message.text,
            user_name: message.sender_display_name.into_string(),
            user_id: message.sender_user_id.map(|id| id.into_string()),
            connection_id: message.sender_connection_id.into_string(),
            timestamp: message.timestamp.value(),
        }
    }
}

impl From<(ConnectionId, ConnectionRecord)> for dto::ParticipantDto {
    fn from((connection_id, record): (ConnectionId, ConnectionRecord)) -> Self {
        Self {
            connection_id: connection_id.into_string(),
            user_id: record.user_id.map(|id| id.into_string()),
            user_name: record.display_name.into_string(),
        }
    }
}
