//! WebSocket wire protocol.
//!
//! Every frame is a JSON object `{"event": <name>, "data": {...}}` in both
//! directions. Event names are kebab-case and field names camelCase; both
//! are the contract with the browser client and must not change.
//!
//! Signaling payloads (`offer`, `answer`, `candidate`) are opaque
//! `serde_json::Value`s: the relay forwards them verbatim and never
//! inspects their contents.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Inbound events, decoded from client frames.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    JoinRoom(JoinRoomData),
    Offer(OfferData),
    Answer(AnswerData),
    IceCandidate(IceCandidateData),
    ToggleAudio(ToggleAudioData),
    ToggleVideo(ToggleVideoData),
    ChatMessage(ChatMessageData),
    Caption(CaptionData),
    SignLanguage(SignLanguageData),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomData {
    #[serde(default)]
    pub room_id: String,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferData {
    pub offer: Value,
    pub target_connection_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerData {
    pub answer: Value,
    pub target_connection_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidateData {
    pub candidate: Value,
    pub target_connection_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleAudioData {
    #[serde(default)]
    pub room_id: String,
    pub audio_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleVideoData {
    #[serde(default)]
    pub room_id: String,
    pub video_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageData {
    #[serde(default)]
    pub room_id: String,
    #[serde(default)]
    pub message: String,
    pub user_name: Option<String>,
    pub user_id: Option<String>,
    pub timestamp: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionData {
    #[serde(default)]
    pub room_id: String,
    #[serde(default)]
    pub caption: String,
    pub user_name: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignLanguageData {
    #[serde(default)]
    pub room_id: String,
    /// Committed letter sequence, forwarded verbatim.
    #[serde(default)]
    pub sequence: Value,
    /// Current word in progress.
    pub text: Option<String>,
    /// Committed words. Defaults to an empty array when absent or not an
    /// array; an empty state is a meaningful "clear my display" message.
    #[serde(default)]
    pub sentence: Value,
    pub user_name: Option<String>,
    pub user_id: Option<String>,
}

/// Outbound events, encoded into server frames.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    ExistingParticipants(Vec<ParticipantDto>),
    ChatHistory(Vec<ChatMessageDto>),
    UserJoined(ParticipantDto),
    Offer(OfferForwardDto),
    Answer(AnswerForwardDto),
    IceCandidate(IceCandidateForwardDto),
    UserAudioChanged(MediaStateDto),
    UserVideoChanged(MediaStateDto),
    ChatMessage(ChatMessageDto),
    Caption(CaptionDto),
    SignLanguage(SignLanguageDto),
    UserLeft(UserLeftDto),
}

impl ServerEvent {
    /// Serialize into a wire frame. Server events are plain data and always
    /// serialize.
    pub fn to_frame(&self) -> String {
        serde_json::to_string(self).expect("server event serializes")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDto {
    pub connection_id: String,
    pub user_id: Option<String>,
    pub user_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageDto {
    pub message: String,
    pub user_name: String,
    pub user_id: Option<String>,
    pub connection_id: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferForwardDto {
    pub offer: Value,
    /// The sender's connection id, attached by the relay.
    pub connection_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerForwardDto {
    pub answer: Value,
    pub connection_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidateForwardDto {
    pub candidate: Value,
    pub connection_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaStateDto {
    pub connection_id: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionDto {
    pub caption: String,
    pub user_name: String,
    pub user_id: Option<String>,
    pub connection_id: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignLanguageDto {
    pub sequence: Value,
    pub text: String,
    pub sentence: Value,
    pub user_name: String,
    pub user_id: Option<String>,
    pub connection_id: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLeftDto {
    pub connection_id: String,
}
