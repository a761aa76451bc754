//! Server state shared across handlers.

use std::sync::Arc;

use crate::domain::{ConnectionRegistry, MessagePusher, RoomRepository};
use crate::infrastructure::prediction::PredictionClient;
use crate::usecase::{
    CreateRoomUseCase, DisconnectParticipantUseCase, JoinRoomUseCase, RelaySignalUseCase,
    SendCaptionUseCase, SendChatMessageUseCase, SendSignLanguageUseCase, ToggleMediaUseCase,
};

/// Shared application state
pub struct AppState {
    pub create_room_usecase: Arc<CreateRoomUseCase>,
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    pub relay_signal_usecase: Arc<RelaySignalUseCase>,
    pub toggle_media_usecase: Arc<ToggleMediaUseCase>,
    pub send_chat_message_usecase: Arc<SendChatMessageUseCase>,
    pub send_caption_usecase: Arc<SendCaptionUseCase>,
    pub send_sign_language_usecase: Arc<SendSignLanguageUseCase>,
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// Connection ledger, shared with the use cases.
    pub registry: Arc<dyn ConnectionRegistry>,
    /// Delivery channels, shared with the use cases.
    pub message_pusher: Arc<dyn MessagePusher>,
    /// Room store, shared with the use cases.
    pub rooms: Arc<dyn RoomRepository>,
    /// Optional sign-language prediction backend. `None` disables the proxy.
    pub prediction: Option<Arc<PredictionClient>>,
}
