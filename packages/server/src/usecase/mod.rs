//! Use-case layer: one use case per relay operation. Each use case depends
//! only on the domain traits; concrete stores and pushers are injected.

mod create_room;
mod disconnect_participant;
mod error;
mod join_room;
mod relay_signal;
mod send_caption;
mod send_chat_message;
mod send_sign_language;
mod toggle_media;

pub use create_room::CreateRoomUseCase;
pub use disconnect_participant::{DisconnectOutcome, DisconnectParticipantUseCase};
pub use error::DropReason;
pub use join_room::{JoinRoomUseCase, JoinSummary, PreviousRoom};
pub use relay_signal::RelaySignalUseCase;
pub use send_caption::SendCaptionUseCase;
pub use send_chat_message::SendChatMessageUseCase;
pub use send_sign_language::SendSignLanguageUseCase;
pub use toggle_media::ToggleMediaUseCase;
