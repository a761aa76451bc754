//! WebSocket signaling relay for multi-party video meetings.
//!
//! Coordinates rooms, relays WebRTC negotiation frames between peers, and
//! broadcasts chat, caption, and sign-language events. Media itself flows
//! peer-to-peer and never touches this server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 0.0.0.0 --port 3000
//! cargo run --bin hiroba-server -- --prediction-url http://localhost:5000
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;

use hiroba_server::{
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        prediction::PredictionClient,
        repository::{InMemoryConnectionRegistry, InMemoryRoomRepository},
    },
    ui::{Server, state::AppState},
    usecase::{
        CreateRoomUseCase, DisconnectParticipantUseCase, JoinRoomUseCase, RelaySignalUseCase,
        SendCaptionUseCase, SendChatMessageUseCase, SendSignLanguageUseCase, ToggleMediaUseCase,
    },
};
use hiroba_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "WebSocket signaling relay for multi-party video meetings", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Base URL of the sign-language prediction service. When absent the
    /// prediction proxy endpoint responds 503.
    #[arg(long)]
    prediction_url: Option<String>,

    /// Timeout for prediction service requests, in seconds
    #[arg(long, default_value = "10")]
    prediction_timeout_secs: u64,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repository and registry
    // 2. MessagePusher
    // 3. External services
    // 4. UseCases
    // 5. AppState and Server

    // 1. Create the room store and the connection registry (in-memory)
    let rooms = Arc::new(InMemoryRoomRepository::new());
    let registry = Arc::new(InMemoryConnectionRegistry::new());

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Create the prediction client, if configured
    let prediction = match args.prediction_url {
        Some(url) => {
            match PredictionClient::new(url, Duration::from_secs(args.prediction_timeout_secs)) {
                Ok(client) => {
                    tracing::info!("Sign-language prediction proxy enabled");
                    Some(Arc::new(client))
                }
                Err(e) => {
                    tracing::error!("Failed to build prediction client: {}", e);
                    std::process::exit(1);
                }
            }
        }
        None => {
            tracing::info!("Sign-language prediction proxy disabled");
            None
        }
    };

    // 4. Create UseCases
    let create_room_usecase = Arc::new(CreateRoomUseCase::new(rooms.clone()));
    let join_room_usecase = Arc::new(JoinRoomUseCase::new(
        rooms.clone(),
        registry.clone(),
        message_pusher.clone(),
    ));
    let relay_signal_usecase = Arc::new(RelaySignalUseCase::new(message_pusher.clone()));
    let toggle_media_usecase = Arc::new(ToggleMediaUseCase::new(
        rooms.clone(),
        message_pusher.clone(),
    ));
    let send_chat_message_usecase = Arc::new(SendChatMessageUseCase::new(
        rooms.clone(),
        message_pusher.clone(),
    ));
    let send_caption_usecase = Arc::new(SendCaptionUseCase::new(
        rooms.clone(),
        message_pusher.clone(),
    ));
    let send_sign_language_usecase = Arc::new(SendSignLanguageUseCase::new(
        rooms.clone(),
        message_pusher.clone(),
    ));
    let disconnect_participant_usecase = Arc::new(DisconnectParticipantUseCase::new(
        rooms.clone(),
        registry.clone(),
        message_pusher.clone(),
    ));

    // 5. Create and run the server
    let server = Server::new(AppState {
        create_room_usecase,
        join_room_usecase,
        relay_signal_usecase,
        toggle_media_usecase,
        send_chat_message_usecase,
        send_caption_usecase,
        send_sign_language_usecase,
        disconnect_participant_usecase,
        registry,
        message_pusher,
        rooms,
        prediction,
    });
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
