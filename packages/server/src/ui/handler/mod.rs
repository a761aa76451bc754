//! HTTP and WebSocket endpoint handlers.

mod http;
mod websocket;

pub use http::{create_room, get_rooms, health_check, predict_sign};
pub use websocket::websocket_handler;
