//! Data transfer objects for the WebSocket signaling protocol and the HTTP
//! API, plus conversions from domain entities.

mod conversion;
pub mod http;
pub mod websocket;
