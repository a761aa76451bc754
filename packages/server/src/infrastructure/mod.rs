//! Infrastructure layer: concrete implementations of the domain traits
//! (in-memory stores, WebSocket message pusher), wire DTOs, and the
//! prediction-service HTTP client.

pub mod dto;
pub mod message_pusher;
pub mod prediction;
pub mod repository;
