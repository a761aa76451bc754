//! Hiroba signaling server library.
//!
//! Server-side core of a multi-party video meeting application: meeting room
//! lifecycle, per-connection identity, and best-effort relay of WebRTC
//! negotiation messages and auxiliary real-time events (chat, captions,
//! sign-language state) between connected peers.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
