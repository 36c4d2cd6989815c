//! WebRTC signaling relay library.
//!
//! Peers join named rooms over WebSocket, learn about each other through
//! presence events and exchange opaque negotiation payloads. The server never
//! interprets those payloads.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
