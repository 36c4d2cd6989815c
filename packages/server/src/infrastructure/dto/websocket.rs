//! WebSocket event DTOs.
//!
//! Every frame is a JSON text message wrapped in an envelope:
//!
//! ```json
//! {"event": "join", "payload": {"username": "Alice", "room": "r1"}}
//! ```

use serde::{Deserialize, Serialize};

/// Inbound event from a client
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum InboundMessage {
    /// A missing or `null` payload is a join with every field missing
    Join(Option<JoinPayload>),
    Data(Option<DataPayload>),
}

/// `join` payload. Every field is optional on the wire so that missing
/// fields are reported back to the sender instead of failing the parse.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct JoinPayload {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub room: Option<String>,
}

/// `data` payload (both relay variants)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DataPayload {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default, rename = "targetPeerId")]
    pub target_peer_id: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// Outbound event to a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum OutboundMessage {
    Error(ErrorPayload),
    Ready(ReadyPayload),
    NewPeer(PeerPayload),
    Data(RelayedDataPayload),
    PeerLeft(PeerPayload),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadyPayload {
    pub username: String,
    pub peers: Vec<PeerPayload>,
}

/// Peer reference used by `ready.peers`, `new_peer` and `peer_left`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerPayload {
    pub sid: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayedDataPayload {
    pub username: String,
    pub room: String,
    #[serde(rename = "senderId")]
    pub sender_id: String,
    pub data: serde_json::Value,
}
