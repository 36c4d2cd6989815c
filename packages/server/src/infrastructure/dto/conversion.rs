//! Conversion logic between domain models and DTOs.

use sigrelay_shared::time::timestamp_to_rfc3339;

use crate::domain::{Member, PeerSummary, Room, SignalEvent};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// Domain Event → WebSocket DTO
// ========================================

impl From<&PeerSummary> for dto::PeerPayload {
    fn from(peer: &PeerSummary) -> Self {
        Self {
            sid: peer.sid.as_str().to_string(),
            username: peer.username.as_str().to_string(),
        }
    }
}

impl From<&SignalEvent> for dto::OutboundMessage {
    fn from(event: &SignalEvent) -> Self {
        match event {
            SignalEvent::Error { message } => Self::Error(dto::ErrorPayload {
                message: message.clone(),
            }),
            SignalEvent::Ready { username, peers } => Self::Ready(dto::ReadyPayload {
                username: username.as_str().to_string(),
                peers: peers.iter().map(dto::PeerPayload::from).collect(),
            }),
            SignalEvent::NewPeer { sid, username } => Self::NewPeer(dto::PeerPayload {
                sid: sid.as_str().to_string(),
                username: username.as_str().to_string(),
            }),
            SignalEvent::Data {
                username,
                room,
                sender_id,
                data,
            } => Self::Data(dto::RelayedDataPayload {
                username: username.as_str().to_string(),
                room: room.as_str().to_string(),
                sender_id: sender_id.as_str().to_string(),
                data: data.as_value().clone(),
            }),
            SignalEvent::PeerLeft { sid, username } => Self::PeerLeft(dto::PeerPayload {
                sid: sid.as_str().to_string(),
                username: username.as_str().to_string(),
            }),
        }
    }
}

/// Serialize a domain event into a WebSocket text frame
pub fn encode_event(event: &SignalEvent) -> Result<String, serde_json::Error> {
    serde_json::to_string(&dto::OutboundMessage::from(event))
}

// ========================================
// Domain Entity → HTTP DTO
// ========================================

impl From<&Room> for http::RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            name: room.name.as_str().to_string(),
            members: room
                .members
                .iter()
                .map(|m| m.display_name.as_str().to_string())
                .collect(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}

impl From<&Member> for http::MemberDetailDto {
    fn from(member: &Member) -> Self {
        Self {
            sid: member.connection_id.as_str().to_string(),
            username: member.display_name.as_str().to_string(),
            joined_at: timestamp_to_rfc3339(member.joined_at.value()),
        }
    }
}

impl From<&Room> for http::RoomDetailDto {
    fn from(room: &Room) -> Self {
        Self {
            name: room.name.as_str().to_string(),
            members: room.members.iter().map(http::MemberDetailDto::from).collect(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionId, DisplayName, RoomName, Timestamp};

    fn member(id: &str, name: &str) -> Member {
        Member::new(
            ConnectionId::new(id.to_string()).unwrap(),
            DisplayName::new(name.to_string()).unwrap(),
            Timestamp::new(1672531200000),
        )
    }

    #[test]
    fn test_ready_event_to_dto() {
        // テスト項目: ready イベントが joiner の名前と既存ピア一覧を持つ DTO に変換される
        // given (前提条件):
        let alice = member("sid-a", "Alice");
        let event = SignalEvent::Ready {
            username: DisplayName::new("Bob".to_string()).unwrap(),
            peers: vec![PeerSummary::from(&alice)],
        };

        // when (操作):
        let dto_msg = dto::OutboundMessage::from(&event);

        // then (期待する結果):
        assert_eq!(
            dto_msg,
            dto::OutboundMessage::Ready(dto::ReadyPayload {
                username: "Bob".to_string(),
                peers: vec![dto::PeerPayload {
                    sid: "sid-a".to_string(),
                    username: "Alice".to_string(),
                }],
            })
        );
    }

    #[test]
    fn test_encode_error_event() {
        // テスト項目: error イベントが JSON フレームにエンコードされる
        // given (前提条件):
        let event = SignalEvent::error("Username and room are required!");

        // when (操作):
        let frame = encode_event(&event).unwrap();

        // then (期待する結果):
        assert_eq!(
            frame,
            r#"{"event":"error","payload":{"message":"Username and room are required!"}}"#
        );
    }

    #[test]
    fn test_room_to_http_dtos() {
        // テスト項目: Room が一覧用・詳細用の HTTP DTO に変換される
        // given (前提条件):
        let mut room = Room::new(
            RoomName::new("r1".to_string()).unwrap(),
            Timestamp::new(1672531200000),
        );
        room.add_member(member("sid-a", "Alice"));
        room.add_member(member("sid-b", "Bob"));

        // when (操作):
        let summary = http::RoomSummaryDto::from(&room);
        let detail = http::RoomDetailDto::from(&room);

        // then (期待する結果):
        assert_eq!(summary.name, "r1");
        assert_eq!(summary.members, vec!["Alice", "Bob"]);
        assert_eq!(summary.created_at, "2023-01-01T00:00:00+00:00");
        assert_eq!(detail.members.len(), 2);
        assert_eq!(detail.members[1].sid, "sid-b");
        assert_eq!(detail.members[1].joined_at, "2023-01-01T00:00:00+00:00");
    }
}
