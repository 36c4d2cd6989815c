//! エンティティ
//!
//! - `Room`: ルーム名とメンバー集合（参加順を保持）
//! - `Member`: ルームに所属する接続（接続 ID と表示名）
//! - `Identity`: Registry 上の接続に紐づく（表示名, ルーム名）

use serde::Serialize;

use super::value_object::{ConnectionId, DisplayName, RoomName, Timestamp};

/// ルームのメンバー
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    pub connection_id: ConnectionId,
    pub display_name: DisplayName,
    pub joined_at: Timestamp,
}

impl Member {
    pub fn new(connection_id: ConnectionId, display_name: DisplayName, joined_at: Timestamp) -> Self {
        Self {
            connection_id,
            display_name,
            joined_at,
        }
    }
}

/// Registry 上の接続の所属情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub display_name: DisplayName,
    pub room_name: RoomName,
}

/// ルーム
///
/// メンバーは参加順に保持されます。同じ接続 ID は 1 度しか現れません。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Room {
    pub name: RoomName,
    pub members: Vec<Member>,
    pub created_at: Timestamp,
}

impl Room {
    pub fn new(name: RoomName, created_at: Timestamp) -> Self {
        Self {
            name,
            members: Vec::new(),
            created_at,
        }
    }

    /// メンバーを追加する。同じ接続 ID が既にいる場合は表示名を置き換える
    pub fn add_member(&mut self, member: Member) {
        match self
            .members
            .iter_mut()
            .find(|m| m.connection_id == member.connection_id)
        {
            Some(existing) => *existing = member,
            None => self.members.push(member),
        }
    }

    /// メンバーを削除し、削除したメンバーを返す
    pub fn remove_member(&mut self, connection_id: &ConnectionId) -> Option<Member> {
        let index = self
            .members
            .iter()
            .position(|m| &m.connection_id == connection_id)?;
        Some(self.members.remove(index))
    }

    /// 同じ表示名を持つ、指定した接続以外のメンバーの接続 ID（再接続で古くなったセッション）
    pub fn stale_members_named(
        &self,
        display_name: &DisplayName,
        exclude: &ConnectionId,
    ) -> Vec<ConnectionId> {
        self.members
            .iter()
            .filter(|m| &m.display_name == display_name && &m.connection_id != exclude)
            .map(|m| m.connection_id.clone())
            .collect()
    }

    /// 指定した接続以外のメンバー
    pub fn members_except(&self, exclude: &ConnectionId) -> Vec<Member> {
        self.members
            .iter()
            .filter(|m| &m.connection_id != exclude)
            .cloned()
            .collect()
    }

    pub fn connection_ids(&self) -> Vec<ConnectionId> {
        self.members.iter().map(|m| m.connection_id.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: &str, name: &str) -> Member {
        Member::new(
            ConnectionId::new(id.to_string()).unwrap(),
            DisplayName::new(name.to_string()).unwrap(),
            Timestamp::new(1000),
        )
    }

    fn room() -> Room {
        Room::new(RoomName::new("r1".to_string()).unwrap(), Timestamp::new(0))
    }

    #[test]
    fn test_add_member_keeps_join_order() {
        // テスト項目: メンバーは参加順に保持される
        // given (前提条件):
        let mut room = room();

        // when (操作):
        room.add_member(member("c", "Carol"));
        room.add_member(member("a", "Alice"));
        room.add_member(member("b", "Bob"));

        // then (期待する結果):
        let ids: Vec<&str> = room.members.iter().map(|m| m.connection_id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_add_member_same_connection_replaces() {
        // テスト項目: 同じ接続 ID で追加すると重複せず置き換えられる
        // given (前提条件):
        let mut room = room();
        room.add_member(member("a", "Alice"));

        // when (操作):
        room.add_member(member("a", "Alicia"));

        // then (期待する結果):
        assert_eq!(room.len(), 1);
        assert_eq!(room.members[0].display_name.as_str(), "Alicia");
    }

    #[test]
    fn test_remove_member() {
        // テスト項目: メンバー削除で削除されたメンバーが返り、存在しない場合は None
        // given (前提条件):
        let mut room = room();
        room.add_member(member("a", "Alice"));
        let a = ConnectionId::new("a".to_string()).unwrap();

        // when (操作):
        let removed = room.remove_member(&a);
        let removed_again = room.remove_member(&a);

        // then (期待する結果):
        assert_eq!(removed.unwrap().display_name.as_str(), "Alice");
        assert!(removed_again.is_none());
        assert!(room.is_empty());
    }

    #[test]
    fn test_stale_members_named_excludes_self() {
        // テスト項目: 同名の古いセッションのみが抽出され、自分自身は含まれない
        // given (前提条件):
        let mut room = room();
        room.add_member(member("old", "Alice"));
        room.add_member(member("bob", "Bob"));
        room.add_member(member("new", "Alice"));
        let alice = DisplayName::new("Alice".to_string()).unwrap();
        let new_id = ConnectionId::new("new".to_string()).unwrap();

        // when (操作):
        let stale = room.stale_members_named(&alice, &new_id);

        // then (期待する結果):
        assert_eq!(stale, vec![ConnectionId::new("old".to_string()).unwrap()]);
    }

    #[test]
    fn test_members_except() {
        // テスト項目: 指定した接続を除いたメンバーが返る
        // given (前提条件):
        let mut room = room();
        room.add_member(member("a", "Alice"));
        room.add_member(member("b", "Bob"));
        let a = ConnectionId::new("a".to_string()).unwrap();

        // when (操作):
        let others = room.members_except(&a);

        // then (期待する結果):
        assert_eq!(others.len(), 1);
        assert_eq!(others[0].connection_id.as_str(), "b");
        assert_eq!(room.len(), 2);
    }
}
