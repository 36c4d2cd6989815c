//! ルームからの離脱処理（切断時と、別ルームへの再 join 時に共通）

use crate::domain::{ConnectionId, LeaveRecord, MessagePusher, SignalEvent, SignalingRepository};

use super::room_lock::RoomLocks;

/// 接続が現在いるルームから離脱させ、残りのメンバーに `peer_left` を通知する
///
/// 1. Registry から所属ルームを調べる（なければ何もしない）
/// 2. ルームのロックを取得し、メンバー集合と Registry をペアで更新する
/// 3. 残りのメンバーに `peer_left` を送信する（ロック保持中にバッファへ積む）
///
/// ロック取得までの間に同名の再接続で追い出されていた場合、2 の時点でメンバーではないので
/// 何もしません。これにより後始末は接続ごとに 1 回だけ実行されます。
pub(crate) async fn leave_current_room(
    repository: &dyn SignalingRepository,
    message_pusher: &dyn MessagePusher,
    room_locks: &RoomLocks,
    connection_id: &ConnectionId,
) -> Option<LeaveRecord> {
    let identity = repository.lookup(connection_id).await?;

    let _guard = room_locks.lock(&identity.room_name).await;
    let record = repository
        .leave_room(&identity.room_name, connection_id)
        .await?;

    tracing::info!(
        "'{}' ({}) left room '{}'",
        record.member.display_name,
        connection_id,
        record.room_name
    );

    if let Err(e) = message_pusher
        .broadcast(record.remaining.clone(), &SignalEvent::peer_left(&record.member))
        .await
    {
        tracing::warn!("Failed to broadcast peer_left for '{}': {}", connection_id, e);
    }

    if record.room_deleted {
        tracing::info!("Room '{}' is empty and has been deleted", record.room_name);
    }

    Some(record)
}
