//! 受信フィールドの必須チェック
//!
//! フィールドは「存在しない」「null」「空文字列」のいずれかなら欠けているとみなします。
//! 欠けているフィールド名はワイヤ上の名前で `missing` に積まれます。

use crate::domain::{DomainError, OpaquePayload};

/// 必須の文字列フィールドを値オブジェクトに変換
pub(crate) fn required<T>(
    value: Option<String>,
    field: &'static str,
    missing: &mut Vec<&'static str>,
) -> Option<T>
where
    T: TryFrom<String, Error = DomainError>,
{
    match value.map(T::try_from) {
        Some(Ok(v)) => Some(v),
        _ => {
            missing.push(field);
            None
        }
    }
}

/// 必須のペイロードフィールド
pub(crate) fn required_payload(
    value: Option<serde_json::Value>,
    field: &'static str,
    missing: &mut Vec<&'static str>,
) -> Option<OpaquePayload> {
    match value.map(OpaquePayload::new) {
        Some(Ok(v)) => Some(v),
        _ => {
            missing.push(field);
            None
        }
    }
}
