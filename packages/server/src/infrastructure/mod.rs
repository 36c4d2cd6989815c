//! Infrastructure 層
//!
//! - `repository`: Registry / Directory のインメモリ実装
//! - `message_pusher`: WebSocket 向けの送信実装
//! - `dto`: ワイヤ形式（WebSocket / HTTP）

pub mod dto;
pub mod message_pusher;
pub mod repository;
