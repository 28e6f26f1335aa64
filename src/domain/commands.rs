use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookingId, ItemId, ListRole, UserId};

/// コマンド：予約を申し込む
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestBooking {
    pub booker_id: UserId,
    pub item_id: ItemId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub requested_at: DateTime<Utc>,
}

/// コマンド：予約を承認または却下する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecideBooking {
    pub booking_id: BookingId,
    pub acting_user_id: UserId,
    pub approved: bool,
    pub decided_at: DateTime<Utc>,
}

/// クエリ：予約一覧を取得する
///
/// stateは未解析のトークンのまま受け取り、アプリケーション層で検証する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListBookings {
    pub user_id: UserId,
    pub role: ListRole,
    pub state: String,
    pub from: u32,
    pub size: u32,
    pub as_of: DateTime<Utc>,
}
