use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// 予約ID - 予約管理コンテキストの集約ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(Uuid);

impl BookingId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// アイテムID - アイテム管理コンテキストへの参照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// ユーザーID - ユーザー管理コンテキストへの参照
///
/// 予約者とアイテム所有者の両方がこの型で表される。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// 予約期間エラー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidBookingPeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// 日時をマイクロ秒精度に切り捨てる
///
/// PostgreSQLのTIMESTAMPTZと同じ精度。ドメインに入る日時はすべてこの精度に揃え、
/// 保存前後で値が変わらないようにする。
pub fn truncate_to_micros(at: DateTime<Utc>) -> DateTime<Utc> {
    at.trunc_subsecs(6)
}

/// 予約期間
///
/// 不変条件：start < end（同時刻・逆転は不正）
/// 型システムでこの制約を強制し、不正な期間を作成できないようにする。
/// start・endはマイクロ秒精度に切り捨てた値で保持し、比較も切り捨て後に行う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingPeriod {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl BookingPeriod {
    /// 期間を作成する
    ///
    /// # エラー
    /// 切り捨て後のstartがend以降の場合は`InvalidBookingPeriod`を返す
    /// （エラーには渡された値をそのまま含める）
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, InvalidBookingPeriod> {
        let (truncated_start, truncated_end) = (truncate_to_micros(start), truncate_to_micros(end));
        if truncated_start >= truncated_end {
            return Err(InvalidBookingPeriod { start, end });
        }
        Ok(Self {
            start: truncated_start,
            end: truncated_end,
        })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// nowの時点で開始済みかつ未終了か（境界は含まない）
    pub fn is_ongoing_at(&self, now: DateTime<Utc>) -> bool {
        self.start < now && self.end > now
    }

    /// nowより後に開始するか
    pub fn starts_after(&self, now: DateTime<Utc>) -> bool {
        self.start > now
    }

    /// nowより前に終了しているか
    pub fn ended_before(&self, now: DateTime<Utc>) -> bool {
        self.end < now
    }
}

/// 予約ステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// 所有者の承認待ち
    Waiting,
    /// 承認済み
    Approved,
    /// 却下済み
    Rejected,
    /// キャンセル済み（この層の操作からは到達しない）
    Canceled,
}

impl BookingStatus {
    /// 文字列表現を取得する
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Waiting => "WAITING",
            BookingStatus::Approved => "APPROVED",
            BookingStatus::Rejected => "REJECTED",
            BookingStatus::Canceled => "CANCELED",
        }
    }

    /// 承認・却下の対象にならない確定状態か
    pub fn is_final(&self) -> bool {
        matches!(self, BookingStatus::Rejected | BookingStatus::Canceled)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WAITING" => Ok(BookingStatus::Waiting),
            "APPROVED" => Ok(BookingStatus::Approved),
            "REJECTED" => Ok(BookingStatus::Rejected),
            "CANCELED" => Ok(BookingStatus::Canceled),
            _ => Err(format!("Invalid booking status: {}", s)),
        }
    }
}
