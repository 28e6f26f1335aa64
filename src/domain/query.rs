use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    BookingStatus, InvalidPageRequest, ItemId, UnknownBookingState, UserId, access::Party,
    booking::Booking,
};

/// 一覧取得時の立場
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListRole {
    /// 自分が申し込んだ予約
    Booker,
    /// 自分のアイテムに対する予約
    Owner,
}

impl ListRole {
    pub fn party(&self, user_id: UserId) -> Party {
        match self {
            ListRole::Booker => Party::Booker(user_id),
            ListRole::Owner => Party::Owner(user_id),
        }
    }
}

/// 予約状態フィルタ
///
/// 現在時刻とステータスに対する予約の分類。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStateFilter {
    All,
    Current,
    Future,
    Past,
    Waiting,
    Rejected,
}

impl BookingStateFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStateFilter::All => "ALL",
            BookingStateFilter::Current => "CURRENT",
            BookingStateFilter::Future => "FUTURE",
            BookingStateFilter::Past => "PAST",
            BookingStateFilter::Waiting => "WAITING",
            BookingStateFilter::Rejected => "REJECTED",
        }
    }

    /// フィルタを検索条件に変換する
    ///
    /// 新しいフィルタを追加した場合、このmatchがコンパイルエラーになる。
    pub fn predicate(&self, party: Party, now: DateTime<Utc>) -> BookingPredicate {
        let scope = BookingPredicate::scoped_to(party);
        match self {
            BookingStateFilter::All => scope,
            BookingStateFilter::Current => BookingPredicate {
                status: Some(BookingStatus::Approved),
                start_before: Some(now),
                end_after: Some(now),
                ..scope
            },
            BookingStateFilter::Future => BookingPredicate {
                status: Some(BookingStatus::Approved),
                start_after: Some(now),
                ..scope
            },
            BookingStateFilter::Past => BookingPredicate {
                status: Some(BookingStatus::Approved),
                end_before: Some(now),
                ..scope
            },
            BookingStateFilter::Waiting => BookingPredicate {
                status: Some(BookingStatus::Waiting),
                ..scope
            },
            BookingStateFilter::Rejected => BookingPredicate {
                status: Some(BookingStatus::Rejected),
                ..scope
            },
        }
    }
}

impl std::str::FromStr for BookingStateFilter {
    type Err = UnknownBookingState;

    /// 大文字小文字を区別せずに解析する
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ALL" => Ok(BookingStateFilter::All),
            "CURRENT" => Ok(BookingStateFilter::Current),
            "FUTURE" => Ok(BookingStateFilter::Future),
            "PAST" => Ok(BookingStateFilter::Past),
            "WAITING" => Ok(BookingStateFilter::Waiting),
            "REJECTED" => Ok(BookingStateFilter::Rejected),
            _ => Err(UnknownBookingState(s.to_string())),
        }
    }
}

/// 予約の検索条件
///
/// すべての条件はAND結合。時刻の比較はすべて境界を含まない。
/// ストア実装はこの条件をそのままクエリに変換する。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingPredicate {
    pub party: Party,
    pub status: Option<BookingStatus>,
    /// start < t
    pub start_before: Option<DateTime<Utc>>,
    /// start > t
    pub start_after: Option<DateTime<Utc>>,
    /// end < t
    pub end_before: Option<DateTime<Utc>>,
    /// end > t
    pub end_after: Option<DateTime<Utc>>,
}

impl BookingPredicate {
    /// 当事者のみで絞り込む条件
    pub fn scoped_to(party: Party) -> Self {
        Self {
            party,
            status: None,
            start_before: None,
            start_after: None,
            end_before: None,
            end_after: None,
        }
    }

    pub fn matches(&self, booking: &Booking) -> bool {
        let start = booking.period.start();
        let end = booking.period.end();

        self.party.holds(booking)
            && self.status.is_none_or(|s| booking.status == s)
            && self.start_before.is_none_or(|t| start < t)
            && self.start_after.is_none_or(|t| start > t)
            && self.end_before.is_none_or(|t| end < t)
            && self.end_after.is_none_or(|t| end > t)
    }
}

/// ページ指定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    /// オフセット指定からページを求める
    ///
    /// page = from / size（from > 0 の場合）、それ以外は0。
    /// sizeの倍数でないfromはページ境界に切り捨てられる。
    pub fn from_offset(from: u32, size: u32) -> Result<Self, InvalidPageRequest> {
        if size == 0 {
            return Err(InvalidPageRequest::ZeroSize);
        }
        let page = if from > 0 { from / size } else { 0 };
        Ok(Self { page, size })
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

/// 直近予約の方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NearestDirection {
    /// 終了済みで最も新しい予約
    Last,
    /// これから開始する最も近い予約
    Next,
}

/// 純粋関数：直近の承認済み予約を選ぶ
///
/// - Next: start > now のうち startが最小
/// - Last: end < now のうち endが最大
///
/// 同値の場合は先に現れた予約を選ぶ。
pub fn select_nearest<'a>(
    bookings: impl IntoIterator<Item = &'a Booking>,
    item_id: ItemId,
    direction: NearestDirection,
    now: DateTime<Utc>,
) -> Option<&'a Booking> {
    let candidates = bookings
        .into_iter()
        .filter(|b| b.item_id == item_id && b.status == BookingStatus::Approved);

    match direction {
        NearestDirection::Next => candidates
            .filter(|b| b.period.starts_after(now))
            .fold(None::<&'a Booking>, |best, b| match best {
                Some(cur) if cur.period.start() <= b.period.start() => Some(cur),
                _ => Some(b),
            }),
        NearestDirection::Last => candidates
            .filter(|b| b.period.ended_before(now))
            .fold(None::<&'a Booking>, |best, b| match best {
                Some(cur) if cur.period.end() >= b.period.end() => Some(cur),
                _ => Some(b),
            }),
    }
}
