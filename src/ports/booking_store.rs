use crate::domain::{
    BookingId, BookingPredicate, BookingStatus, ItemId, NearestDirection, PageRequest, UserId,
    booking::Booking,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 予約ストアポート
///
/// 予約レコードの永続化と検索を抽象化する。
/// 予約の永続化はすべてこのポートを経由する。
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// 新しい予約を保存する
    async fn save(&self, booking: Booking) -> Result<Booking>;

    /// IDで予約を取得する
    async fn find_by_id(&self, booking_id: BookingId) -> Result<Option<Booking>>;

    /// 予約のステータスを更新する
    ///
    /// 1行の原子的なcompare-and-set。現在のステータスが`expected`と一致する行のみ
    /// `status`に更新し、更新された場合のみ`true`を返す。
    /// 読み取りから書き込みまでの間に別の呼び出しがステータスを変えていた場合は
    /// 何も更新しない。
    async fn update_status(
        &self,
        booking_id: BookingId,
        expected: BookingStatus,
        status: BookingStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<bool>;

    /// 終了済みの予約が存在するか確認する
    ///
    /// item_idとbooker_idの組で end < now の予約があれば`true`。
    /// ステータスは問わない。
    async fn exists_completed_booking(
        &self,
        item_id: ItemId,
        booker_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<bool>;

    /// アイテムの直近の承認済み予約を検索する
    ///
    /// - Next: start > now のうち startが最小
    /// - Last: end < now のうち endが最大
    async fn find_nearest_booking(
        &self,
        item_id: ItemId,
        direction: NearestDirection,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>>;

    /// 条件に一致する予約をページ単位で検索する
    ///
    /// startの降順、同値は挿入順で並べる。
    async fn find_by_predicate(
        &self,
        predicate: &BookingPredicate,
        page: PageRequest,
    ) -> Result<Vec<Booking>>;
}
