use crate::domain::{
    self, BookingId, BookingPredicate, BookingStatus, ItemId, NearestDirection, PageRequest,
    UserId, booking::Booking,
};
use crate::ports::booking_store::{BookingStore as BookingStoreTrait, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// BookingStoreのインメモリ実装
///
/// 挿入順を保持するVecに予約を保存する。インスタンスごとに独立した状態を持つ。
/// テストで「ストアに問い合わせていないこと」を確認できるよう、
/// 呼び出し回数を数える。
pub struct BookingStore {
    bookings: Mutex<Vec<Booking>>,
    calls: AtomicUsize,
}

impl BookingStore {
    pub fn new() -> Self {
        Self {
            bookings: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// ストアへの呼び出し回数
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn entries(&self) -> MutexGuard<'_, Vec<Booking>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.bookings.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for BookingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingStoreTrait for BookingStore {
    async fn save(&self, booking: Booking) -> Result<Booking> {
        self.entries().push(booking.clone());
        Ok(booking)
    }

    async fn find_by_id(&self, booking_id: BookingId) -> Result<Option<Booking>> {
        Ok(self
            .entries()
            .iter()
            .find(|b| b.booking_id == booking_id)
            .cloned())
    }

    /// 現在のステータスがexpectedの場合のみ更新する
    async fn update_status(
        &self,
        booking_id: BookingId,
        expected: BookingStatus,
        status: BookingStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<bool> {
        let mut bookings = self.entries();
        match bookings
            .iter_mut()
            .find(|b| b.booking_id == booking_id && b.status == expected)
        {
            Some(booking) => {
                booking.status = status;
                booking.updated_at = updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn exists_completed_booking(
        &self,
        item_id: ItemId,
        booker_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        Ok(self.entries().iter().any(|b| {
            b.item_id == item_id && b.booker_id == booker_id && b.period.ended_before(now)
        }))
    }

    async fn find_nearest_booking(
        &self,
        item_id: ItemId,
        direction: NearestDirection,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>> {
        let bookings = self.entries();
        Ok(domain::select_nearest(bookings.iter(), item_id, direction, now).cloned())
    }

    async fn find_by_predicate(
        &self,
        predicate: &BookingPredicate,
        page: PageRequest,
    ) -> Result<Vec<Booking>> {
        let mut matched: Vec<Booking> = self
            .entries()
            .iter()
            .filter(|b| predicate.matches(b))
            .cloned()
            .collect();

        // 安定ソートなので同じstartは挿入順のまま
        matched.sort_by(|a, b| b.period.start().cmp(&a.period.start()));

        let offset = usize::try_from(page.offset())?;
        Ok(matched
            .into_iter()
            .skip(offset)
            .take(page.size as usize)
            .collect())
    }
}
