use chrono::{DateTime, Utc};

use crate::domain::{
    BookingStateFilter, ItemId, ListRole, NearestDirection, PageRequest, UserId,
    booking::Booking, commands::ListBookings,
};

use super::booking_service::{ServiceDependencies, ensure_user_exists, load_item};
use super::errors::{BookingApplicationError, Result};

/// アイテム詳細に表示する直近予約の開始日時
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemBookingSummary {
    pub last_booking: Option<DateTime<Utc>>,
    pub next_booking: Option<DateTime<Utc>>,
}

/// 予約一覧を取得する
///
/// 処理フロー：
/// 1. 操作者の存在確認
/// 2. 所有者として取得する場合は、アイテムを所有していることを確認
///    （所有していなければ予約ストアに問い合わせずに拒否）
/// 3. 状態フィルタとページ指定を検証
/// 4. 検索条件を組み立てて予約ストアに問い合わせ
///
/// 結果はstartの降順。
pub async fn list_bookings(deps: &ServiceDependencies, query: ListBookings) -> Result<Vec<Booking>> {
    ensure_user_exists(deps, query.user_id).await?;

    if query.role == ListRole::Owner {
        let owns_items = deps
            .item_catalog
            .owns_any_item(query.user_id)
            .await
            .map_err(BookingApplicationError::ItemCatalogError)?;

        if !owns_items {
            tracing::warn!(user_id = %query.user_id, "attempt to list owner bookings without items");
            return Err(BookingApplicationError::NotAnItemOwner);
        }
    }

    let filter: BookingStateFilter = query.state.parse().inspect_err(|_| {
        tracing::warn!(state = %query.state, "unknown booking state");
    })?;
    let page = PageRequest::from_offset(query.from, query.size)?;
    let predicate = filter.predicate(query.role.party(query.user_id), query.as_of);

    let bookings = deps
        .booking_store
        .find_by_predicate(&predicate, page)
        .await
        .map_err(BookingApplicationError::BookingStoreError)?;

    tracing::debug!(
        user_id = %query.user_id,
        role = ?query.role,
        state = filter.as_str(),
        count = bookings.len(),
        "bookings listed"
    );
    Ok(bookings)
}

/// アイテムの直近の承認済み予約を取得する
///
/// 該当する予約がなければ`None`。
/// 所有者以外への表示制御は呼び出し側（`item_booking_summary`）で行う。
pub async fn nearest_booking(
    deps: &ServiceDependencies,
    item_id: ItemId,
    direction: NearestDirection,
    now: DateTime<Utc>,
) -> Result<Option<Booking>> {
    deps.booking_store
        .find_nearest_booking(item_id, direction, now)
        .await
        .map_err(BookingApplicationError::BookingStoreError)
}

/// アイテム詳細用の直近予約サマリを組み立てる
///
/// ビジネスルール：
/// - アイテムが存在すること
/// - 所有者以外には直近予約を表示しない（予約ストアにも問い合わせない）
/// - 前回・次回ともに予約の開始日時を返す
pub async fn item_booking_summary(
    deps: &ServiceDependencies,
    item_id: ItemId,
    acting_user_id: UserId,
    now: DateTime<Utc>,
) -> Result<ItemBookingSummary> {
    let item = load_item(deps, item_id).await?;

    if item.owner_id != acting_user_id {
        return Ok(ItemBookingSummary::default());
    }

    let (last, next) = futures::try_join!(
        nearest_booking(deps, item_id, NearestDirection::Last, now),
        nearest_booking(deps, item_id, NearestDirection::Next, now),
    )?;

    Ok(ItemBookingSummary {
        last_booking: last.map(|b| b.period.start()),
        next_booking: next.map(|b| b.period.start()),
    })
}
