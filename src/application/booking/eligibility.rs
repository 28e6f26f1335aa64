use chrono::{DateTime, Utc};

use crate::domain::{ItemId, UserId};

use super::booking_service::{ServiceDependencies, ensure_user_exists, load_item};
use super::errors::{BookingApplicationError, Result};

/// ユーザーがアイテムの予約を終了済みか確認する
///
/// end < now の予約が1件でもあれば`true`。ステータスは問わないため、
/// 却下された予約や承認待ちのまま期間が過ぎた予約も含まれる。
pub async fn has_completed_booking(
    deps: &ServiceDependencies,
    item_id: ItemId,
    user_id: UserId,
    now: DateTime<Utc>,
) -> Result<bool> {
    deps.booking_store
        .exists_completed_booking(item_id, user_id, now)
        .await
        .map_err(BookingApplicationError::BookingStoreError)
}

/// コメント投稿の可否を判定する
///
/// ビジネスルール：
/// - アイテムが存在すること
/// - 投稿者が存在すること
/// - 投稿者がそのアイテムの予約を終了済みであること
///
/// コメントの保存はアイテム管理コンテキストの責務。
pub async fn authorize_comment(
    deps: &ServiceDependencies,
    item_id: ItemId,
    author_id: UserId,
    now: DateTime<Utc>,
) -> Result<()> {
    load_item(deps, item_id).await?;
    ensure_user_exists(deps, author_id).await?;

    if !has_completed_booking(deps, item_id, author_id, now).await? {
        tracing::warn!(%item_id, %author_id, "attempt to comment without a completed booking");
        return Err(BookingApplicationError::CompletedBookingNotFound);
    }
    Ok(())
}
