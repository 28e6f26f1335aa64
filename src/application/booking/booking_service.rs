use crate::domain::{
    self, BookingId, BookingPeriod, ItemId, UserId,
    booking::{Booking, ItemRef},
    commands::*,
};
use crate::ports::*;
use std::sync::Arc;

use super::errors::{BookingApplicationError, Result};

/// サービスの依存関係
///
/// 関数型DDDの原則に従い、データ構造として定義。
/// 振る舞い（メソッド）は持たず、ユースケース関数に依存関係を渡す。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub booking_store: Arc<dyn BookingStore>,
    pub user_directory: Arc<dyn UserDirectory>,
    pub item_catalog: Arc<dyn ItemCatalog>,
}

/// ユーザーの存在を確認するヘルパー関数
///
/// # エラー
/// - UserDirectoryError: 問い合わせ失敗
/// - UserNotFound: ユーザーが存在しない
pub(super) async fn ensure_user_exists(deps: &ServiceDependencies, user_id: UserId) -> Result<()> {
    let exists = deps
        .user_directory
        .exists(user_id)
        .await
        .map_err(BookingApplicationError::UserDirectoryError)?;

    if !exists {
        tracing::warn!(%user_id, "user not found");
        return Err(BookingApplicationError::UserNotFound);
    }
    Ok(())
}

/// アイテムを取得するヘルパー関数
///
/// # エラー
/// - ItemCatalogError: 問い合わせ失敗
/// - ItemNotFound: アイテムが存在しない
pub(super) async fn load_item(deps: &ServiceDependencies, item_id: ItemId) -> Result<ItemRef> {
    deps.item_catalog
        .find_item(item_id)
        .await
        .map_err(BookingApplicationError::ItemCatalogError)?
        .ok_or_else(|| {
            tracing::warn!(%item_id, "item not found");
            BookingApplicationError::ItemNotFound
        })
}

/// 予約ストアから予約を取得するヘルパー関数
///
/// # エラー
/// - BookingStoreError: 読み込み失敗
/// - BookingNotFound: 予約が存在しない
async fn load_booking(deps: &ServiceDependencies, booking_id: BookingId) -> Result<Booking> {
    deps.booking_store
        .find_by_id(booking_id)
        .await
        .map_err(BookingApplicationError::BookingStoreError)?
        .ok_or(BookingApplicationError::BookingNotFound)
}

/// 予約を申し込む
///
/// ビジネスルール：
/// - 期間が start < end であること（最初に検証する）
/// - 申込者が存在すること
/// - アイテムが存在し、貸出可能であること
///
/// 既存予約との重複は確認しない。
///
/// # 戻り値
/// 保存された予約（状態はWaiting）
pub async fn request_booking(deps: &ServiceDependencies, cmd: RequestBooking) -> Result<Booking> {
    // 1. 期間の検証
    let period = BookingPeriod::new(cmd.start, cmd.end).inspect_err(|_| {
        tracing::warn!(start = %cmd.start, end = %cmd.end, "invalid booking period");
    })?;

    // 2. 申込者の存在確認
    ensure_user_exists(deps, cmd.booker_id).await?;

    // 3. アイテムの取得
    let item = load_item(deps, cmd.item_id).await?;

    // 4. ドメイン層の純粋関数を呼び出し
    let booking = domain::booking::request_booking(cmd.booker_id, &item, period, cmd.requested_at)
        .inspect_err(|_| {
            tracing::warn!(item_id = %cmd.item_id, "attempt to book an unavailable item");
        })?;

    // 5. 保存
    let saved = deps
        .booking_store
        .save(booking)
        .await
        .map_err(BookingApplicationError::BookingStoreError)?;

    tracing::info!(
        booking_id = %saved.booking_id,
        item_id = %saved.item_id,
        booker_id = %saved.booker_id,
        "booking requested"
    );
    Ok(saved)
}

/// 予約を承認または却下する
///
/// ビジネスルール：
/// - 予約が存在すること
/// - Rejected, Canceledでないこと（操作者の確認より先に検証する）
/// - 操作者がアイテムの所有者であること
///
/// # 一貫性保証
///
/// 読み取ったステータスを期待値としてストアの条件付き更新を行う。
/// 読み取りから更新までの間に別の呼び出しがステータスを変えていた場合は
/// 何も書き込まず`BookingAlreadyFinalized`を返す。並行した承認と却下は
/// 一方だけが成功する。
pub async fn decide_booking(deps: &ServiceDependencies, cmd: DecideBooking) -> Result<Booking> {
    // 1. 予約の取得
    let booking = load_booking(deps, cmd.booking_id).await?;

    // 2. ドメイン層の純粋関数を呼び出し
    let decided =
        domain::booking::decide_booking(&booking, cmd.acting_user_id, cmd.approved, cmd.decided_at)
            .inspect_err(|e| {
                tracing::warn!(
                    booking_id = %cmd.booking_id,
                    acting_user_id = %cmd.acting_user_id,
                    status = %booking.status,
                    error = ?e,
                    "booking decision refused"
                );
            })?;

    // 3. 条件付きでステータスを更新
    let updated = deps
        .booking_store
        .update_status(
            decided.booking_id,
            booking.status,
            decided.status,
            decided.updated_at,
        )
        .await
        .map_err(BookingApplicationError::BookingStoreError)?;

    if !updated {
        tracing::warn!(booking_id = %cmd.booking_id, "booking was decided concurrently");
        return Err(BookingApplicationError::BookingAlreadyFinalized);
    }

    tracing::info!(
        booking_id = %decided.booking_id,
        status = %decided.status,
        "booking decided"
    );
    Ok(decided)
}

/// 予約をIDで取得する
///
/// ビジネスルール: 閲覧できるのは予約者とアイテムの所有者のみ。
pub async fn get_booking(
    deps: &ServiceDependencies,
    booking_id: BookingId,
    acting_user_id: UserId,
) -> Result<Booking> {
    let booking = load_booking(deps, booking_id).await?;

    if !domain::access::may_view(&booking, acting_user_id) {
        tracing::warn!(%booking_id, %acting_user_id, "attempt to view booking without access");
        return Err(BookingApplicationError::NotBookerOrOwner);
    }

    Ok(booking)
}
