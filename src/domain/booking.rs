use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    BookingId, BookingPeriod, BookingStatus, DecideBookingError, ItemId, RequestBookingError,
    UserId, access, truncate_to_micros,
};

/// 予約対象アイテムのスナップショット
///
/// アイテム管理コンテキストから受け取る、予約判定に必要な最小限の情報。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRef {
    pub item_id: ItemId,
    pub owner_id: UserId,
    pub available: bool,
}

/// Booking集約 - 1つのアイテムに対する1回の予約
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    // 識別子
    pub booking_id: BookingId,

    // 他の集約への参照（IDのみ）
    pub item_id: ItemId,
    pub item_owner_id: UserId,
    pub booker_id: UserId,

    // 予約管理の責務
    pub period: BookingPeriod,
    pub status: BookingStatus,

    // 監査情報
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 純粋関数：予約を申し込む
///
/// ビジネスルール：
/// - アイテムが貸出可能であること
/// - 状態はWaiting
/// - 既存予約との重複は確認しない（二重予約は許容される）
///
/// 期間の妥当性は`BookingPeriod`の型で保証済み。
/// 副作用なし。新しいBookingを返す。
pub fn request_booking(
    booker_id: UserId,
    item: &ItemRef,
    period: BookingPeriod,
    requested_at: DateTime<Utc>,
) -> Result<Booking, RequestBookingError> {
    if !item.available {
        return Err(RequestBookingError::ItemUnavailable);
    }

    let requested_at = truncate_to_micros(requested_at);
    Ok(Booking {
        booking_id: BookingId::new(),
        item_id: item.item_id,
        item_owner_id: item.owner_id,
        booker_id,
        period,
        status: BookingStatus::Waiting,
        created_at: requested_at,
        updated_at: requested_at,
    })
}

/// 純粋関数：予約を承認または却下する
///
/// ビジネスルール：
/// - Rejected, Canceledは再遷移不可（操作者に関係なく）
/// - Approvedの再承認・却下は受け付ける
/// - 操作できるのはアイテムの所有者のみ
///
/// 副作用なし。新しいBookingを返す。
pub fn decide_booking(
    booking: &Booking,
    actor: UserId,
    approved: bool,
    decided_at: DateTime<Utc>,
) -> Result<Booking, DecideBookingError> {
    // バリデーション：確定状態は再遷移不可
    if booking.status.is_final() {
        return Err(DecideBookingError::AlreadyFinalized(booking.status));
    }

    // 権限：所有者のみ
    if !access::may_decide(booking, actor) {
        return Err(DecideBookingError::NotItemOwner);
    }

    let status = if approved {
        BookingStatus::Approved
    } else {
        BookingStatus::Rejected
    };

    Ok(Booking {
        status,
        updated_at: truncate_to_micros(decided_at),
        ..booking.clone()
    })
}
