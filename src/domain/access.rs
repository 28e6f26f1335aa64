use serde::{Deserialize, Serialize};

use super::{UserId, booking::Booking};

/// 予約に対する当事者（役割付きのユーザーID）
///
/// 権限判定はエンティティ同士の比較ではなく、
/// 予約が保持するIDとこの役割付きIDの比較で行う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Party {
    /// アイテムの所有者
    Owner(UserId),
    /// 予約者
    Booker(UserId),
}

impl Party {
    pub fn user_id(&self) -> UserId {
        match self {
            Party::Owner(id) | Party::Booker(id) => *id,
        }
    }

    /// 予約に対してこの当事者が成立するか
    pub fn holds(&self, booking: &Booking) -> bool {
        match self {
            Party::Owner(id) => booking.item_owner_id == *id,
            Party::Booker(id) => booking.booker_id == *id,
        }
    }
}

/// 承認・却下できるか
///
/// ビジネスルール: アイテムの所有者のみ。予約者であることは十分条件ではない。
pub fn may_decide(booking: &Booking, actor: UserId) -> bool {
    Party::Owner(actor).holds(booking)
}

/// 予約詳細を閲覧できるか
///
/// ビジネスルール: 所有者または予約者のみ。第三者は閲覧不可。
pub fn may_view(booking: &Booking, actor: UserId) -> bool {
    Party::Owner(actor).holds(booking) || Party::Booker(actor).holds(booking)
}
