use super::BookingStatus;

/// 予約作成のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBookingError {
    /// アイテムが貸出不可（available = false）
    ItemUnavailable,
}

/// 承認・却下のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecideBookingError {
    /// 既に却下またはキャンセルされている
    AlreadyFinalized(BookingStatus),
    /// 操作者がアイテムの所有者ではない
    NotItemOwner,
}

/// 予約状態フィルタの解析エラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBookingState(pub String);

/// ページ指定のエラー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidPageRequest {
    /// sizeが0
    ZeroSize,
}
