use thiserror::Error;

use crate::domain::{
    DecideBookingError, InvalidBookingPeriod, InvalidPageRequest, RequestBookingError,
    UnknownBookingState,
};

/// エラーの種別
///
/// HTTP層はこの種別だけを見てステータスコードを決める。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    AccessDenied,
    Internal,
}

/// 予約管理アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum BookingApplicationError {
    /// ユーザーが存在しない
    #[error("User not found")]
    UserNotFound,

    /// アイテムが存在しない
    #[error("Item not found")]
    ItemNotFound,

    /// 予約が存在しない
    #[error("Booking not found")]
    BookingNotFound,

    /// 予約期間が不正（start >= end）
    #[error("Booking start must be strictly before its end")]
    InvalidBookingPeriod,

    /// アイテムが貸出不可
    #[error("Item is not available for booking")]
    ItemNotAvailable,

    /// 却下・キャンセル済みの予約は承認・却下できない
    #[error("Only waiting or approved bookings can be approved or rejected")]
    BookingAlreadyFinalized,

    /// 未知の予約状態フィルタ
    #[error("Unknown state: {0}")]
    UnknownBookingState(String),

    /// ページ指定が不正
    #[error("Invalid page request: {0}")]
    InvalidPageRequest(String),

    /// 終了済みの予約がないためコメント不可
    #[error("Only users who have completed a booking of the item can comment on it")]
    CompletedBookingNotFound,

    /// 承認・却下はアイテムの所有者のみ
    #[error("Only the item owner can approve or reject a booking")]
    NotItemOwner,

    /// 予約詳細の閲覧は予約者と所有者のみ
    #[error("Only the booker or the item owner can view a booking")]
    NotBookerOrOwner,

    /// 所有者としての一覧取得はアイテム所有者のみ
    #[error("Only users who own items can list bookings as an owner")]
    NotAnItemOwner,

    /// BookingStoreのエラー
    #[error("Booking store error")]
    BookingStoreError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// UserDirectoryのエラー
    #[error("User directory error")]
    UserDirectoryError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// ItemCatalogのエラー
    #[error("Item catalog error")]
    ItemCatalogError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl BookingApplicationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UserNotFound | Self::ItemNotFound | Self::BookingNotFound => ErrorKind::NotFound,

            Self::InvalidBookingPeriod
            | Self::ItemNotAvailable
            | Self::BookingAlreadyFinalized
            | Self::UnknownBookingState(_)
            | Self::InvalidPageRequest(_)
            | Self::CompletedBookingNotFound => ErrorKind::Validation,

            Self::NotItemOwner | Self::NotBookerOrOwner | Self::NotAnItemOwner => {
                ErrorKind::AccessDenied
            }

            Self::BookingStoreError(_) | Self::UserDirectoryError(_) | Self::ItemCatalogError(_) => {
                ErrorKind::Internal
            }
        }
    }
}

impl From<InvalidBookingPeriod> for BookingApplicationError {
    fn from(_: InvalidBookingPeriod) -> Self {
        Self::InvalidBookingPeriod
    }
}

impl From<RequestBookingError> for BookingApplicationError {
    fn from(err: RequestBookingError) -> Self {
        match err {
            RequestBookingError::ItemUnavailable => Self::ItemNotAvailable,
        }
    }
}

impl From<DecideBookingError> for BookingApplicationError {
    fn from(err: DecideBookingError) -> Self {
        match err {
            DecideBookingError::AlreadyFinalized(_) => Self::BookingAlreadyFinalized,
            DecideBookingError::NotItemOwner => Self::NotItemOwner,
        }
    }
}

impl From<UnknownBookingState> for BookingApplicationError {
    fn from(err: UnknownBookingState) -> Self {
        Self::UnknownBookingState(err.0)
    }
}

impl From<InvalidPageRequest> for BookingApplicationError {
    fn from(err: InvalidPageRequest) -> Self {
        match err {
            InvalidPageRequest::ZeroSize => Self::InvalidPageRequest("size must be positive".into()),
        }
    }
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, BookingApplicationError>;
