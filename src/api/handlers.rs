use crate::application::booking::{
    BookingApplicationError, ServiceDependencies, authorize_comment,
    decide_booking as execute_decide_booking, get_booking as execute_get_booking,
    item_booking_summary, list_bookings as execute_list_bookings,
    request_booking as execute_request_booking,
};
use crate::domain::{
    BookingId, ItemId, ListRole, UserId,
    commands::{DecideBooking, ListBookings},
};
use axum::{
    Json, async_trait,
    extract::{FromRequest, FromRequestParts, Path, Query, State},
    http::{StatusCode, request::Parts},
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use super::{
    error::ApiError,
    types::{
        BookingResponse, CommentEligibilityResponse, CreateBookingRequest, DecideBookingQuery,
        ItemBookingSummaryResponse, ListBookingsQuery,
    },
};

/// 操作者のIDを運ぶヘッダー
pub const ACTING_USER_HEADER: &str = "X-Sharer-User-Id";

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

// ============================================================================
// Extractors
// ============================================================================

/// `X-Sharer-User-Id`ヘッダーから取り出した操作者
#[derive(Debug, Clone, Copy)]
pub struct ActingUser(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for ActingUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(ACTING_USER_HEADER)
            .ok_or_else(|| ApiError::InvalidRequest(format!("missing {ACTING_USER_HEADER} header")))?;

        value
            .to_str()
            .ok()
            .and_then(|v| Uuid::parse_str(v.trim()).ok())
            .map(|id| ActingUser(UserId::from_uuid(id)))
            .ok_or_else(|| ApiError::InvalidRequest(format!("malformed {ACTING_USER_HEADER} header")))
    }
}

/// パスパラメータ（解析失敗時はJSONのエラーを返す）
#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// クエリパラメータ（解析失敗時はJSONのエラーを返す）
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// JSONボディ（解析失敗時はJSONのエラーを返す）
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

// ============================================================================
// Command handlers
// ============================================================================

/// POST /bookings - 予約を申し込む
///
/// 強制されるビジネスルール:
/// - start・endが受付時刻より前でないこと
/// - startがendより前であること
/// - 申込者とアイテムが存在すること
/// - アイテムが貸出可能であること
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    ActingUser(booker_id): ActingUser,
    ApiJson(req): ApiJson<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), ApiError> {
    let now = Utc::now();
    req.validate(now).map_err(ApiError::InvalidRequest)?;

    let booking = execute_request_booking(&state.service_deps, req.to_command(booker_id, now)).await?;

    Ok((StatusCode::CREATED, Json(BookingResponse::from(booking))))
}

/// PATCH /bookings/:id?approved= - 予約を承認または却下する
///
/// 強制されるビジネスルール:
/// - 予約が存在すること
/// - 却下・キャンセル済みでないこと
/// - 操作者がアイテムの所有者であること
pub async fn decide_booking(
    State(state): State<Arc<AppState>>,
    ActingUser(acting_user_id): ActingUser,
    ApiPath(booking_id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<DecideBookingQuery>,
) -> Result<Json<BookingResponse>, ApiError> {
    let cmd = DecideBooking {
        booking_id: BookingId::from_uuid(booking_id),
        acting_user_id,
        approved: query.approved,
        decided_at: Utc::now(),
    };

    let booking = execute_decide_booking(&state.service_deps, cmd).await?;

    Ok(Json(BookingResponse::from(booking)))
}

// ============================================================================
// Query handlers
// ============================================================================

/// GET /bookings/:id - 予約詳細を取得（予約者と所有者のみ）
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    ActingUser(acting_user_id): ActingUser,
    ApiPath(booking_id): ApiPath<Uuid>,
) -> Result<Json<BookingResponse>, ApiError> {
    let booking = execute_get_booking(
        &state.service_deps,
        BookingId::from_uuid(booking_id),
        acting_user_id,
    )
    .await?;

    Ok(Json(BookingResponse::from(booking)))
}

async fn list_as(
    state: &AppState,
    user_id: UserId,
    role: ListRole,
    query: ListBookingsQuery,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let bookings = execute_list_bookings(
        &state.service_deps,
        ListBookings {
            user_id,
            role,
            state: query.state,
            from: query.from,
            size: query.size,
            as_of: Utc::now(),
        },
    )
    .await?;

    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}

/// GET /bookings - 予約者としての予約一覧
///
/// クエリパラメータ:
/// - state: ALL, CURRENT, FUTURE, PAST, WAITING, REJECTED（大文字小文字は区別しない、既定値ALL）
/// - from: 先頭からのオフセット（既定値0）
/// - size: ページサイズ（既定値10）
pub async fn list_booker_bookings(
    State(state): State<Arc<AppState>>,
    ActingUser(user_id): ActingUser,
    ApiQuery(query): ApiQuery<ListBookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    list_as(&state, user_id, ListRole::Booker, query).await
}

/// GET /bookings/owner - 所有者としての予約一覧
///
/// アイテムを一つも所有していない場合は403。
pub async fn list_owner_bookings(
    State(state): State<Arc<AppState>>,
    ActingUser(user_id): ActingUser,
    ApiQuery(query): ApiQuery<ListBookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    list_as(&state, user_id, ListRole::Owner, query).await
}

/// GET /items/:id/booking-summary - 直近の前回・次回予約の開始日時
///
/// 所有者以外には両方とも`null`を返す。
pub async fn booking_summary(
    State(state): State<Arc<AppState>>,
    ActingUser(acting_user_id): ActingUser,
    ApiPath(item_id): ApiPath<Uuid>,
) -> Result<Json<ItemBookingSummaryResponse>, ApiError> {
    let item_id = ItemId::from_uuid(item_id);
    let summary =
        item_booking_summary(&state.service_deps, item_id, acting_user_id, Utc::now()).await?;

    Ok(Json(ItemBookingSummaryResponse::new(item_id, summary)))
}

/// GET /items/:id/comment-eligibility - 操作者がアイテムにコメントできるか
pub async fn comment_eligibility(
    State(state): State<Arc<AppState>>,
    ActingUser(acting_user_id): ActingUser,
    ApiPath(item_id): ApiPath<Uuid>,
) -> Result<Json<CommentEligibilityResponse>, ApiError> {
    let result = authorize_comment(
        &state.service_deps,
        ItemId::from_uuid(item_id),
        acting_user_id,
        Utc::now(),
    )
    .await;

    let eligible = match result {
        Ok(()) => true,
        Err(BookingApplicationError::CompletedBookingNotFound) => false,
        Err(e) => return Err(e.into()),
    };

    Ok(Json(CommentEligibilityResponse { eligible }))
}
