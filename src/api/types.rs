use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::booking::ItemBookingSummary;
use crate::domain::{ItemId, UserId, booking::Booking, commands::RequestBooking};

/// 予約申込リクエスト
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub item_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl CreateBookingRequest {
    /// 受付時刻より前の日時を指定したリクエストを拒否する
    ///
    /// startとendの前後関係はドメイン層で検証する。
    pub fn validate(&self, submitted_at: DateTime<Utc>) -> Result<(), String> {
        if self.start < submitted_at {
            return Err("start must not be in the past".to_string());
        }
        if self.end < submitted_at {
            return Err("end must not be in the past".to_string());
        }
        Ok(())
    }

    pub fn to_command(&self, booker_id: UserId, requested_at: DateTime<Utc>) -> RequestBooking {
        RequestBooking {
            booker_id,
            item_id: ItemId::from_uuid(self.item_id),
            start: self.start,
            end: self.end,
            requested_at,
        }
    }
}

/// PATCH /bookings/:id のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct DecideBookingQuery {
    pub approved: bool,
}

/// 予約一覧取得のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct ListBookingsQuery {
    #[serde(default = "default_state")]
    pub state: String,
    #[serde(default)]
    pub from: u32,
    #[serde(default = "default_size")]
    pub size: u32,
}

fn default_state() -> String {
    "ALL".to_string()
}

fn default_size() -> u32 {
    10
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdRef {
    pub id: Uuid,
}

/// 予約レスポンス
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: String,
    pub booker: IdRef,
    pub item: IdRef,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.booking_id.value(),
            start: booking.period.start(),
            end: booking.period.end(),
            status: booking.status.as_str().to_string(),
            booker: IdRef {
                id: booking.booker_id.value(),
            },
            item: IdRef {
                id: booking.item_id.value(),
            },
        }
    }
}

/// アイテム詳細用の直近予約
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemBookingSummaryResponse {
    pub item_id: Uuid,
    pub last_booking: Option<DateTime<Utc>>,
    pub next_booking: Option<DateTime<Utc>>,
}

impl ItemBookingSummaryResponse {
    pub fn new(item_id: ItemId, summary: ItemBookingSummary) -> Self {
        Self {
            item_id: item_id.value(),
            last_booking: summary.last_booking,
            next_booking: summary.next_booking,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommentEligibilityResponse {
    pub eligible: bool,
}

/// エラーレスポンス
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
