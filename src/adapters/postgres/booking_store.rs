use crate::domain::{
    BookingId, BookingPeriod, BookingPredicate, BookingStatus, ItemId, NearestDirection,
    PageRequest, UserId, access::Party, booking::Booking,
};
use crate::ports::booking_store::{BookingStore as BookingStoreTrait, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};
use std::str::FromStr;

const BOOKING_COLUMNS: &str = r#"
    booking_id,
    item_id,
    item_owner_id,
    booker_id,
    start_at,
    end_at,
    status,
    created_at,
    updated_at
"#;

/// PostgreSQLの行データをBookingに変換する
///
/// ステータス文字列の解析と期間の不変条件の確認でエラーハンドリングを行う。
fn map_row_to_booking(row: &PgRow) -> Result<Booking> {
    let status_str: &str = row.get("status");
    let status = BookingStatus::from_str(status_str).map_err(|e| {
        Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
            as Box<dyn std::error::Error + Send + Sync>
    })?;

    let start: DateTime<Utc> = row.get("start_at");
    let end: DateTime<Utc> = row.get("end_at");
    let period = BookingPeriod::new(start, end).map_err(|e| {
        Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("booking period out of order: {:?}", e),
        )) as Box<dyn std::error::Error + Send + Sync>
    })?;

    Ok(Booking {
        booking_id: BookingId::from_uuid(row.get("booking_id")),
        item_id: ItemId::from_uuid(row.get("item_id")),
        item_owner_id: UserId::from_uuid(row.get("item_owner_id")),
        booker_id: UserId::from_uuid(row.get("booker_id")),
        period,
        status,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// 当事者の種別をSQLのパラメータに変換する
fn party_params(party: Party) -> (&'static str, UserId) {
    let kind = match party {
        Party::Owner(_) => "owner",
        Party::Booker(_) => "booker",
    };
    (kind, party.user_id())
}

/// BookingStoreのPostgreSQL実装
///
/// `seq`列（BIGSERIAL）で挿入順を保持し、同じ開始日時の並び順を安定させる。
pub struct BookingStore {
    pool: PgPool,
}

impl BookingStore {
    /// PostgreSQLコネクションプールから新しいBookingStoreを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingStoreTrait for BookingStore {
    /// 保存した行をそのまま読み戻して返す
    async fn save(&self, booking: Booking) -> Result<Booking> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO bookings (
                booking_id,
                item_id,
                item_owner_id,
                booker_id,
                start_at,
                end_at,
                status,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(booking.booking_id.value())
        .bind(booking.item_id.value())
        .bind(booking.item_owner_id.value())
        .bind(booking.booker_id.value())
        .bind(booking.period.start())
        .bind(booking.period.end())
        .bind(booking.status.as_str())
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .fetch_one(&self.pool)
        .await?;

        map_row_to_booking(&row)
    }

    async fn find_by_id(&self, booking_id: BookingId) -> Result<Option<Booking>> {
        let row = sqlx::query(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE booking_id = $1"
        ))
        .bind(booking_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_booking).transpose()
    }

    /// 条件付きUPDATE
    ///
    /// WHERE句で読み取り時のステータスと一致する行だけを更新するため、
    /// 同じ予約に対する並行した承認・却下はどちらか一方しか成功しない。
    async fn update_status(
        &self,
        booking_id: BookingId,
        expected: BookingStatus,
        status: BookingStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE bookings
            SET status = $3, updated_at = $4
            WHERE booking_id = $1
              AND status = $2
            "#,
        )
        .bind(booking_id.value())
        .bind(expected.as_str())
        .bind(status.as_str())
        .bind(updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn exists_completed_booking(
        &self,
        item_id: ItemId,
        booker_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM bookings
                WHERE item_id = $1 AND booker_id = $2 AND end_at < $3
            )
            "#,
        )
        .bind(item_id.value())
        .bind(booker_id.value())
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn find_nearest_booking(
        &self,
        item_id: ItemId,
        direction: NearestDirection,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>> {
        let condition = match direction {
            NearestDirection::Next => "start_at > $2 ORDER BY start_at ASC, seq ASC",
            NearestDirection::Last => "end_at < $2 ORDER BY end_at DESC, seq ASC",
        };

        let row = sqlx::query(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings \
             WHERE item_id = $1 AND status = 'APPROVED' AND {condition} LIMIT 1"
        ))
        .bind(item_id.value())
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_booking).transpose()
    }

    /// 検索条件で予約を検索
    ///
    /// NULLのパラメータはその条件を適用しない。
    /// (booker_id, start_at)と(item_owner_id, start_at)のインデックスを使用する。
    async fn find_by_predicate(
        &self,
        predicate: &BookingPredicate,
        page: PageRequest,
    ) -> Result<Vec<Booking>> {
        let (party_kind, user_id) = party_params(predicate.party);

        let rows = sqlx::query(&format!(
            r#"
            SELECT {BOOKING_COLUMNS}
            FROM bookings
            WHERE (
                    ($1::text = 'booker' AND booker_id = $2)
                 OR ($1::text = 'owner' AND item_owner_id = $2)
              )
              AND ($3::varchar IS NULL OR status = $3)
              AND ($4::timestamptz IS NULL OR start_at < $4)
              AND ($5::timestamptz IS NULL OR start_at > $5)
              AND ($6::timestamptz IS NULL OR end_at < $6)
              AND ($7::timestamptz IS NULL OR end_at > $7)
            ORDER BY start_at DESC, seq ASC
            LIMIT $8 OFFSET $9
            "#
        ))
        .bind(party_kind)
        .bind(user_id.value())
        .bind(predicate.status.map(|s| s.as_str()))
        .bind(predicate.start_before)
        .bind(predicate.start_after)
        .bind(predicate.end_before)
        .bind(predicate.end_after)
        .bind(i64::from(page.size))
        .bind(i64::try_from(page.offset())?)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_booking).collect()
    }
}
