use crate::domain::{ItemId, UserId, booking::ItemRef};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// アイテムカタログポート
///
/// 予約コンテキストとアイテム管理コンテキストの境界を維持する。
#[async_trait]
pub trait ItemCatalog: Send + Sync {
    /// アイテムを取得する
    ///
    /// 予約判定に必要な所有者と貸出可否のみを返す。存在しない場合は`None`。
    async fn find_item(&self, item_id: ItemId) -> Result<Option<ItemRef>>;

    /// ユーザーがアイテムを1つ以上所有しているか確認する
    ///
    /// ビジネスルール: 所有者としての予約一覧は所有者のみ取得できる。
    async fn owns_any_item(&self, user_id: UserId) -> Result<bool>;
}
