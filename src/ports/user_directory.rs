use crate::domain::value_objects::UserId;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// ユーザーディレクトリポート
///
/// 予約コンテキストとユーザー管理コンテキストの境界を維持する。
/// 予約コンテキストはUserIDのみを知り、ユーザー詳細は知らない。
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// ユーザーが存在するか確認する
    ///
    /// 予約作成・一覧取得前の操作者バリデーションに使用される。
    async fn exists(&self, user_id: UserId) -> Result<bool>;
}
