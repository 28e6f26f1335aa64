use crate::domain::{ItemId, UserId, booking::ItemRef};
use crate::ports::item_catalog::{ItemCatalog as ItemCatalogTrait, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// ItemCatalogのモック実装
///
/// アイテムを登録することで状態を持ったテストをサポート。
/// 貸出可否は後から切り替え可能。
pub struct ItemCatalog {
    items: Mutex<HashMap<ItemId, ItemRef>>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(HashMap::new()),
        }
    }

    /// テスト用にアイテムを登録
    pub fn add_item(&self, item_id: ItemId, owner_id: UserId, available: bool) {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                item_id,
                ItemRef {
                    item_id,
                    owner_id,
                    available,
                },
            );
    }

    /// 登録済みアイテムの貸出可否を切り替え
    pub fn set_available(&self, item_id: ItemId, available: bool) {
        if let Some(item) = self
            .items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&item_id)
        {
            item.available = available;
        }
    }
}

impl Default for ItemCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItemCatalogTrait for ItemCatalog {
    async fn find_item(&self, item_id: ItemId) -> Result<Option<ItemRef>> {
        Ok(self
            .items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&item_id)
            .copied())
    }

    /// 登録されたアイテムの中に所有者が一致するものがあるか
    async fn owns_any_item(&self, user_id: UserId) -> Result<bool> {
        Ok(self
            .items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .any(|item| item.owner_id == user_id))
    }
}
