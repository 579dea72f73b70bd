use async_trait::async_trait;

use crate::domain::shelf::shelf_item::ShelfItem;

#[async_trait]
pub trait ShelfRepository: Send + Sync {
    async fn find_by_menu_item(&self, menu_item_id: i32) -> anyhow::Result<Option<ShelfItem>>;

    /// Inserts a new shelf slot. If one already exists for the menu item the
    /// stored slot is returned instead.
    async fn insert(&self, item: &ShelfItem) -> anyhow::Result<ShelfItem>;

    /// Writes `item` only if the stored version still equals `expected_version`.
    /// Returns false when another writer got there first.
    async fn update(&self, item: &ShelfItem, expected_version: i64) -> anyhow::Result<bool>;
}
