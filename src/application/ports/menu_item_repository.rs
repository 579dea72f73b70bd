use async_trait::async_trait;

use crate::domain::requests::menu_item::MenuItem;

#[async_trait]
pub trait MenuItemRepository: Send + Sync {
    async fn list_all(&self) -> anyhow::Result<Vec<MenuItem>>;

    /// Unknown ids are skipped, so the result may be shorter than `ids`.
    async fn find_by_ids(&self, ids: &[i32]) -> anyhow::Result<Vec<MenuItem>>;
}
