use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::application::ports::menu_item_repository::MenuItemRepository;
use crate::domain::requests::menu_item::MenuItem;
use crate::infrastructure::db::PgPool;

pub struct SqlxMenuItemRepository {
    pub pool: PgPool,
}

impl SqlxMenuItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_menu_item(row: &PgRow) -> MenuItem {
    MenuItem {
        id: row.get("id"),
        name: row.get("name"),
        price: row.get("price"),
        volume: row.get("volume"),
        packing: row.get("packing"),
        immediate: row.get("immediate"),
    }
}

#[async_trait]
impl MenuItemRepository for SqlxMenuItemRepository {
    async fn list_all(&self) -> anyhow::Result<Vec<MenuItem>> {
        let rows = sqlx::query(
            r#"SELECT id, name, price, volume, packing, immediate
               FROM menu_item
               ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(map_menu_item).collect())
    }

    async fn find_by_ids(&self, ids: &[i32]) -> anyhow::Result<Vec<MenuItem>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query(
            r#"SELECT id, name, price, volume, packing, immediate
               FROM menu_item
               WHERE id = ANY($1)
               ORDER BY id"#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(map_menu_item).collect())
    }
}
