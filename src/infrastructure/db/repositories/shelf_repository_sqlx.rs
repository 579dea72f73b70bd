use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::application::ports::shelf_repository::ShelfRepository;
use crate::domain::shelf::shelf_item::ShelfItem;
use crate::infrastructure::db::PgPool;

pub struct SqlxShelfRepository {
    pub pool: PgPool,
}

impl SqlxShelfRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_shelf_item(row: &PgRow) -> ShelfItem {
    ShelfItem {
        id: row.get("id"),
        item_name: row.get("item_name"),
        menu_item_id: row.get("menu_item_id"),
        quantity: row.get("quantity"),
        version: row.get("version"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl ShelfRepository for SqlxShelfRepository {
    async fn find_by_menu_item(&self, menu_item_id: i32) -> anyhow::Result<Option<ShelfItem>> {
        let row = sqlx::query(
            r#"SELECT id, item_name, menu_item_id, quantity, version, updated_at
               FROM shelf
               WHERE menu_item_id = $1"#,
        )
        .bind(menu_item_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(map_shelf_item))
    }

    async fn insert(&self, item: &ShelfItem) -> anyhow::Result<ShelfItem> {
        // a concurrent insert for the same menu item wins; read its row back
        sqlx::query(
            r#"INSERT INTO shelf (item_name, menu_item_id, quantity, version, updated_at)
               VALUES ($1, $2, $3, $4, $5)
               ON CONFLICT (menu_item_id) DO NOTHING"#,
        )
        .bind(&item.item_name)
        .bind(item.menu_item_id)
        .bind(item.quantity)
        .bind(item.version)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;
        self.find_by_menu_item(item.menu_item_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("shelf slot for menu item {} vanished", item.menu_item_id))
    }

    async fn update(&self, item: &ShelfItem, expected_version: i64) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"UPDATE shelf
               SET quantity = $2, version = $3, updated_at = $4
               WHERE id = $1 AND version = $5"#,
        )
        .bind(item.id)
        .bind(item.quantity)
        .bind(item.version)
        .bind(item.updated_at)
        .bind(expected_version)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() == 1)
    }
}
