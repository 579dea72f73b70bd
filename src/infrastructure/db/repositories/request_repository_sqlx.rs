use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::application::ports::request_repository::{NewRequestLine, RequestRepository};
use crate::domain::requests::request::{Request, RequestMenuItem, RequestStatus};
use crate::infrastructure::db::PgPool;

pub struct SqlxRequestRepository {
    pub pool: PgPool,
}

impl SqlxRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_request(row: &PgRow) -> anyhow::Result<Request> {
    let status: String = row.get("status");
    Ok(Request {
        id: row.get("id"),
        customer_id: row.get("customer_id"),
        status: status.parse()?,
    })
}

fn map_line(row: &PgRow) -> RequestMenuItem {
    RequestMenuItem {
        id: row.get("id"),
        request_id: row.get("request_id"),
        menu_item_id: row.get("menu_item_id"),
        quantity: row.get("quantity"),
        prepared: row.get("prepared"),
        immediate: row.get("immediate"),
    }
}

#[async_trait]
impl RequestRepository for SqlxRequestRepository {
    async fn create_with_lines(
        &self,
        customer_id: i32,
        lines: &[NewRequestLine],
    ) -> anyhow::Result<(Request, Vec<RequestMenuItem>)> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query(
            r#"INSERT INTO request (customer_id, status)
               VALUES ($1, $2)
               RETURNING id, customer_id, status"#,
        )
        .bind(customer_id)
        .bind(RequestStatus::New.as_str())
        .fetch_one(&mut *tx)
        .await?;
        let request = map_request(&row)?;

        let mut stored = Vec::with_capacity(lines.len());
        for line in lines {
            let row = sqlx::query(
                r#"INSERT INTO request_menu_item (request_id, menu_item_id, quantity, prepared, immediate)
                   VALUES ($1, $2, $3, 0, $4)
                   RETURNING id, request_id, menu_item_id, quantity, prepared, immediate"#,
            )
            .bind(request.id)
            .bind(line.menu_item_id)
            .bind(line.quantity)
            .bind(line.immediate)
            .fetch_one(&mut *tx)
            .await?;
            stored.push(map_line(&row));
        }
        tx.commit().await?;
        Ok((request, stored))
    }

    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<Request>> {
        let row = sqlx::query("SELECT id, customer_id, status FROM request WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_request).transpose()
    }

    async fn find_by_statuses(&self, statuses: &[RequestStatus]) -> anyhow::Result<Vec<Request>> {
        let names: Vec<&str> = statuses.iter().map(|s| s.as_str()).collect();
        let rows = sqlx::query(
            r#"SELECT id, customer_id, status
               FROM request
               WHERE status = ANY($1)
               ORDER BY id"#,
        )
        .bind(&names)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(map_request).collect()
    }

    async fn update_status(&self, id: i32, status: RequestStatus) -> anyhow::Result<bool> {
        let res = sqlx::query("UPDATE request SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn list_lines(&self, request_id: i32) -> anyhow::Result<Vec<RequestMenuItem>> {
        let rows = sqlx::query(
            r#"SELECT id, request_id, menu_item_id, quantity, prepared, immediate
               FROM request_menu_item
               WHERE request_id = $1
               ORDER BY id"#,
        )
        .bind(request_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(map_line).collect())
    }

    async fn find_line(
        &self,
        request_id: i32,
        menu_item_id: i32,
    ) -> anyhow::Result<Option<RequestMenuItem>> {
        let row = sqlx::query(
            r#"SELECT id, request_id, menu_item_id, quantity, prepared, immediate
               FROM request_menu_item
               WHERE request_id = $1 AND menu_item_id = $2"#,
        )
        .bind(request_id)
        .bind(menu_item_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(map_line))
    }

    async fn add_prepared(
        &self,
        request_id: i32,
        menu_item_id: i32,
        delta: i32,
    ) -> anyhow::Result<Option<RequestMenuItem>> {
        let row = sqlx::query(
            r#"UPDATE request_menu_item
               SET prepared = prepared + $3
               WHERE request_id = $1 AND menu_item_id = $2 AND prepared + $3 <= quantity
               RETURNING id, request_id, menu_item_id, quantity, prepared, immediate"#,
        )
        .bind(request_id)
        .bind(menu_item_id)
        .bind(delta)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(map_line))
    }
}
